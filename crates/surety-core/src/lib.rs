#![deny(missing_docs)]

//! # surety-core — Foundational Types for the Surety Stack
//!
//! This crate defines the types that every other crate in the workspace
//! depends on. It has no internal crate dependencies — only `serde`,
//! `serde_json`, `thiserror`, `chrono`, `uuid`, `sha2`, and
//! `ed25519-dalek` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`ReceiptId`] where an
//!    [`ExecutorId`] is expected.
//!
//! 2. **Integer money only.** [`Amount`] wraps base units with checked
//!    arithmetic. There is no float anywhere in a settlement path, and
//!    every overflow is a typed error that aborts the call.
//!
//! 3. **Domain-tagged digests.** Content-derived identifiers
//!    ([`ReceiptId`], [`ExecutorId`], [`DisputeId`]) flow through
//!    [`digest::sha256_tagged`], which prefixes a versioned domain tag so
//!    digests from different record kinds can never collide.
//!
//! 4. **Explicit ledger time.** [`Timestamp`] is UTC with second
//!    precision, and window-sensitive operations throughout the stack take
//!    the current ledger time as a parameter instead of reading a wall
//!    clock.

pub mod amount;
pub mod digest;
pub mod error;
pub mod identity;
pub mod params;
pub mod reason;
pub mod receipt;
pub mod signing;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use amount::{split_exact, Amount, Distribution, BPS_DENOMINATOR};
pub use digest::{sha256_tagged, ContentDigest};
pub use error::{ArithmeticError, ParamsError, SignatureError};
pub use identity::{AccountAddress, CallerId, DisputeId, EscrowId, ExecutorId, ReceiptId};
pub use params::ProtocolParams;
pub use reason::{DisputeReason, ResolutionPath};
pub use receipt::{ExecutionReceipt, RouteCommitment};
pub use signing::{verify_receipt_signature, OperatorKeypair, ReceiptSignature};
pub use temporal::Timestamp;
