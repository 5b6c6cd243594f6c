//! # surety-escrow — Funds Plumbing
//!
//! Two fund-holding primitives shared by the rest of the stack:
//!
//! - **Escrow** ([`escrow`]): per-receipt escrow accounts holding a
//!   depositor's funds until a dispute outcome releases them to the
//!   executor or refunds the depositor. Release and refund each fire at
//!   most once; terminal statuses reject all further operations.
//!
//! - **Payouts** ([`payout`]): the pull-safe payout ledger. No settlement
//!   path ever pushes value to an external party; it credits the payout
//!   ledger after completing its state mutation, and beneficiaries
//!   withdraw. This is what makes reentrancy structurally impossible.

pub mod error;
pub mod escrow;
pub mod payout;

pub use error::EscrowError;
pub use escrow::{AssetKind, Escrow, EscrowCapability, EscrowEvent, EscrowLedger, EscrowStatus};
pub use payout::PayoutLedger;
