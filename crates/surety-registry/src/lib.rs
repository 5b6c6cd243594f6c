//! # surety-registry — Executor Registry
//!
//! Owns everything the protocol knows about an executor: stake balances
//! (available and locked), lifecycle status, reputation counters, and the
//! jail/ban ladder.
//!
//! - **Executor records** ([`executor`]): record shapes, lifecycle
//!   statuses, reputation counters, and the read-time decay view.
//!
//! - **Capabilities** ([`capability`]): unforgeable authority tokens for
//!   the lock/unlock/slash/jail primitives, issued by the registry admin
//!   and checked against a revocable allow-list on every call.
//!
//! - **Registry** ([`registry`]): the component itself. Every mutation is
//!   check-then-mutate — a returned error implies no state change — and
//!   the stake conservation invariant
//!   `available + locked == deposited − withdrawn − slashed`
//!   holds after every successful call.

pub mod capability;
pub mod error;
pub mod event;
pub mod executor;
pub mod registry;

pub use capability::RegistryCapability;
pub use error::RegistryError;
pub use event::RegistryEvent;
pub use executor::{
    decay_multiplier_bps, reputation_score, ExecutorRecord, ExecutorStatus, PendingWithdrawal,
    ReputationCounters, ReputationView,
};
pub use registry::ExecutorRegistry;
