//! # surety-disputes — The Optimistic Dispute Engine
//!
//! For disputes that are not mechanically checkable, the ledger runs a
//! counter-bond protocol: the challenger's bond (already held by the
//! hub) stands as the claim, the executor has a fixed window to match it,
//! and a contested dispute goes to arbitration with a timeout that
//! default-favors the challenger.
//!
//! The liveness guarantee is total: whatever the counterparties or the
//! arbitrator fail to do, some permissionless timeout path settles the
//! dispute. No stake and no escrow can be frozen forever.
//!
//! - **Records** ([`dispute`]): the optimistic dispute shape and its
//!   status machine.
//! - **Evidence** ([`evidence`]): the append-only evidence log.
//! - **Engine** ([`engine`]): the component and its settlement paths.

pub mod dispute;
pub mod engine;
pub mod error;
pub mod event;
pub mod evidence;

pub use dispute::{OptimisticDispute, OptimisticDisputeStatus};
pub use engine::OptimisticDisputeEngine;
pub use error::DisputeError;
pub use event::EngineEvent;
pub use evidence::EvidenceEntry;
