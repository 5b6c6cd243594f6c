//! # Reputation Sink
//!
//! One-way, best-effort push of settlement outcomes to an external
//! reputation registry.
//!
//! The contract is visible in the types: [`ReputationSink::publish`]
//! returns a `Result`, and the hub is the only caller — it logs a
//! failure, appends a `ReputationPublishFailed` event, and discards the
//! error. No settlement path ever fails because a sink did.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use surety_core::{Amount, ContentDigest, ExecutorId, ReceiptId};

/// How a receipt settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementOutcome {
    /// Finalized in the executor's favor.
    Finalized,
    /// Slashed against the executor.
    Slashed,
}

impl std::fmt::Display for SettlementOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finalized => write!(f, "finalized"),
            Self::Slashed => write!(f, "slashed"),
        }
    }
}

/// The outcome record pushed to the external registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationUpdate {
    /// The settled receipt.
    pub receipt: ReceiptId,
    /// The executor the outcome is about.
    pub executor: ExecutorId,
    /// How the receipt settled.
    pub outcome: SettlementOutcome,
    /// Commitment to the evidence behind the outcome.
    pub evidence: ContentDigest,
    /// The declared volume of the fill.
    pub volume: Amount,
}

/// A failure reported by a reputation sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("reputation sink failure: {0}")]
pub struct SinkError(pub String);

/// An external reputation registry endpoint.
pub trait ReputationSink {
    /// Push one settlement outcome.
    ///
    /// # Errors
    ///
    /// Implementations report transport or registry failures; the hub
    /// treats any error as non-fatal.
    fn publish(&mut self, update: &ReputationUpdate) -> Result<(), SinkError>;
}

/// A sink that accepts and drops every update.
///
/// The default wiring for deployments without an external registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReputationSink for NullSink {
    fn publish(&mut self, _update: &ReputationUpdate) -> Result<(), SinkError> {
        Ok(())
    }
}
