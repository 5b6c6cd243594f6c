//! # Engine Events
//!
//! Append-only lifecycle events recorded by the optimistic dispute
//! engine.

use serde::{Deserialize, Serialize};

use surety_core::{AccountAddress, Amount, ContentDigest, DisputeId, ReceiptId, Timestamp};

/// A lifecycle event recorded by the dispute engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EngineEvent {
    /// An optimistic dispute was opened against a hub-disputed receipt.
    Opened {
        /// The dispute id.
        dispute: DisputeId,
        /// The disputed receipt.
        receipt: ReceiptId,
        /// The challenger of record.
        challenger: AccountAddress,
        /// Deadline for the executor's counter-bond.
        counter_deadline: Timestamp,
    },
    /// The executor matched the challenger bond.
    CounterBondPosted {
        /// The dispute id.
        dispute: DisputeId,
        /// The counter-bond amount.
        amount: Amount,
        /// Deadline for the arbitrator's ruling.
        arbitration_deadline: Timestamp,
    },
    /// A party appended evidence.
    EvidenceSubmitted {
        /// The dispute id.
        dispute: DisputeId,
        /// The submitting party.
        submitted_by: AccountAddress,
        /// The evidence commitment.
        commitment: ContentDigest,
        /// When the submission was recorded.
        at: Timestamp,
    },
    /// The counter-bond deadline passed uncontested; the challenger won
    /// by default.
    TimeoutResolved {
        /// The dispute id.
        dispute: DisputeId,
        /// The stake slashed to the challenger.
        slashed: Amount,
        /// When the resolution happened.
        at: Timestamp,
    },
    /// The arbitrator ruled on a contested dispute.
    ArbitrationResolved {
        /// The dispute id.
        dispute: DisputeId,
        /// Whether the solver was found at fault.
        solver_fault: bool,
        /// The slash percentage applied (zero when not at fault).
        slash_percentage: u8,
        /// The arbitrator's stated reason.
        reason: String,
        /// When the ruling was recorded.
        at: Timestamp,
    },
    /// The arbitration deadline passed unresolved; the challenger won by
    /// default and received the counter-bond.
    ContestedTimeoutResolved {
        /// The dispute id.
        dispute: DisputeId,
        /// When the resolution happened.
        at: Timestamp,
    },
    /// The dispute was closed after its receipt settled outside the
    /// engine.
    ClosedAfterExternalSettlement {
        /// The dispute id.
        dispute: DisputeId,
        /// When the close happened.
        at: Timestamp,
    },
    /// The engine was paused for new disputes.
    Paused {
        /// When the pause took effect.
        at: Timestamp,
    },
    /// The engine was unpaused.
    Unpaused {
        /// When the unpause took effect.
        at: Timestamp,
    },
}
