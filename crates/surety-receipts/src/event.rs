//! # Hub Events
//!
//! Append-only lifecycle events recorded by the receipt hub.

use serde::{Deserialize, Serialize};

use surety_core::{AccountAddress, Amount, DisputeReason, ExecutorId, ReceiptId, Timestamp};

/// A lifecycle event recorded by the receipt hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum HubEvent {
    /// A receipt was posted and its challenge window opened.
    ReceiptPosted {
        /// The receipt id.
        receipt: ReceiptId,
        /// The posting executor.
        executor: ExecutorId,
        /// The declared volume.
        volume: Amount,
        /// When the challenge window closes.
        challenge_deadline: Timestamp,
    },
    /// A dispute was opened inside the challenge window.
    DisputeOpened {
        /// The disputed receipt.
        receipt: ReceiptId,
        /// Who opened the dispute.
        challenger: AccountAddress,
        /// The claimed violation.
        reason: DisputeReason,
        /// The attached bond.
        bond: Amount,
        /// The stake locked against the dispute.
        locked: Amount,
        /// When the dispute opened.
        at: Timestamp,
    },
    /// A receipt finalized (unchallenged, or dispute resolved no-fault).
    ReceiptFinalized {
        /// The receipt id.
        receipt: ReceiptId,
        /// When finalization happened.
        at: Timestamp,
    },
    /// A receipt was slashed after a lost dispute.
    ReceiptSlashed {
        /// The receipt id.
        receipt: ReceiptId,
        /// The forfeited amount.
        slashed: Amount,
        /// When the slash happened.
        at: Timestamp,
    },
    /// An escalated dispute was settled through the engine callback.
    EscalatedSettled {
        /// The receipt id.
        receipt: ReceiptId,
        /// Whether the executor was at fault.
        executor_fault: bool,
        /// When settlement happened.
        at: Timestamp,
    },
    /// A settlement attestation was recorded by an adapter.
    SettlementRecorded {
        /// The attested receipt.
        receipt: ReceiptId,
        /// When the attestation was recorded.
        at: Timestamp,
    },
    /// The hub was paused for new receipts and disputes.
    Paused {
        /// When the pause took effect.
        at: Timestamp,
    },
    /// The hub was unpaused.
    Unpaused {
        /// When the unpause took effect.
        at: Timestamp,
    },
    /// A best-effort reputation publish failed and was discarded.
    ReputationPublishFailed {
        /// The receipt whose outcome failed to publish.
        receipt: ReceiptId,
        /// The sink's error message.
        error: String,
    },
}
