//! # Receipt and Dispute Records
//!
//! Stored record shapes for the hub. Receipts are append-only: a record
//! is never deleted, and its status only ever moves forward through the
//! machine below.
//!
//! Status machine: `Posted → {Finalized | Disputed}`,
//! `Disputed → {Finalized | Slashed}`. `Finalized` and `Slashed` are
//! terminal — there is no regression out of them.

use serde::{Deserialize, Serialize};

use surety_core::{
    AccountAddress, Amount, ContentDigest, DisputeReason, ExecutionReceipt, ReceiptId,
    ReceiptSignature, Timestamp,
};

/// The lifecycle status of a posted receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptStatus {
    /// Posted; the challenge window is running.
    Posted,
    /// A dispute is open against the receipt.
    Disputed,
    /// Settled in the executor's favor. Terminal state.
    Finalized,
    /// Settled against the executor; stake was forfeited. Terminal state.
    Slashed,
}

impl ReceiptStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Slashed)
    }

    /// Whether the machine permits a transition from `self` to `to`.
    pub fn can_transition_to(&self, to: ReceiptStatus) -> bool {
        use ReceiptStatus::*;
        matches!(
            (self, to),
            (Posted, Disputed) | (Posted, Finalized) | (Disputed, Finalized) | (Disputed, Slashed)
        )
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Posted => "POSTED",
            Self::Disputed => "DISPUTED",
            Self::Finalized => "FINALIZED",
            Self::Slashed => "SLASHED",
        }
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored receipt with its lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptRecord {
    /// The content-derived receipt id.
    pub id: ReceiptId,
    /// The receipt content as posted.
    pub receipt: ExecutionReceipt,
    /// The operator signature over the content digest.
    pub signature: ReceiptSignature,
    /// The volume the executor declared for this fill.
    pub declared_volume: Amount,
    /// When the receipt was posted.
    pub posted_at: Timestamp,
    /// The end of the challenge window.
    pub challenge_deadline: Timestamp,
    /// Current status.
    pub status: ReceiptStatus,
    /// When the receipt reached a terminal status, if it has.
    pub resolved_at: Option<Timestamp>,
}

/// A dispute opened against a receipt inside the challenge window.
///
/// Tied 1:1 to its receipt and resolved exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisputeRecord {
    /// The disputed receipt.
    pub receipt: ReceiptId,
    /// Who opened the dispute.
    pub challenger: AccountAddress,
    /// The claimed violation.
    pub reason: DisputeReason,
    /// Commitment to the challenger's evidence.
    pub evidence: ContentDigest,
    /// The bond the challenger attached.
    pub bond: Amount,
    /// The stake locked against this dispute.
    pub locked: Amount,
    /// When the dispute was opened.
    pub opened_at: Timestamp,
    /// Whether the dispute was handed to the optimistic engine. Once
    /// set, the hub's own arbitration path is closed — exactly one
    /// machinery settles each dispute.
    pub escalated_to_engine: bool,
    /// Whether the dispute has been resolved.
    pub resolved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_matrix() {
        use ReceiptStatus::*;
        let states = [Posted, Disputed, Finalized, Slashed];
        let valid = [
            (Posted, Disputed),
            (Posted, Finalized),
            (Disputed, Finalized),
            (Disputed, Slashed),
        ];
        for from in &states {
            for to in &states {
                assert_eq!(
                    from.can_transition_to(*to),
                    valid.contains(&(*from, *to)),
                    "transition {from} → {to}"
                );
            }
        }
    }

    #[test]
    fn terminal_states() {
        assert!(ReceiptStatus::Finalized.is_terminal());
        assert!(ReceiptStatus::Slashed.is_terminal());
        assert!(!ReceiptStatus::Posted.is_terminal());
        assert!(!ReceiptStatus::Disputed.is_terminal());
    }
}
