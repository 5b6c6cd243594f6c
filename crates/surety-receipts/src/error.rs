//! # Receipt Hub Error Types
//!
//! Structured errors for the receipt lifecycle. State machine rejections
//! include the receipt id, the attempted operation, and the status at
//! the time of failure; window rejections include both the deadline and
//! the ledger time of the call.

use thiserror::Error;

use surety_core::{ArithmeticError, SignatureError};
use surety_registry::RegistryError;

/// Errors arising from receipt hub operations.
#[derive(Error, Debug)]
pub enum ReceiptError {
    /// The hub is paused for new receipts and disputes.
    #[error("receipt hub is paused")]
    Paused,

    /// An admin-only operation was attempted by a non-admin address.
    #[error("caller {caller} is not the hub admin")]
    NotAdmin {
        /// The rejected caller address.
        caller: String,
    },

    /// The caller's capability is not on the allow-list.
    #[error("caller {caller} is not authorized for hub settlement")]
    NotAuthorized {
        /// The rejected caller id.
        caller: String,
    },

    /// An arbitration entry point was called by a non-arbitrator.
    #[error("caller {caller} is not the arbitrator")]
    NotArbitrator {
        /// The rejected caller address.
        caller: String,
    },

    /// A receipt must declare positive volume.
    #[error("declared volume must be non-zero")]
    ZeroVolume,

    /// The claimed executor is not Active.
    #[error("executor {executor} is {status}, not ACTIVE")]
    ExecutorNotActive {
        /// The executor id.
        executor: String,
        /// Its current status.
        status: String,
    },

    /// A receipt with this content hash already exists.
    #[error("receipt {receipt} already posted")]
    DuplicateReceipt {
        /// The duplicate receipt id.
        receipt: String,
    },

    /// The receipt's expiry is not in the future.
    #[error("receipt {receipt} expiry {expires_at} is not after now ({now})")]
    ExpiryNotFuture {
        /// The receipt id.
        receipt: String,
        /// The rejected expiry.
        expires_at: String,
        /// The ledger time at the call.
        now: String,
    },

    /// Available stake does not cover the declared volume.
    #[error("executor {executor} has {available} available against required coverage {required}")]
    InsufficientCoverage {
        /// The executor id.
        executor: String,
        /// The required stake.
        required: u64,
        /// The available stake.
        available: u64,
    },

    /// No receipt exists under the given id.
    #[error("unknown receipt {receipt}")]
    UnknownReceipt {
        /// The missing receipt id.
        receipt: String,
    },

    /// The receipt's status does not permit the operation.
    #[error("receipt {receipt} cannot perform {operation} in status {status}")]
    InvalidStatus {
        /// The receipt id.
        receipt: String,
        /// The attempted operation.
        operation: String,
        /// The current status name.
        status: String,
    },

    /// The challenge window has closed; disputes are no longer accepted.
    #[error("challenge window for receipt {receipt} closed at {closed_at} (now {now})")]
    ChallengeWindowClosed {
        /// The receipt id.
        receipt: String,
        /// When the window closed.
        closed_at: String,
        /// The ledger time at the call.
        now: String,
    },

    /// The challenge window is still open; finalize must wait.
    #[error("challenge window for receipt {receipt} is open until {closes_at} (now {now})")]
    ChallengeWindowOpen {
        /// The receipt id.
        receipt: String,
        /// When the window closes.
        closes_at: String,
        /// The ledger time at the call.
        now: String,
    },

    /// The attached bond does not match the required bond.
    #[error("dispute bond mismatch: required {required}, provided {provided}")]
    BondMismatch {
        /// The required bond in base units.
        required: u64,
        /// The provided bond in base units.
        provided: u64,
    },

    /// No stake can be locked against the receipt.
    #[error("no stake can be locked for receipt {receipt}")]
    NothingAtStake {
        /// The receipt id.
        receipt: String,
    },

    /// No dispute record exists for this receipt.
    #[error("receipt {receipt} has no dispute")]
    NoDispute {
        /// The receipt id.
        receipt: String,
    },

    /// The dispute's reason code routes to the other resolution path.
    #[error("reason {reason} for receipt {receipt} is not resolvable on the {attempted} path")]
    WrongPath {
        /// The receipt id.
        receipt: String,
        /// The dispute reason.
        reason: String,
        /// The path that was attempted.
        attempted: String,
    },

    /// The mechanical condition cannot be decided yet (e.g., expiry has
    /// not passed and no settlement attestation exists).
    #[error("reason {reason} for receipt {receipt} is not decidable yet")]
    NotYetDecidable {
        /// The receipt id.
        receipt: String,
        /// The dispute reason.
        reason: String,
    },

    /// The dispute was handed to the optimistic engine; only the engine
    /// may settle it.
    #[error("dispute on receipt {receipt} is escalated to the optimistic engine")]
    EscalatedToEngine {
        /// The receipt id.
        receipt: String,
    },

    /// A settlement attestation was already recorded for this receipt.
    #[error("settlement attestation for receipt {receipt} already recorded")]
    AttestationAlreadyRecorded {
        /// The receipt id.
        receipt: String,
    },

    /// A registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Operator signature validation failed.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Checked arithmetic failed.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_closed_display() {
        let err = ReceiptError::ChallengeWindowClosed {
            receipt: "receipt:00".to_string(),
            closed_at: "1970-01-01T01:00:00Z".to_string(),
            now: "1970-01-01T02:00:00Z".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("receipt:00"));
        assert!(msg.contains("01:00:00"));
    }

    #[test]
    fn bond_mismatch_display() {
        let err = ReceiptError::BondMismatch {
            required: 10_000,
            provided: 9_999,
        };
        let msg = format!("{err}");
        assert!(msg.contains("10000"));
        assert!(msg.contains("9999"));
    }

    #[test]
    fn registry_error_converts() {
        let inner = RegistryError::UnknownExecutor {
            executor: "executor:aa".to_string(),
        };
        let err: ReceiptError = inner.into();
        assert!(format!("{err}").contains("executor:aa"));
    }
}
