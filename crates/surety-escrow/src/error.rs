//! # Escrow Error Types
//!
//! Structured errors for escrow and payout operations. Every variant
//! carries enough context to diagnose the failure without inspecting
//! logs: the escrow id, the operation attempted, and the status at the
//! time of failure.

use thiserror::Error;

use surety_core::ArithmeticError;

/// Errors arising from escrow and payout operations.
#[derive(Error, Debug)]
pub enum EscrowError {
    /// No escrow exists under the given id.
    #[error("unknown escrow {escrow}")]
    UnknownEscrow {
        /// The missing escrow id.
        escrow: String,
    },

    /// The caller's capability is not on the allow-list.
    #[error("caller {caller} is not authorized for escrow settlement")]
    NotAuthorized {
        /// The rejected caller id.
        caller: String,
    },

    /// An admin-only operation was attempted by a non-admin address.
    #[error("caller {caller} is not the escrow admin")]
    NotAdmin {
        /// The rejected caller address.
        caller: String,
    },

    /// Escrow operation violated status preconditions.
    #[error("escrow {escrow} cannot perform {operation} in status {status}")]
    InvalidStatus {
        /// The escrow account identifier.
        escrow: String,
        /// The attempted operation (e.g., "release", "refund").
        operation: String,
        /// The current escrow status.
        status: String,
    },

    /// A receipt already has a linked escrow.
    #[error("receipt {receipt} already has escrow {escrow}")]
    ReceiptAlreadyEscrowed {
        /// The receipt id.
        receipt: String,
        /// The existing escrow id.
        escrow: String,
    },

    /// Escrow creation with a zero amount.
    #[error("escrow amount must be non-zero")]
    ZeroAmount,

    /// Escrow creation with a deadline at or before the current time.
    #[error("escrow deadline {deadline} is not in the future (now {now})")]
    DeadlineNotFuture {
        /// The rejected deadline.
        deadline: String,
        /// The ledger time at the call.
        now: String,
    },

    /// The permissionless expiry refund was attempted before the deadline.
    #[error("escrow {escrow} deadline {deadline} has not passed (now {now})")]
    DeadlineNotReached {
        /// The escrow id.
        escrow: String,
        /// The deadline that has not yet passed.
        deadline: String,
        /// The ledger time at the call.
        now: String,
    },

    /// Checked arithmetic failed while crediting a payout.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_status_display() {
        let err = EscrowError::InvalidStatus {
            escrow: "escrow:abc".to_string(),
            operation: "release".to_string(),
            status: "REFUNDED".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("escrow:abc"));
        assert!(msg.contains("release"));
        assert!(msg.contains("REFUNDED"));
    }

    #[test]
    fn already_escrowed_display() {
        let err = EscrowError::ReceiptAlreadyEscrowed {
            receipt: "receipt:0011".to_string(),
            escrow: "escrow:abc".to_string(),
        };
        assert!(format!("{err}").contains("receipt:0011"));
    }

    #[test]
    fn arithmetic_error_converts() {
        let inner = ArithmeticError::Overflow {
            operation: "payout credit".to_string(),
        };
        let err: EscrowError = inner.into();
        assert!(format!("{err}").contains("payout credit"));
    }
}
