//! # Dispute Engine Error Types
//!
//! Structured errors for the counter-bond protocol. Deadline rejections
//! carry both the deadline and the ledger time of the call; authority
//! rejections name the rejected caller.

use thiserror::Error;

use surety_core::ArithmeticError;
use surety_escrow::EscrowError;
use surety_receipts::ReceiptError;
use surety_registry::RegistryError;

/// Errors arising from optimistic dispute operations.
#[derive(Error, Debug)]
pub enum DisputeError {
    /// The engine is paused for new disputes.
    #[error("dispute engine is paused")]
    Paused,

    /// An admin-only operation was attempted by a non-admin address.
    #[error("caller {caller} is not the engine admin")]
    NotAdmin {
        /// The rejected caller address.
        caller: String,
    },

    /// No optimistic dispute exists under the given id.
    #[error("unknown dispute {dispute}")]
    UnknownDispute {
        /// The missing dispute id.
        dispute: String,
    },

    /// The receipt is not in Disputed status inside the hub.
    #[error("receipt {receipt} is {status}, not DISPUTED")]
    ReceiptNotDisputed {
        /// The receipt id.
        receipt: String,
        /// Its current hub status.
        status: String,
    },

    /// The receipt has not reached a terminal status inside the hub.
    #[error("receipt {receipt} is {status}, not yet settled")]
    ReceiptNotSettled {
        /// The receipt id.
        receipt: String,
        /// Its current hub status.
        status: String,
    },

    /// The caller is not the original hub-dispute challenger.
    #[error("caller {caller} is not the challenger of record")]
    NotChallenger {
        /// The rejected caller address.
        caller: String,
    },

    /// The caller is not the operator bound to the disputed executor.
    #[error("caller {caller} is not the operator of executor {executor}")]
    NotOperator {
        /// The rejected caller address.
        caller: String,
        /// The executor id.
        executor: String,
    },

    /// The caller is neither the challenger nor the executor's operator.
    #[error("caller {caller} is not a party to dispute {dispute}")]
    NotParty {
        /// The rejected caller address.
        caller: String,
        /// The dispute id.
        dispute: String,
    },

    /// An arbitration entry point was called by a non-arbitrator.
    #[error("caller {caller} is not the arbitrator")]
    NotArbitrator {
        /// The rejected caller address.
        caller: String,
    },

    /// The hub dispute's reason code resolves deterministically and
    /// cannot enter the counter-bond protocol.
    #[error("reason {reason} resolves deterministically and cannot be contested optimistically")]
    NotEscalatable {
        /// The reason code.
        reason: String,
    },

    /// An optimistic dispute is already active for this receipt.
    #[error("receipt {receipt} already has active dispute {dispute}")]
    ActiveDisputeExists {
        /// The receipt id.
        receipt: String,
        /// The active dispute id.
        dispute: String,
    },

    /// The dispute's status does not permit the operation.
    #[error("dispute {dispute} cannot perform {operation} in status {status}")]
    InvalidStatus {
        /// The dispute id.
        dispute: String,
        /// The attempted operation.
        operation: String,
        /// The current status name.
        status: String,
    },

    /// The relevant deadline has already passed.
    #[error("deadline {deadline} for dispute {dispute} has passed (now {now})")]
    DeadlinePassed {
        /// The dispute id.
        dispute: String,
        /// The deadline.
        deadline: String,
        /// The ledger time at the call.
        now: String,
    },

    /// The relevant deadline has not been reached yet.
    #[error("deadline {deadline} for dispute {dispute} has not passed (now {now})")]
    DeadlineNotReached {
        /// The dispute id.
        dispute: String,
        /// The deadline.
        deadline: String,
        /// The ledger time at the call.
        now: String,
    },

    /// The counter-bond must equal the challenger bond.
    #[error("counter-bond mismatch: required {required}, provided {provided}")]
    CounterBondMismatch {
        /// The required amount in base units.
        required: u64,
        /// The provided amount in base units.
        provided: u64,
    },

    /// Evidence arrived after the bounded evidence window.
    #[error("evidence window for dispute {dispute} closed at {closed_at} (now {now})")]
    EvidenceWindowClosed {
        /// The dispute id.
        dispute: String,
        /// When the window closed.
        closed_at: String,
        /// The ledger time at the call.
        now: String,
    },

    /// A hub operation failed.
    #[error(transparent)]
    Hub(#[from] ReceiptError),

    /// A registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An escrow operation failed.
    #[error(transparent)]
    Escrow(#[from] EscrowError),

    /// Checked arithmetic failed.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}
