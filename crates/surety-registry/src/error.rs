//! # Registry Error Types
//!
//! Structured errors for executor registry operations. State machine
//! rejections include the current status and the attempted operation;
//! economic rejections include the requested and available amounts.

use thiserror::Error;

use surety_core::ArithmeticError;

/// Errors arising from executor registry operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The operator address is already bound to another executor id.
    #[error("operator {operator} is already bound to executor {existing}")]
    OperatorAlreadyBound {
        /// The operator address.
        operator: String,
        /// The executor id it is bound to.
        existing: String,
    },

    /// No executor exists under the given id.
    #[error("unknown executor {executor}")]
    UnknownExecutor {
        /// The missing executor id.
        executor: String,
    },

    /// The caller's capability is not on the allow-list.
    #[error("caller {caller} is not authorized for stake mutation")]
    NotAuthorized {
        /// The rejected caller id.
        caller: String,
    },

    /// An admin-only operation was attempted by a non-admin address.
    #[error("caller {caller} is not the registry admin")]
    NotAdmin {
        /// The rejected caller address.
        caller: String,
    },

    /// The executor's status does not permit the operation.
    #[error("executor {executor} cannot perform {operation} in status {status}")]
    InvalidStatus {
        /// The executor id.
        executor: String,
        /// The attempted operation.
        operation: String,
        /// The current status name.
        status: String,
    },

    /// The executor is permanently banned.
    #[error("executor {executor} is banned")]
    Banned {
        /// The banned executor id.
        executor: String,
    },

    /// An operator-only operation was attempted by another address.
    #[error("caller {caller} is not the operator bound to executor {executor}")]
    NotOperator {
        /// The rejected caller address.
        caller: String,
        /// The executor id.
        executor: String,
    },

    /// A zero amount was passed where a positive amount is required.
    #[error("{operation} requires a non-zero amount")]
    ZeroAmount {
        /// The rejected operation.
        operation: String,
    },

    /// Available stake does not cover the requested amount.
    #[error("executor {executor} has {available} available, {requested} requested for {operation}")]
    InsufficientAvailable {
        /// The executor id.
        executor: String,
        /// The amount requested.
        requested: u64,
        /// The available balance.
        available: u64,
        /// The operation that needed the funds.
        operation: String,
    },

    /// Total stake does not cover the requested slash or penalty.
    #[error("executor {executor} holds {total} total stake, {requested} requested for {operation}")]
    InsufficientStake {
        /// The executor id.
        executor: String,
        /// The amount requested.
        requested: u64,
        /// Available plus locked stake.
        total: u64,
        /// The operation that needed the funds.
        operation: String,
    },

    /// Locked stake does not cover the requested unlock.
    #[error("executor {executor} has {locked} locked, {requested} requested for unlock")]
    InsufficientLocked {
        /// The executor id.
        executor: String,
        /// The amount requested.
        requested: u64,
        /// The locked balance.
        locked: u64,
    },

    /// A withdrawal is already pending for this executor.
    #[error("executor {executor} already has a pending withdrawal of {amount} maturing at {matures_at}")]
    WithdrawalAlreadyPending {
        /// The executor id.
        executor: String,
        /// The pending amount.
        amount: u64,
        /// When it matures.
        matures_at: String,
    },

    /// No withdrawal is pending for this executor.
    #[error("executor {executor} has no pending withdrawal")]
    NoWithdrawalPending {
        /// The executor id.
        executor: String,
    },

    /// The withdrawal cooldown has not elapsed.
    #[error("withdrawal for executor {executor} matures at {matures_at} (now {now})")]
    CooldownActive {
        /// The executor id.
        executor: String,
        /// The maturity time.
        matures_at: String,
        /// The ledger time at the call.
        now: String,
    },

    /// Withdrawal attempted while stake is locked in open disputes.
    #[error("executor {executor} cannot withdraw while {locked} stake is locked")]
    StakeLocked {
        /// The executor id.
        executor: String,
        /// The locked balance.
        locked: u64,
    },

    /// Checked arithmetic failed during a balance mutation.
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}
