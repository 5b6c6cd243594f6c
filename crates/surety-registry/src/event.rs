//! # Registry Events
//!
//! Append-only lifecycle events recorded by the registry. The log is part
//! of the ledger's audit trail: entries are never rewritten or removed.

use serde::{Deserialize, Serialize};

use surety_core::{Amount, DisputeReason, ExecutorId, ReceiptId, Timestamp};

/// A lifecycle event recorded by the executor registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RegistryEvent {
    /// A new executor registered.
    Registered {
        /// The new executor id.
        executor: ExecutorId,
        /// When registration happened.
        at: Timestamp,
    },
    /// Stake was deposited.
    StakeDeposited {
        /// The executor id.
        executor: ExecutorId,
        /// The deposited amount.
        amount: Amount,
        /// When the deposit happened.
        at: Timestamp,
    },
    /// The executor crossed the minimum stake and became Active.
    Activated {
        /// The executor id.
        executor: ExecutorId,
        /// When activation happened.
        at: Timestamp,
    },
    /// Available stake fell below the minimum and the executor became
    /// Inactive.
    Deactivated {
        /// The executor id.
        executor: ExecutorId,
        /// When deactivation happened.
        at: Timestamp,
    },
    /// A withdrawal entered its cooldown.
    WithdrawalInitiated {
        /// The executor id.
        executor: ExecutorId,
        /// The requested amount.
        amount: Amount,
        /// When the cooldown elapses.
        matures_at: Timestamp,
    },
    /// A matured withdrawal was executed.
    Withdrawn {
        /// The executor id.
        executor: ExecutorId,
        /// The withdrawn amount.
        amount: Amount,
        /// When the withdrawal happened.
        at: Timestamp,
    },
    /// A pending withdrawal was cancelled.
    WithdrawalCancelled {
        /// The executor id.
        executor: ExecutorId,
        /// When cancellation happened.
        at: Timestamp,
    },
    /// Stake moved from available to locked.
    StakeLocked {
        /// The executor id.
        executor: ExecutorId,
        /// The locked amount.
        amount: Amount,
        /// When the lock happened.
        at: Timestamp,
    },
    /// Stake moved from locked back to available.
    StakeUnlocked {
        /// The executor id.
        executor: ExecutorId,
        /// The unlocked amount.
        amount: Amount,
        /// When the unlock happened.
        at: Timestamp,
    },
    /// Stake was forfeited.
    Slashed {
        /// The executor id.
        executor: ExecutorId,
        /// The forfeited amount.
        amount: Amount,
        /// The receipt the slash settles.
        receipt: ReceiptId,
        /// The dispute reason behind the slash.
        reason: DisputeReason,
        /// When the slash happened.
        at: Timestamp,
    },
    /// The executor was jailed for a lost dispute.
    Jailed {
        /// The executor id.
        executor: ExecutorId,
        /// The jailing count after this event.
        jail_count: u32,
        /// When the jailing happened.
        at: Timestamp,
    },
    /// The executor reached the jail limit and was permanently banned.
    Banned {
        /// The executor id.
        executor: ExecutorId,
        /// When the ban happened.
        at: Timestamp,
    },
    /// A jailed executor was restored by the admin.
    Unjailed {
        /// The executor id.
        executor: ExecutorId,
        /// The penalty drawn from its stake.
        penalty: Amount,
        /// When the unjailing happened.
        at: Timestamp,
    },
}
