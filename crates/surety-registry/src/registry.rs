//! # The Executor Registry
//!
//! The single owner of executor stake and lifecycle state. All mutation
//! happens through this component's entry points: operator-facing calls
//! are gated on the bound operator address, stake primitives on a
//! [`RegistryCapability`], and administrative calls on the admin address.
//!
//! Every entry point is check-then-mutate: all preconditions are
//! validated before the first field write, so a returned error implies no
//! partial state change.

use std::collections::{BTreeSet, HashMap};

use surety_core::{
    AccountAddress, Amount, CallerId, ContentDigest, DisputeReason, ExecutorId, ProtocolParams,
    ReceiptId, Timestamp, BPS_DENOMINATOR,
};
use surety_escrow::PayoutLedger;

use crate::capability::RegistryCapability;
use crate::error::RegistryError;
use crate::event::RegistryEvent;
use crate::executor::{
    decay_multiplier_bps, reputation_score, ExecutorRecord, ExecutorStatus, PendingWithdrawal,
    ReputationCounters, ReputationView,
};

/// The executor registry component.
#[derive(Debug)]
pub struct ExecutorRegistry {
    params: ProtocolParams,
    admin: AccountAddress,
    treasury: AccountAddress,
    executors: HashMap<ExecutorId, ExecutorRecord>,
    operators: HashMap<AccountAddress, ExecutorId>,
    authorized: BTreeSet<CallerId>,
    events: Vec<RegistryEvent>,
}

impl ExecutorRegistry {
    /// Create a registry with validated parameters.
    ///
    /// # Errors
    ///
    /// Returns the parameter validation error unchanged; an invalid
    /// parameter set never produces a component.
    pub fn new(
        params: ProtocolParams,
        admin: AccountAddress,
        treasury: AccountAddress,
    ) -> Result<Self, surety_core::ParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            admin,
            treasury,
            executors: HashMap::new(),
            operators: HashMap::new(),
            authorized: BTreeSet::new(),
            events: Vec::new(),
        })
    }

    // ── Administration ─────────────────────────────────────────────────

    fn require_admin(&self, caller: &AccountAddress) -> Result<(), RegistryError> {
        if *caller != self.admin {
            return Err(RegistryError::NotAdmin {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    fn require_authorized(&self, cap: &RegistryCapability) -> Result<(), RegistryError> {
        if !self.authorized.contains(cap.issued_to()) {
            return Err(RegistryError::NotAuthorized {
                caller: cap.issued_to().to_string(),
            });
        }
        Ok(())
    }

    /// Issue stake-mutation authority under `caller_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAdmin`] unless called by the admin.
    pub fn grant_capability(
        &mut self,
        caller: &AccountAddress,
        caller_id: CallerId,
    ) -> Result<RegistryCapability, RegistryError> {
        self.require_admin(caller)?;
        self.authorized.insert(caller_id.clone());
        Ok(RegistryCapability::new(caller_id))
    }

    /// Revoke stake-mutation authority from `caller_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAdmin`] unless called by the admin.
    pub fn revoke_capability(
        &mut self,
        caller: &AccountAddress,
        caller_id: &CallerId,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        self.authorized.remove(caller_id);
        Ok(())
    }

    /// Rotate the treasury address receiving unjail penalties.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotAdmin`] unless called by the admin.
    pub fn rotate_treasury(
        &mut self,
        caller: &AccountAddress,
        treasury: AccountAddress,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        self.treasury = treasury;
        Ok(())
    }

    // ── Registration and stake ─────────────────────────────────────────

    /// Register a new executor bound to `operator`.
    ///
    /// The id is derived from the registration tuple; the operator
    /// binding is permanent and survives a ban, so a banned operator can
    /// never re-register under the same address.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::OperatorAlreadyBound`] if the operator
    /// already has an executor id.
    pub fn register(
        &mut self,
        operator: AccountAddress,
        metadata: ContentDigest,
        now: Timestamp,
    ) -> Result<ExecutorId, RegistryError> {
        if let Some(existing) = self.operators.get(&operator) {
            return Err(RegistryError::OperatorAlreadyBound {
                operator: operator.to_string(),
                existing: existing.to_string(),
            });
        }

        let id = ExecutorId::derive(&operator, &metadata, &now);
        self.executors.insert(
            id,
            ExecutorRecord {
                id,
                operator,
                metadata,
                status: ExecutorStatus::Inactive,
                available: Amount::ZERO,
                locked: Amount::ZERO,
                total_deposited: 0,
                total_withdrawn: 0,
                jail_count: 0,
                registered_at: now,
                last_activity: now,
                pending_withdrawal: None,
                reputation: ReputationCounters::default(),
            },
        );
        self.operators.insert(operator, id);
        self.events.push(RegistryEvent::Registered { executor: id, at: now });
        tracing::info!(executor = %id, operator = %operator, "executor registered");
        Ok(id)
    }

    /// Credit stake to an executor's available balance.
    ///
    /// Deposits are permissionless; crossing the minimum from Inactive
    /// auto-activates.
    ///
    /// # Errors
    ///
    /// Rejects zero amounts and deposits to banned executors.
    pub fn deposit_stake(
        &mut self,
        id: &ExecutorId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        if amount.is_zero() {
            return Err(RegistryError::ZeroAmount {
                operation: "deposit".to_string(),
            });
        }
        let min_stake = self.params.min_executor_stake;
        let record = self.record_mut(id)?;
        if record.status == ExecutorStatus::Banned {
            return Err(RegistryError::Banned {
                executor: id.to_string(),
            });
        }

        record.available = record.available.checked_add(amount, "stake deposit")?;
        record.total_deposited += amount.base_units() as u128;
        let activated =
            record.status == ExecutorStatus::Inactive && record.available >= min_stake;
        if activated {
            record.status = ExecutorStatus::Active;
        }

        self.events.push(RegistryEvent::StakeDeposited {
            executor: *id,
            amount,
            at: now,
        });
        if activated {
            self.events.push(RegistryEvent::Activated { executor: *id, at: now });
            tracing::info!(executor = %id, "executor activated");
        }
        tracing::info!(executor = %id, amount = %amount, "stake deposited");
        Ok(())
    }

    /// Begin the withdrawal cooldown for `amount` of available stake.
    ///
    /// The amount stays in `available` (and keeps counting toward
    /// coverage) until the matured withdrawal executes.
    ///
    /// # Errors
    ///
    /// Operator-only; rejects zero amounts, a second pending withdrawal,
    /// and amounts above the available balance.
    pub fn initiate_withdrawal(
        &mut self,
        caller: &AccountAddress,
        id: &ExecutorId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        if amount.is_zero() {
            return Err(RegistryError::ZeroAmount {
                operation: "withdrawal".to_string(),
            });
        }
        let cooldown = self.params.withdrawal_cooldown_secs;
        let record = self.record_mut(id)?;
        if *caller != record.operator {
            return Err(RegistryError::NotOperator {
                caller: caller.to_string(),
                executor: id.to_string(),
            });
        }
        if let Some(pending) = &record.pending_withdrawal {
            return Err(RegistryError::WithdrawalAlreadyPending {
                executor: id.to_string(),
                amount: pending.amount.base_units(),
                matures_at: pending.matures_at.to_string(),
            });
        }
        if amount > record.available {
            return Err(RegistryError::InsufficientAvailable {
                executor: id.to_string(),
                requested: amount.base_units(),
                available: record.available.base_units(),
                operation: "withdrawal".to_string(),
            });
        }

        let matures_at = now.plus_secs(cooldown);
        record.pending_withdrawal = Some(PendingWithdrawal { amount, matures_at });
        self.events.push(RegistryEvent::WithdrawalInitiated {
            executor: *id,
            amount,
            matures_at,
        });
        tracing::info!(executor = %id, amount = %amount, matures_at = %matures_at, "withdrawal initiated");
        Ok(())
    }

    /// Execute a matured withdrawal, crediting the operator.
    ///
    /// # Errors
    ///
    /// Operator-only; requires a pending withdrawal, an elapsed cooldown,
    /// no locked stake, and a still-sufficient available balance.
    pub fn withdraw(
        &mut self,
        caller: &AccountAddress,
        id: &ExecutorId,
        payouts: &mut PayoutLedger,
        now: Timestamp,
    ) -> Result<Amount, RegistryError> {
        let min_stake = self.params.min_executor_stake;
        let record = self.record_mut(id)?;
        if *caller != record.operator {
            return Err(RegistryError::NotOperator {
                caller: caller.to_string(),
                executor: id.to_string(),
            });
        }
        let pending = record
            .pending_withdrawal
            .ok_or_else(|| RegistryError::NoWithdrawalPending {
                executor: id.to_string(),
            })?;
        if now < pending.matures_at {
            return Err(RegistryError::CooldownActive {
                executor: id.to_string(),
                matures_at: pending.matures_at.to_string(),
                now: now.to_string(),
            });
        }
        if !record.locked.is_zero() {
            return Err(RegistryError::StakeLocked {
                executor: id.to_string(),
                locked: record.locked.base_units(),
            });
        }
        if pending.amount > record.available {
            return Err(RegistryError::InsufficientAvailable {
                executor: id.to_string(),
                requested: pending.amount.base_units(),
                available: record.available.base_units(),
                operation: "withdrawal".to_string(),
            });
        }

        record.available = record.available.checked_sub(pending.amount, "withdrawal")?;
        record.total_withdrawn += pending.amount.base_units() as u128;
        record.pending_withdrawal = None;
        let operator = record.operator;
        let deactivated =
            record.status == ExecutorStatus::Active && record.available < min_stake;
        if deactivated {
            record.status = ExecutorStatus::Inactive;
        }

        self.events.push(RegistryEvent::Withdrawn {
            executor: *id,
            amount: pending.amount,
            at: now,
        });
        if deactivated {
            self.events.push(RegistryEvent::Deactivated { executor: *id, at: now });
        }
        tracing::info!(executor = %id, amount = %pending.amount, "withdrawal executed");
        payouts.credit(operator, pending.amount, "stake withdrawal")?;
        Ok(pending.amount)
    }

    /// Cancel a pending withdrawal.
    ///
    /// # Errors
    ///
    /// Operator-only; requires a pending withdrawal.
    pub fn cancel_withdrawal(
        &mut self,
        caller: &AccountAddress,
        id: &ExecutorId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        let record = self.record_mut(id)?;
        if *caller != record.operator {
            return Err(RegistryError::NotOperator {
                caller: caller.to_string(),
                executor: id.to_string(),
            });
        }
        if record.pending_withdrawal.is_none() {
            return Err(RegistryError::NoWithdrawalPending {
                executor: id.to_string(),
            });
        }
        record.pending_withdrawal = None;
        self.events.push(RegistryEvent::WithdrawalCancelled { executor: *id, at: now });
        Ok(())
    }

    // ── Capability-gated stake primitives ──────────────────────────────

    /// Move stake from available to locked.
    ///
    /// # Errors
    ///
    /// Requires a valid capability, a non-zero amount, and sufficient
    /// available stake.
    pub fn lock_stake(
        &mut self,
        cap: &RegistryCapability,
        id: &ExecutorId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        self.require_authorized(cap)?;
        if amount.is_zero() {
            return Err(RegistryError::ZeroAmount {
                operation: "lock".to_string(),
            });
        }
        let record = self.record_mut(id)?;
        if amount > record.available {
            return Err(RegistryError::InsufficientAvailable {
                executor: id.to_string(),
                requested: amount.base_units(),
                available: record.available.base_units(),
                operation: "lock".to_string(),
            });
        }
        record.available = record.available.checked_sub(amount, "stake lock")?;
        record.locked = record.locked.checked_add(amount, "stake lock")?;
        self.events.push(RegistryEvent::StakeLocked {
            executor: *id,
            amount,
            at: now,
        });
        tracing::info!(executor = %id, amount = %amount, "stake locked");
        Ok(())
    }

    /// Move stake from locked back to available.
    ///
    /// Re-activates an Inactive executor whose available balance crosses
    /// the minimum, mirroring the deposit path.
    ///
    /// # Errors
    ///
    /// Requires a valid capability, a non-zero amount, and sufficient
    /// locked stake.
    pub fn unlock_stake(
        &mut self,
        cap: &RegistryCapability,
        id: &ExecutorId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        self.require_authorized(cap)?;
        if amount.is_zero() {
            return Err(RegistryError::ZeroAmount {
                operation: "unlock".to_string(),
            });
        }
        let min_stake = self.params.min_executor_stake;
        let record = self.record_mut(id)?;
        if amount > record.locked {
            return Err(RegistryError::InsufficientLocked {
                executor: id.to_string(),
                requested: amount.base_units(),
                locked: record.locked.base_units(),
            });
        }
        record.locked = record.locked.checked_sub(amount, "stake unlock")?;
        record.available = record.available.checked_add(amount, "stake unlock")?;
        let activated =
            record.status == ExecutorStatus::Inactive && record.available >= min_stake;
        if activated {
            record.status = ExecutorStatus::Active;
        }
        self.events.push(RegistryEvent::StakeUnlocked {
            executor: *id,
            amount,
            at: now,
        });
        if activated {
            self.events.push(RegistryEvent::Activated { executor: *id, at: now });
        }
        tracing::info!(executor = %id, amount = %amount, "stake unlocked");
        Ok(())
    }

    /// Forfeit `amount` of the executor's stake, drawing from locked
    /// first, then available.
    ///
    /// Increments the lost-dispute and total-slashed counters and
    /// deactivates an Active executor left below the minimum. The drawn
    /// amount is returned; the caller distributes it through the payout
    /// ledger.
    ///
    /// # Errors
    ///
    /// Requires a valid capability and a non-zero amount fully covered by
    /// the executor's total stake.
    pub fn slash(
        &mut self,
        cap: &RegistryCapability,
        id: &ExecutorId,
        amount: Amount,
        receipt: ReceiptId,
        reason: DisputeReason,
        now: Timestamp,
    ) -> Result<Amount, RegistryError> {
        self.require_authorized(cap)?;
        if amount.is_zero() {
            return Err(RegistryError::ZeroAmount {
                operation: "slash".to_string(),
            });
        }
        let min_stake = self.params.min_executor_stake;
        let record = self.record_mut(id)?;
        let total = record.total_stake();
        if amount > total {
            return Err(RegistryError::InsufficientStake {
                executor: id.to_string(),
                requested: amount.base_units(),
                total: total.base_units(),
                operation: "slash".to_string(),
            });
        }

        let from_locked = amount.min(record.locked);
        let from_available = amount.checked_sub(from_locked, "slash split")?;
        record.locked = record.locked.checked_sub(from_locked, "slash")?;
        record.available = record.available.checked_sub(from_available, "slash")?;
        record.reputation.disputes_lost += 1;
        record.reputation.total_slashed += amount.base_units() as u128;
        let deactivated =
            record.status == ExecutorStatus::Active && record.available < min_stake;
        if deactivated {
            record.status = ExecutorStatus::Inactive;
        }

        self.events.push(RegistryEvent::Slashed {
            executor: *id,
            amount,
            receipt,
            reason,
            at: now,
        });
        if deactivated {
            self.events.push(RegistryEvent::Deactivated { executor: *id, at: now });
        }
        tracing::warn!(executor = %id, amount = %amount, reason = %reason, "stake slashed");
        Ok(amount)
    }

    /// Record a dispute opened against the executor.
    ///
    /// # Errors
    ///
    /// Requires a valid capability and a known executor.
    pub fn record_dispute_opened(
        &mut self,
        cap: &RegistryCapability,
        id: &ExecutorId,
    ) -> Result<(), RegistryError> {
        self.require_authorized(cap)?;
        let record = self.record_mut(id)?;
        record.reputation.disputes_opened += 1;
        Ok(())
    }

    /// Record a successful fill: bumps total and successful fill
    /// counters, accumulates volume, and refreshes last activity.
    ///
    /// # Errors
    ///
    /// Requires a valid capability and a known executor.
    pub fn record_fill(
        &mut self,
        cap: &RegistryCapability,
        id: &ExecutorId,
        volume: Amount,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        self.require_authorized(cap)?;
        let record = self.record_mut(id)?;
        record.reputation.total_fills += 1;
        record.reputation.successful_fills += 1;
        record.reputation.volume_processed += volume.base_units() as u128;
        record.last_activity = now;
        Ok(())
    }

    /// Jail the executor for a lost dispute. The jailing that reaches the
    /// jail limit becomes a permanent ban instead.
    ///
    /// # Errors
    ///
    /// Requires a valid capability; banned executors cannot be jailed
    /// again.
    pub fn jail(
        &mut self,
        cap: &RegistryCapability,
        id: &ExecutorId,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        self.require_authorized(cap)?;
        let jail_limit = self.params.jail_limit;
        let record = self.record_mut(id)?;
        if record.status == ExecutorStatus::Banned {
            return Err(RegistryError::Banned {
                executor: id.to_string(),
            });
        }
        record.jail_count += 1;
        let banned = record.jail_count >= jail_limit;
        record.status = if banned {
            ExecutorStatus::Banned
        } else {
            ExecutorStatus::Jailed
        };
        let jail_count = record.jail_count;

        self.events.push(RegistryEvent::Jailed {
            executor: *id,
            jail_count,
            at: now,
        });
        if banned {
            self.events.push(RegistryEvent::Banned { executor: *id, at: now });
            tracing::warn!(executor = %id, "executor banned");
        } else {
            tracing::warn!(executor = %id, jail_count, "executor jailed");
        }
        Ok(())
    }

    /// Restore a jailed executor, drawing `penalty` from its stake
    /// (available first, then locked) into the treasury.
    ///
    /// The restored status follows the stake: Active at or above the
    /// minimum, Inactive below it.
    ///
    /// # Errors
    ///
    /// Admin-only; the executor must be Jailed (never Banned) and its
    /// total stake must cover the penalty.
    pub fn unjail(
        &mut self,
        caller: &AccountAddress,
        id: &ExecutorId,
        penalty: Amount,
        payouts: &mut PayoutLedger,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        let min_stake = self.params.min_executor_stake;
        let treasury = self.treasury;
        let record = self.record_mut(id)?;
        match record.status {
            ExecutorStatus::Banned => {
                return Err(RegistryError::Banned {
                    executor: id.to_string(),
                })
            }
            ExecutorStatus::Jailed => {}
            status => {
                return Err(RegistryError::InvalidStatus {
                    executor: id.to_string(),
                    operation: "unjail".to_string(),
                    status: status.as_str().to_string(),
                })
            }
        }
        let total = record.total_stake();
        if penalty > total {
            return Err(RegistryError::InsufficientStake {
                executor: id.to_string(),
                requested: penalty.base_units(),
                total: total.base_units(),
                operation: "unjail penalty".to_string(),
            });
        }

        let from_available = penalty.min(record.available);
        let from_locked = penalty.checked_sub(from_available, "penalty split")?;
        record.available = record.available.checked_sub(from_available, "unjail penalty")?;
        record.locked = record.locked.checked_sub(from_locked, "unjail penalty")?;
        record.reputation.total_slashed += penalty.base_units() as u128;
        record.status = if record.available >= min_stake {
            ExecutorStatus::Active
        } else {
            ExecutorStatus::Inactive
        };

        self.events.push(RegistryEvent::Unjailed {
            executor: *id,
            penalty,
            at: now,
        });
        tracing::info!(executor = %id, penalty = %penalty, "executor unjailed");
        payouts.credit(treasury, penalty, "unjail penalty")?;
        Ok(())
    }

    // ── Views ──────────────────────────────────────────────────────────

    fn record_mut(&mut self, id: &ExecutorId) -> Result<&mut ExecutorRecord, RegistryError> {
        self.executors
            .get_mut(id)
            .ok_or_else(|| RegistryError::UnknownExecutor {
                executor: id.to_string(),
            })
    }

    /// Look up an executor record.
    pub fn executor(&self, id: &ExecutorId) -> Option<&ExecutorRecord> {
        self.executors.get(id)
    }

    /// Look up the executor bound to an operator address.
    pub fn executor_by_operator(&self, operator: &AccountAddress) -> Option<&ExecutorRecord> {
        self.operators.get(operator).and_then(|id| self.executors.get(id))
    }

    /// The executor's reputation with read-time decay applied.
    ///
    /// Pure with respect to stored state: computing the view never
    /// mutates counters, so historical totals stay exact.
    pub fn decayed_reputation(
        &self,
        id: &ExecutorId,
        now: Timestamp,
    ) -> Result<ReputationView, RegistryError> {
        let record = self.executors.get(id).ok_or_else(|| RegistryError::UnknownExecutor {
            executor: id.to_string(),
        })?;
        let raw_score = reputation_score(&record.reputation);
        let multiplier_bps = decay_multiplier_bps(
            &record.last_activity,
            &now,
            self.params.decay_half_life_secs,
            self.params.decay_floor_bps,
        );
        let decayed_score =
            ((raw_score as u64 * multiplier_bps as u64) / BPS_DENOMINATOR as u64) as u32;
        Ok(ReputationView {
            raw_score,
            multiplier_bps,
            decayed_score,
            counters: record.reputation,
        })
    }

    /// The protocol parameters this registry was built with.
    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    /// The append-only event log.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }
}
