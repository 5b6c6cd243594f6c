//! # The Optimistic Dispute Engine
//!
//! Runs the counter-bond protocol over disputes the hub escalated. The
//! engine holds capabilities into the registry (slash/unlock), the
//! escrow ledger (release/refund), and the hub (the escalated settlement
//! callback); every fund movement is a payout-ledger credit issued after
//! state mutation.
//!
//! ## Liveness Invariant
//!
//! Every non-terminal dispute has a permissionless exit: an uncontested
//! dispute falls to [`resolve_by_timeout`](OptimisticDisputeEngine::resolve_by_timeout)
//! after the counter-bond deadline, and a contested one falls to
//! [`resolve_contested_by_timeout`](OptimisticDisputeEngine::resolve_contested_by_timeout)
//! after the arbitration deadline. Arbitrator inaction never freezes
//! funds.

use std::collections::HashMap;

use surety_core::{
    split_exact, AccountAddress, Amount, ContentDigest, DisputeId, DisputeReason, ExecutorId,
    ProtocolParams, ReceiptId, ResolutionPath, Timestamp,
};
use surety_escrow::{EscrowCapability, EscrowLedger, EscrowStatus, PayoutLedger};
use surety_receipts::{HubCapability, ReceiptError, ReceiptHub};
use surety_registry::{ExecutorRegistry, RegistryCapability, RegistryError};

use crate::dispute::{OptimisticDispute, OptimisticDisputeStatus};
use crate::error::DisputeError;
use crate::event::EngineEvent;
use crate::evidence::EvidenceEntry;

/// Copies of everything a settlement path needs, taken before any
/// mutation begins.
struct SettleContext {
    receipt: ReceiptId,
    executor: ExecutorId,
    operator: AccountAddress,
    challenger: AccountAddress,
    challenger_bond: Amount,
    counter_bond: Amount,
    locked: Amount,
    reason: DisputeReason,
}

/// The optimistic dispute engine component.
pub struct OptimisticDisputeEngine {
    params: ProtocolParams,
    admin: AccountAddress,
    arbitrator: AccountAddress,
    treasury: AccountAddress,
    registry_cap: RegistryCapability,
    escrow_cap: EscrowCapability,
    hub_cap: HubCapability,
    paused: bool,
    disputes: HashMap<DisputeId, OptimisticDispute>,
    active_by_receipt: HashMap<ReceiptId, DisputeId>,
    events: Vec<EngineEvent>,
}

impl OptimisticDisputeEngine {
    /// Create an engine with validated parameters.
    ///
    /// The three capabilities must have been issued by the components
    /// this engine is wired to.
    ///
    /// # Errors
    ///
    /// Returns the parameter validation error unchanged.
    pub fn new(
        params: ProtocolParams,
        admin: AccountAddress,
        arbitrator: AccountAddress,
        treasury: AccountAddress,
        registry_cap: RegistryCapability,
        escrow_cap: EscrowCapability,
        hub_cap: HubCapability,
    ) -> Result<Self, surety_core::ParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            admin,
            arbitrator,
            treasury,
            registry_cap,
            escrow_cap,
            hub_cap,
            paused: false,
            disputes: HashMap::new(),
            active_by_receipt: HashMap::new(),
            events: Vec::new(),
        })
    }

    // ── Administration ─────────────────────────────────────────────────

    fn require_admin(&self, caller: &AccountAddress) -> Result<(), DisputeError> {
        if *caller != self.admin {
            return Err(DisputeError::NotAdmin {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    /// Block new optimistic disputes. Deadlines on open disputes keep
    /// running and every resolution path keeps working.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError::NotAdmin`] unless called by the admin.
    pub fn pause(&mut self, caller: &AccountAddress, now: Timestamp) -> Result<(), DisputeError> {
        self.require_admin(caller)?;
        self.paused = true;
        self.events.push(EngineEvent::Paused { at: now });
        tracing::warn!("dispute engine paused");
        Ok(())
    }

    /// Re-open the engine for new disputes.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError::NotAdmin`] unless called by the admin.
    pub fn unpause(&mut self, caller: &AccountAddress, now: Timestamp) -> Result<(), DisputeError> {
        self.require_admin(caller)?;
        self.paused = false;
        self.events.push(EngineEvent::Unpaused { at: now });
        Ok(())
    }

    /// Rotate the arbitrator address.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError::NotAdmin`] unless called by the admin.
    pub fn rotate_arbitrator(
        &mut self,
        caller: &AccountAddress,
        arbitrator: AccountAddress,
    ) -> Result<(), DisputeError> {
        self.require_admin(caller)?;
        self.arbitrator = arbitrator;
        Ok(())
    }

    /// Rotate the treasury address.
    ///
    /// # Errors
    ///
    /// Returns [`DisputeError::NotAdmin`] unless called by the admin.
    pub fn rotate_treasury(
        &mut self,
        caller: &AccountAddress,
        treasury: AccountAddress,
    ) -> Result<(), DisputeError> {
        self.require_admin(caller)?;
        self.treasury = treasury;
        Ok(())
    }

    // ── Protocol ───────────────────────────────────────────────────────

    /// Open an optimistic dispute over a hub-disputed receipt.
    ///
    /// Only the original challenger may open, only for escalated-path
    /// reasons, and only one active optimistic dispute may exist per
    /// receipt. The challenger's bond already held by the hub stands as
    /// the claim; nothing is re-collected here.
    ///
    /// # Errors
    ///
    /// Any violated precondition aborts the call with no state change.
    pub fn open(
        &mut self,
        hub: &mut ReceiptHub,
        receipt_id: &ReceiptId,
        caller: AccountAddress,
        now: Timestamp,
    ) -> Result<DisputeId, DisputeError> {
        if self.paused {
            return Err(DisputeError::Paused);
        }
        let record = hub
            .receipt(receipt_id)
            .ok_or_else(|| ReceiptError::UnknownReceipt {
                receipt: receipt_id.to_string(),
            })
            .map_err(DisputeError::Hub)?;
        if record.status != surety_receipts::ReceiptStatus::Disputed {
            return Err(DisputeError::ReceiptNotDisputed {
                receipt: receipt_id.to_string(),
                status: record.status.as_str().to_string(),
            });
        }
        let executor = record.receipt.executor;
        let dispute = hub
            .dispute(receipt_id)
            .ok_or_else(|| ReceiptError::NoDispute {
                receipt: receipt_id.to_string(),
            })
            .map_err(DisputeError::Hub)?;
        if dispute.challenger != caller {
            return Err(DisputeError::NotChallenger {
                caller: caller.to_string(),
            });
        }
        if dispute.reason.path() != ResolutionPath::Escalated {
            return Err(DisputeError::NotEscalatable {
                reason: dispute.reason.as_str().to_string(),
            });
        }
        if let Some(active) = self.active_by_receipt.get(receipt_id) {
            return Err(DisputeError::ActiveDisputeExists {
                receipt: receipt_id.to_string(),
                dispute: active.to_string(),
            });
        }
        let challenger_bond = dispute.bond;

        hub.mark_escalated(&self.hub_cap, receipt_id)?;
        let id = DisputeId::derive(receipt_id, &caller, &now);
        let counter_deadline = now.plus_secs(self.params.counter_bond_window_secs);
        self.disputes.insert(
            id,
            OptimisticDispute {
                id,
                receipt: *receipt_id,
                executor,
                challenger: caller,
                challenger_bond,
                counter_bond: Amount::ZERO,
                opened_at: now,
                counter_deadline,
                arbitration_deadline: None,
                status: OptimisticDisputeStatus::Open,
                evidence: Vec::new(),
            },
        );
        self.active_by_receipt.insert(*receipt_id, id);
        self.events.push(EngineEvent::Opened {
            dispute: id,
            receipt: *receipt_id,
            challenger: caller,
            counter_deadline,
        });
        tracing::warn!(dispute = %id, receipt = %receipt_id, "optimistic dispute opened");
        Ok(id)
    }

    /// Post the executor's counter-bond, contesting the dispute.
    ///
    /// Only the bound operator, only before the counter-bond deadline,
    /// and the amount must equal the challenger bond. Opens the
    /// arbitration window.
    ///
    /// # Errors
    ///
    /// Any violated precondition aborts the call with no state change.
    pub fn post_counter_bond(
        &mut self,
        registry: &ExecutorRegistry,
        dispute_id: &DisputeId,
        caller: AccountAddress,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), DisputeError> {
        let arbitration_window = self.params.arbitration_window_secs;
        let dispute = self.dispute_in_status(dispute_id, OptimisticDisputeStatus::Open, "post_counter_bond")?;
        if now > dispute.counter_deadline {
            return Err(DisputeError::DeadlinePassed {
                dispute: dispute_id.to_string(),
                deadline: dispute.counter_deadline.to_string(),
                now: now.to_string(),
            });
        }
        let operator = registry
            .executor(&dispute.executor)
            .map(|r| r.operator)
            .ok_or_else(|| RegistryError::UnknownExecutor {
                executor: dispute.executor.to_string(),
            })
            .map_err(DisputeError::Registry)?;
        if caller != operator {
            return Err(DisputeError::NotOperator {
                caller: caller.to_string(),
                executor: dispute.executor.to_string(),
            });
        }
        if amount != dispute.challenger_bond {
            return Err(DisputeError::CounterBondMismatch {
                required: dispute.challenger_bond.base_units(),
                provided: amount.base_units(),
            });
        }

        let arbitration_deadline = now.plus_secs(arbitration_window);
        let dispute = self.dispute_mut(dispute_id)?;
        dispute.counter_bond = amount;
        dispute.status = OptimisticDisputeStatus::Contested;
        dispute.arbitration_deadline = Some(arbitration_deadline);
        self.events.push(EngineEvent::CounterBondPosted {
            dispute: *dispute_id,
            amount,
            arbitration_deadline,
        });
        tracing::info!(dispute = %dispute_id, amount = %amount, "counter-bond posted");
        Ok(())
    }

    /// Append evidence to an unresolved dispute.
    ///
    /// Either party may submit while the dispute is Open (until the
    /// counter-bond deadline) or Contested (until the arbitration
    /// deadline). The log is append-only.
    ///
    /// # Errors
    ///
    /// Rejects non-parties, terminal disputes, and submissions after the
    /// evidence window.
    pub fn submit_evidence(
        &mut self,
        registry: &ExecutorRegistry,
        dispute_id: &DisputeId,
        caller: AccountAddress,
        commitment: ContentDigest,
        now: Timestamp,
    ) -> Result<(), DisputeError> {
        let dispute = self.dispute_or_err(dispute_id)?;
        let window_end = match (dispute.status, dispute.arbitration_deadline) {
            (OptimisticDisputeStatus::Open, _) => dispute.counter_deadline,
            (OptimisticDisputeStatus::Contested, Some(deadline)) => deadline,
            (status, _) => {
                return Err(DisputeError::InvalidStatus {
                    dispute: dispute_id.to_string(),
                    operation: "submit_evidence".to_string(),
                    status: status.as_str().to_string(),
                })
            }
        };
        if now > window_end {
            return Err(DisputeError::EvidenceWindowClosed {
                dispute: dispute_id.to_string(),
                closed_at: window_end.to_string(),
                now: now.to_string(),
            });
        }
        let operator = registry
            .executor(&dispute.executor)
            .map(|r| r.operator)
            .ok_or_else(|| RegistryError::UnknownExecutor {
                executor: dispute.executor.to_string(),
            })
            .map_err(DisputeError::Registry)?;
        if caller != dispute.challenger && caller != operator {
            return Err(DisputeError::NotParty {
                caller: caller.to_string(),
                dispute: dispute_id.to_string(),
            });
        }

        let dispute = self.dispute_mut(dispute_id)?;
        dispute.evidence.push(EvidenceEntry {
            submitted_by: caller,
            commitment,
            submitted_at: now,
        });
        self.events.push(EngineEvent::EvidenceSubmitted {
            dispute: *dispute_id,
            submitted_by: caller,
            commitment,
            at: now,
        });
        Ok(())
    }

    /// Resolve an uncontested dispute after the counter-bond deadline.
    ///
    /// Callable by anyone. The executor is presumed at fault for failing
    /// to contest: the stake locked for the dispute is slashed to the
    /// challenger in full, the challenger's bond returns, and any linked
    /// escrow refunds the depositor.
    ///
    /// # Errors
    ///
    /// Requires Open status and an elapsed counter-bond deadline.
    pub fn resolve_by_timeout(
        &mut self,
        registry: &mut ExecutorRegistry,
        escrows: &mut EscrowLedger,
        hub: &mut ReceiptHub,
        payouts: &mut PayoutLedger,
        dispute_id: &DisputeId,
        now: Timestamp,
    ) -> Result<(), DisputeError> {
        let dispute = self.dispute_in_status(dispute_id, OptimisticDisputeStatus::Open, "resolve_by_timeout")?;
        if now <= dispute.counter_deadline {
            return Err(DisputeError::DeadlineNotReached {
                dispute: dispute_id.to_string(),
                deadline: dispute.counter_deadline.to_string(),
                now: now.to_string(),
            });
        }
        let ctx = self.settle_context(hub, registry, dispute_id)?;
        let slashed = self.challenger_win(registry, escrows, hub, payouts, dispute_id, &ctx, now)?;
        self.events.push(EngineEvent::TimeoutResolved {
            dispute: *dispute_id,
            slashed,
            at: now,
        });
        tracing::warn!(dispute = %dispute_id, slashed = %slashed, "resolved by counter-bond timeout");
        Ok(())
    }

    /// Resolve a contested dispute by arbitration ruling.
    ///
    /// At fault, `locked × slash_percentage / 100` is slashed and split
    /// 70/20/10 (beneficiary/treasury/arbitrator), the remainder
    /// unlocks, the counter-bond is awarded to the challenger, and the
    /// escrow refunds the depositor. Not at fault, everything returns to
    /// the executor — including the challenger's bond — and the escrow
    /// releases to the executor.
    ///
    /// # Errors
    ///
    /// Arbitrator-only; requires Contested status.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_by_arbitration(
        &mut self,
        registry: &mut ExecutorRegistry,
        escrows: &mut EscrowLedger,
        hub: &mut ReceiptHub,
        payouts: &mut PayoutLedger,
        caller: &AccountAddress,
        dispute_id: &DisputeId,
        solver_fault: bool,
        slash_percentage: u8,
        reason: String,
        now: Timestamp,
    ) -> Result<(), DisputeError> {
        if *caller != self.arbitrator {
            return Err(DisputeError::NotArbitrator {
                caller: caller.to_string(),
            });
        }
        self.dispute_in_status(dispute_id, OptimisticDisputeStatus::Contested, "resolve_by_arbitration")?;
        let ctx = self.settle_context(hub, registry, dispute_id)?;

        if solver_fault {
            let slash_amount = ctx.locked.share_percent(slash_percentage)?;
            let leftover = ctx.locked.checked_sub(slash_amount, "arbitration slash")?;
            if !slash_amount.is_zero() {
                registry.slash(
                    &self.registry_cap,
                    &ctx.executor,
                    slash_amount,
                    ctx.receipt,
                    ctx.reason,
                    now,
                )?;
            }
            if !leftover.is_zero() {
                registry.unlock_stake(&self.registry_cap, &ctx.executor, leftover, now)?;
            }
            hub.settle_escalated(&self.hub_cap, registry, &ctx.receipt, true, now)?;
            self.conclude(dispute_id, OptimisticDisputeStatus::ChallengerWins)?;

            let beneficiary = escrows.depositor_for(&ctx.receipt).unwrap_or(ctx.challenger);
            self.refund_escrow_if_active(escrows, payouts, &ctx.receipt, now)?;

            let dist = split_exact(
                slash_amount,
                self.params.arbitration_treasury_bps,
                self.params.arbitration_arbitrator_bps,
            )?;
            payouts.credit(beneficiary, dist.primary, "arbitrated slash beneficiary share")?;
            payouts.credit(self.treasury, dist.secondary, "arbitrated slash treasury share")?;
            payouts.credit(self.arbitrator, dist.tertiary, "arbitrated slash arbitrator share")?;
            payouts.credit(ctx.challenger, ctx.counter_bond, "counter-bond award")?;
            payouts.credit(ctx.challenger, ctx.challenger_bond, "dispute bond return")?;
        } else {
            registry.unlock_stake(&self.registry_cap, &ctx.executor, ctx.locked, now)?;
            hub.settle_escalated(&self.hub_cap, registry, &ctx.receipt, false, now)?;
            self.conclude(dispute_id, OptimisticDisputeStatus::SolverWins)?;

            self.release_escrow_if_active(escrows, payouts, &ctx.receipt, ctx.operator, now)?;
            payouts.credit(ctx.operator, ctx.counter_bond, "counter-bond return")?;
            // Anti-griefing: a cleared executor keeps the challenger bond.
            payouts.credit(ctx.operator, ctx.challenger_bond, "forfeited dispute bond")?;
        }

        self.events.push(EngineEvent::ArbitrationResolved {
            dispute: *dispute_id,
            solver_fault,
            slash_percentage: if solver_fault { slash_percentage } else { 0 },
            reason,
            at: now,
        });
        tracing::warn!(dispute = %dispute_id, solver_fault, "resolved by arbitration");
        Ok(())
    }

    /// Resolve a contested dispute after the arbitration deadline passed
    /// with no ruling.
    ///
    /// Callable by anyone. Defaults to challenger-wins, and additionally
    /// forwards the executor's counter-bond to the challenger — the cost
    /// of arbitrator failure falls on the side that chose to contest.
    ///
    /// # Errors
    ///
    /// Requires Contested status and an elapsed arbitration deadline.
    pub fn resolve_contested_by_timeout(
        &mut self,
        registry: &mut ExecutorRegistry,
        escrows: &mut EscrowLedger,
        hub: &mut ReceiptHub,
        payouts: &mut PayoutLedger,
        dispute_id: &DisputeId,
        now: Timestamp,
    ) -> Result<(), DisputeError> {
        let dispute = self.dispute_in_status(
            dispute_id,
            OptimisticDisputeStatus::Contested,
            "resolve_contested_by_timeout",
        )?;
        let deadline = match dispute.arbitration_deadline {
            Some(deadline) => deadline,
            None => {
                return Err(DisputeError::InvalidStatus {
                    dispute: dispute_id.to_string(),
                    operation: "resolve_contested_by_timeout".to_string(),
                    status: dispute.status.as_str().to_string(),
                })
            }
        };
        if now <= deadline {
            return Err(DisputeError::DeadlineNotReached {
                dispute: dispute_id.to_string(),
                deadline: deadline.to_string(),
                now: now.to_string(),
            });
        }
        let ctx = self.settle_context(hub, registry, dispute_id)?;
        self.challenger_win(registry, escrows, hub, payouts, dispute_id, &ctx, now)?;
        // The counter-bond follows the default verdict.
        payouts.credit(ctx.challenger, ctx.counter_bond, "counter-bond penalty")?;
        self.events.push(EngineEvent::ContestedTimeoutResolved {
            dispute: *dispute_id,
            at: now,
        });
        tracing::warn!(dispute = %dispute_id, "resolved by arbitration timeout");
        Ok(())
    }

    // ── Settlement internals ───────────────────────────────────────────

    /// The shared challenger-wins settlement: full locked stake to the
    /// challenger, bond returned, escrow refunded, receipt slashed.
    fn challenger_win(
        &mut self,
        registry: &mut ExecutorRegistry,
        escrows: &mut EscrowLedger,
        hub: &mut ReceiptHub,
        payouts: &mut PayoutLedger,
        dispute_id: &DisputeId,
        ctx: &SettleContext,
        now: Timestamp,
    ) -> Result<Amount, DisputeError> {
        let slashed = registry.slash(
            &self.registry_cap,
            &ctx.executor,
            ctx.locked,
            ctx.receipt,
            ctx.reason,
            now,
        )?;
        hub.settle_escalated(&self.hub_cap, registry, &ctx.receipt, true, now)?;
        self.conclude(dispute_id, OptimisticDisputeStatus::ChallengerWins)?;

        self.refund_escrow_if_active(escrows, payouts, &ctx.receipt, now)?;
        payouts.credit(ctx.challenger, slashed, "timeout slash award")?;
        payouts.credit(ctx.challenger, ctx.challenger_bond, "dispute bond return")?;
        Ok(slashed)
    }

    fn refund_escrow_if_active(
        &self,
        escrows: &mut EscrowLedger,
        payouts: &mut PayoutLedger,
        receipt: &ReceiptId,
        now: Timestamp,
    ) -> Result<(), DisputeError> {
        let active = escrows
            .escrow_for_receipt(receipt)
            .filter(|e| e.status == EscrowStatus::Active)
            .map(|e| e.id);
        if let Some(id) = active {
            escrows.refund(&self.escrow_cap, &id, payouts, now)?;
        }
        Ok(())
    }

    fn release_escrow_if_active(
        &self,
        escrows: &mut EscrowLedger,
        payouts: &mut PayoutLedger,
        receipt: &ReceiptId,
        recipient: AccountAddress,
        now: Timestamp,
    ) -> Result<(), DisputeError> {
        let active = escrows
            .escrow_for_receipt(receipt)
            .filter(|e| e.status == EscrowStatus::Active)
            .map(|e| e.id);
        if let Some(id) = active {
            escrows.release(&self.escrow_cap, &id, recipient, payouts, now)?;
        }
        Ok(())
    }

    fn settle_context(
        &self,
        hub: &ReceiptHub,
        registry: &ExecutorRegistry,
        dispute_id: &DisputeId,
    ) -> Result<SettleContext, DisputeError> {
        let dispute = self.dispute_or_err(dispute_id)?;
        let hub_dispute = hub
            .dispute(&dispute.receipt)
            .ok_or_else(|| ReceiptError::NoDispute {
                receipt: dispute.receipt.to_string(),
            })
            .map_err(DisputeError::Hub)?;
        let operator = registry
            .executor(&dispute.executor)
            .map(|r| r.operator)
            .ok_or_else(|| RegistryError::UnknownExecutor {
                executor: dispute.executor.to_string(),
            })
            .map_err(DisputeError::Registry)?;
        Ok(SettleContext {
            receipt: dispute.receipt,
            executor: dispute.executor,
            operator,
            challenger: dispute.challenger,
            challenger_bond: dispute.challenger_bond,
            counter_bond: dispute.counter_bond,
            locked: hub_dispute.locked,
            reason: hub_dispute.reason,
        })
    }

    fn conclude(
        &mut self,
        dispute_id: &DisputeId,
        outcome: OptimisticDisputeStatus,
    ) -> Result<(), DisputeError> {
        let dispute = self.dispute_mut(dispute_id)?;
        dispute.status = outcome;
        let receipt = dispute.receipt;
        self.active_by_receipt.remove(&receipt);
        Ok(())
    }

    fn dispute_or_err(&self, dispute_id: &DisputeId) -> Result<&OptimisticDispute, DisputeError> {
        self.disputes
            .get(dispute_id)
            .ok_or_else(|| DisputeError::UnknownDispute {
                dispute: dispute_id.to_string(),
            })
    }

    fn dispute_mut(
        &mut self,
        dispute_id: &DisputeId,
    ) -> Result<&mut OptimisticDispute, DisputeError> {
        self.disputes
            .get_mut(dispute_id)
            .ok_or_else(|| DisputeError::UnknownDispute {
                dispute: dispute_id.to_string(),
            })
    }

    fn dispute_in_status(
        &self,
        dispute_id: &DisputeId,
        status: OptimisticDisputeStatus,
        operation: &str,
    ) -> Result<&OptimisticDispute, DisputeError> {
        let dispute = self.dispute_or_err(dispute_id)?;
        if dispute.status != status {
            return Err(DisputeError::InvalidStatus {
                dispute: dispute_id.to_string(),
                operation: operation.to_string(),
                status: dispute.status.as_str().to_string(),
            });
        }
        Ok(dispute)
    }

    // ── Views ──────────────────────────────────────────────────────────

    /// Look up an optimistic dispute.
    pub fn dispute(&self, dispute_id: &DisputeId) -> Option<&OptimisticDispute> {
        self.disputes.get(dispute_id)
    }

    /// The active optimistic dispute for a receipt, if any.
    pub fn active_dispute_for(&self, receipt: &ReceiptId) -> Option<&OptimisticDispute> {
        self.active_by_receipt
            .get(receipt)
            .and_then(|id| self.disputes.get(id))
    }

    /// Whether the engine is paused for new disputes.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The append-only event log.
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_core::{
        CallerId, ExecutionReceipt, OperatorKeypair, ReceiptSignature, RouteCommitment,
    };
    use surety_escrow::AssetKind;
    use surety_receipts::{NullSink, ReceiptStatus};
    use surety_registry::ExecutorStatus;

    const MIN_STAKE: u64 = 100_000_000;
    const VOLUME: u64 = 50_000_000;
    const BOND: u64 = 10_000_000;
    const ESCROW: u64 = 20_000_000;

    const ADMIN: u8 = 0xAD;
    const TREASURY: u8 = 0xFE;
    const ARBITRATOR: u8 = 0xAB;
    const CHALLENGER: u8 = 0x0C;
    const DEPOSITOR: u8 = 0x55;
    const STRANGER: u8 = 0x66;

    fn addr(byte: u8) -> AccountAddress {
        AccountAddress::from_bytes([byte; 32])
    }

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs)
    }

    fn units(n: u64) -> Amount {
        Amount::from_base_units(n)
    }

    struct Harness {
        registry: ExecutorRegistry,
        hub: ReceiptHub,
        escrows: EscrowLedger,
        engine: OptimisticDisputeEngine,
        payouts: PayoutLedger,
        keypair: OperatorKeypair,
        executor: ExecutorId,
    }

    fn harness() -> Harness {
        let params = ProtocolParams::default();
        let mut registry =
            ExecutorRegistry::new(params.clone(), addr(ADMIN), addr(TREASURY)).unwrap();
        let hub_registry_cap = registry
            .grant_capability(&addr(ADMIN), CallerId::new("receipt-hub"))
            .unwrap();
        let engine_registry_cap = registry
            .grant_capability(&addr(ADMIN), CallerId::new("dispute-engine"))
            .unwrap();

        let mut hub = ReceiptHub::new(
            params.clone(),
            addr(ADMIN),
            addr(TREASURY),
            addr(ARBITRATOR),
            hub_registry_cap,
            Box::new(NullSink),
        )
        .unwrap();
        let hub_cap = hub
            .grant_capability(&addr(ADMIN), CallerId::new("dispute-engine"))
            .unwrap();

        let mut escrows = EscrowLedger::new(addr(ADMIN));
        let escrow_cap = escrows
            .grant_capability(&addr(ADMIN), CallerId::new("dispute-engine"))
            .unwrap();

        let engine = OptimisticDisputeEngine::new(
            params,
            addr(ADMIN),
            addr(ARBITRATOR),
            addr(TREASURY),
            engine_registry_cap,
            escrow_cap,
            hub_cap,
        )
        .unwrap();

        let keypair = OperatorKeypair::from_secret_bytes([7; 32]);
        let executor = registry
            .register(keypair.address(), ContentDigest::of(b"meta"), ts(1_000))
            .unwrap();
        registry
            .deposit_stake(&executor, units(MIN_STAKE), ts(1_100))
            .unwrap();

        Harness {
            registry,
            hub,
            escrows,
            engine,
            payouts: PayoutLedger::new(),
            keypair,
            executor,
        }
    }

    fn signed_receipt(h: &Harness) -> (ExecutionReceipt, ReceiptSignature) {
        let receipt = ExecutionReceipt {
            intent: ContentDigest::of(b"intent-1"),
            constraints: ContentDigest::of(b"constraints"),
            route: RouteCommitment {
                destination: ContentDigest::of(b"destination"),
                asset: ContentDigest::of(b"asset"),
                recipient: ContentDigest::of(b"recipient"),
            },
            outcome: ContentDigest::of(b"outcome"),
            evidence: ContentDigest::of(b"evidence"),
            created_at: ts(9_000),
            expires_at: ts(20_000),
            executor: h.executor,
        };
        let signature = h.keypair.sign_receipt(&receipt.id());
        (receipt, signature)
    }

    fn posted(h: &mut Harness) -> ReceiptId {
        let (receipt, signature) = signed_receipt(h);
        h.hub
            .post_receipt(&h.registry, receipt, signature, units(VOLUME), ts(10_000))
            .unwrap()
    }

    fn hub_disputed(h: &mut Harness, reason: DisputeReason) -> ReceiptId {
        let id = posted(h);
        h.hub
            .open_dispute(
                &mut h.registry,
                addr(CHALLENGER),
                &id,
                reason,
                ContentDigest::of(b"challenger-evidence"),
                units(BOND),
                ts(13_000),
            )
            .unwrap();
        id
    }

    fn escrowed(h: &mut Harness, receipt: ReceiptId) {
        h.escrows
            .create(
                receipt,
                addr(DEPOSITOR),
                AssetKind::Native,
                units(ESCROW),
                ts(10_000_000),
                ts(13_050),
            )
            .unwrap();
    }

    /// Hub dispute at 13 000, engine dispute at 13 100; the counter-bond
    /// deadline lands at 13 100 + 86 400 = 99 500.
    fn opened(h: &mut Harness) -> (ReceiptId, DisputeId) {
        let receipt = hub_disputed(h, DisputeReason::ConstraintViolation);
        escrowed(h, receipt);
        let dispute = h
            .engine
            .open(&mut h.hub, &receipt, addr(CHALLENGER), ts(13_100))
            .unwrap();
        (receipt, dispute)
    }

    fn contested(h: &mut Harness) -> (ReceiptId, DisputeId) {
        let (receipt, dispute) = opened(h);
        h.engine
            .post_counter_bond(
                &h.registry,
                &dispute,
                h.keypair.address(),
                units(BOND),
                ts(50_000),
            )
            .unwrap();
        (receipt, dispute)
    }

    #[test]
    fn open_requires_receipt_disputed() {
        let mut h = harness();
        let receipt = posted(&mut h);
        let result = h
            .engine
            .open(&mut h.hub, &receipt, addr(CHALLENGER), ts(13_100));
        assert!(matches!(result, Err(DisputeError::ReceiptNotDisputed { .. })));
    }

    #[test]
    fn open_requires_original_challenger() {
        let mut h = harness();
        let receipt = hub_disputed(&mut h, DisputeReason::ConstraintViolation);
        let result = h
            .engine
            .open(&mut h.hub, &receipt, addr(STRANGER), ts(13_100));
        assert!(matches!(result, Err(DisputeError::NotChallenger { .. })));
    }

    #[test]
    fn mechanical_reasons_cannot_escalate() {
        let mut h = harness();
        let receipt = hub_disputed(&mut h, DisputeReason::SettlementTimeout);
        let result = h
            .engine
            .open(&mut h.hub, &receipt, addr(CHALLENGER), ts(13_100));
        assert!(matches!(result, Err(DisputeError::NotEscalatable { .. })));
    }

    #[test]
    fn one_active_dispute_per_receipt() {
        let mut h = harness();
        let (receipt, _dispute) = opened(&mut h);
        let second = h
            .engine
            .open(&mut h.hub, &receipt, addr(CHALLENGER), ts(13_200));
        assert!(matches!(second, Err(DisputeError::ActiveDisputeExists { .. })));
    }

    #[test]
    fn hub_arbitration_path_closes_on_escalation() {
        let mut h = harness();
        let (receipt, _dispute) = opened(&mut h);
        let result = h.hub.resolve_escalated_dispute(
            &mut h.registry,
            &h.escrows,
            &mut h.payouts,
            &addr(ARBITRATOR),
            &receipt,
            true,
            ts(14_000),
        );
        assert!(matches!(
            result,
            Err(surety_receipts::ReceiptError::EscalatedToEngine { .. })
        ));
    }

    #[test]
    fn counter_bond_is_operator_only_and_exact() {
        let mut h = harness();
        let (_receipt, dispute) = opened(&mut h);

        let not_operator = h.engine.post_counter_bond(
            &h.registry,
            &dispute,
            addr(STRANGER),
            units(BOND),
            ts(20_000),
        );
        assert!(matches!(not_operator, Err(DisputeError::NotOperator { .. })));

        let wrong_amount = h.engine.post_counter_bond(
            &h.registry,
            &dispute,
            h.keypair.address(),
            units(BOND - 1),
            ts(20_000),
        );
        assert!(matches!(
            wrong_amount,
            Err(DisputeError::CounterBondMismatch { .. })
        ));
    }

    #[test]
    fn counter_bond_rejected_after_deadline() {
        let mut h = harness();
        let (_receipt, dispute) = opened(&mut h);
        let late = h.engine.post_counter_bond(
            &h.registry,
            &dispute,
            h.keypair.address(),
            units(BOND),
            ts(99_501),
        );
        assert!(matches!(late, Err(DisputeError::DeadlinePassed { .. })));
    }

    #[test]
    fn uncontested_timeout_slashes_everything_to_challenger() {
        let mut h = harness();
        let (receipt, dispute) = opened(&mut h);

        let early = h.engine.resolve_by_timeout(
            &mut h.registry,
            &mut h.escrows,
            &mut h.hub,
            &mut h.payouts,
            &dispute,
            ts(99_500),
        );
        assert!(matches!(early, Err(DisputeError::DeadlineNotReached { .. })));

        h.engine
            .resolve_by_timeout(
                &mut h.registry,
                &mut h.escrows,
                &mut h.hub,
                &mut h.payouts,
                &dispute,
                ts(99_501),
            )
            .unwrap();

        // Full locked stake plus the returned bond to the challenger.
        assert_eq!(
            h.payouts.balance(&addr(CHALLENGER)),
            units(VOLUME + BOND)
        );
        // Escrow refunded to the depositor.
        assert_eq!(h.payouts.balance(&addr(DEPOSITOR)), units(ESCROW));

        assert_eq!(
            h.hub.receipt(&receipt).unwrap().status,
            ReceiptStatus::Slashed
        );
        let record = h.registry.executor(&h.executor).unwrap();
        assert_eq!(record.status, ExecutorStatus::Jailed);
        assert_eq!(record.reputation.disputes_lost, 1);
        assert!(record.conservation_holds());
        assert_eq!(
            h.engine.dispute(&dispute).unwrap().status,
            OptimisticDisputeStatus::ChallengerWins
        );

        // Exactly once.
        let again = h.engine.resolve_by_timeout(
            &mut h.registry,
            &mut h.escrows,
            &mut h.hub,
            &mut h.payouts,
            &dispute,
            ts(99_502),
        );
        assert!(matches!(again, Err(DisputeError::InvalidStatus { .. })));
    }

    #[test]
    fn arbitration_without_fault_restores_the_solver() {
        let mut h = harness();
        let (receipt, dispute) = contested(&mut h);

        h.engine
            .resolve_by_arbitration(
                &mut h.registry,
                &mut h.escrows,
                &mut h.hub,
                &mut h.payouts,
                &addr(ARBITRATOR),
                &dispute,
                false,
                0,
                "constraints were satisfied".to_string(),
                ts(100_000),
            )
            .unwrap();

        // Counter-bond and the forfeited challenger bond return to the
        // operator, and the escrow releases to them too.
        let operator = h.keypair.address();
        assert_eq!(
            h.payouts.balance(&operator),
            units(BOND + BOND + ESCROW)
        );
        assert_eq!(h.payouts.balance(&addr(CHALLENGER)), Amount::ZERO);

        let record = h.registry.executor(&h.executor).unwrap();
        assert_eq!(record.available, units(MIN_STAKE));
        assert_eq!(record.locked, Amount::ZERO);
        assert_eq!(record.reputation.successful_fills, 1);
        assert_eq!(record.status, ExecutorStatus::Active);

        assert_eq!(
            h.hub.receipt(&receipt).unwrap().status,
            ReceiptStatus::Finalized
        );
        assert_eq!(
            h.engine.dispute(&dispute).unwrap().status,
            OptimisticDisputeStatus::SolverWins
        );
    }

    #[test]
    fn arbitration_with_fault_splits_70_20_10() {
        let mut h = harness();
        let (receipt, dispute) = contested(&mut h);

        h.engine
            .resolve_by_arbitration(
                &mut h.registry,
                &mut h.escrows,
                &mut h.hub,
                &mut h.payouts,
                &addr(ARBITRATOR),
                &dispute,
                true,
                50,
                "partial constraint violation".to_string(),
                ts(100_000),
            )
            .unwrap();

        // 50 % of the 50M locked stake: 25M split 70/20/10.
        assert_eq!(
            h.payouts.balance(&addr(DEPOSITOR)),
            units(17_500_000 + ESCROW)
        );
        assert_eq!(h.payouts.balance(&addr(TREASURY)), units(5_000_000));
        assert_eq!(h.payouts.balance(&addr(ARBITRATOR)), units(2_500_000));
        // Counter-bond award plus own bond back.
        assert_eq!(h.payouts.balance(&addr(CHALLENGER)), units(BOND + BOND));

        let record = h.registry.executor(&h.executor).unwrap();
        // The unslashed half of the locked stake is back in available.
        assert_eq!(record.available, units(MIN_STAKE - VOLUME + 25_000_000));
        assert_eq!(record.locked, Amount::ZERO);
        assert_eq!(record.status, ExecutorStatus::Jailed);
        assert!(record.conservation_holds());

        assert_eq!(
            h.hub.receipt(&receipt).unwrap().status,
            ReceiptStatus::Slashed
        );
    }

    #[test]
    fn arbitration_is_arbitrator_only() {
        let mut h = harness();
        let (_receipt, dispute) = contested(&mut h);
        let result = h.engine.resolve_by_arbitration(
            &mut h.registry,
            &mut h.escrows,
            &mut h.hub,
            &mut h.payouts,
            &addr(STRANGER),
            &dispute,
            true,
            100,
            "not yours to decide".to_string(),
            ts(100_000),
        );
        assert!(matches!(result, Err(DisputeError::NotArbitrator { .. })));
    }

    #[test]
    fn arbitrator_silence_defaults_to_challenger() {
        let mut h = harness();
        let (receipt, dispute) = contested(&mut h);
        // Contested at 50 000; the arbitration window ends at 654 800.

        let early = h.engine.resolve_contested_by_timeout(
            &mut h.registry,
            &mut h.escrows,
            &mut h.hub,
            &mut h.payouts,
            &dispute,
            ts(654_800),
        );
        assert!(matches!(early, Err(DisputeError::DeadlineNotReached { .. })));

        h.engine
            .resolve_contested_by_timeout(
                &mut h.registry,
                &mut h.escrows,
                &mut h.hub,
                &mut h.payouts,
                &dispute,
                ts(654_801),
            )
            .unwrap();

        // Full locked stake, bond back, and the counter-bond as penalty.
        assert_eq!(
            h.payouts.balance(&addr(CHALLENGER)),
            units(VOLUME + BOND + BOND)
        );
        assert_eq!(h.payouts.balance(&addr(DEPOSITOR)), units(ESCROW));
        assert_eq!(
            h.hub.receipt(&receipt).unwrap().status,
            ReceiptStatus::Slashed
        );
        assert_eq!(
            h.engine.dispute(&dispute).unwrap().status,
            OptimisticDisputeStatus::ChallengerWins
        );
    }

    #[test]
    fn evidence_is_append_only_and_party_gated() {
        let mut h = harness();
        let (_receipt, dispute) = opened(&mut h);

        h.engine
            .submit_evidence(
                &h.registry,
                &dispute,
                addr(CHALLENGER),
                ContentDigest::of(b"exhibit-a"),
                ts(14_000),
            )
            .unwrap();
        h.engine
            .submit_evidence(
                &h.registry,
                &dispute,
                h.keypair.address(),
                ContentDigest::of(b"exhibit-b"),
                ts(15_000),
            )
            .unwrap();

        let stranger = h.engine.submit_evidence(
            &h.registry,
            &dispute,
            addr(STRANGER),
            ContentDigest::of(b"exhibit-c"),
            ts(16_000),
        );
        assert!(matches!(stranger, Err(DisputeError::NotParty { .. })));

        let log = &h.engine.dispute(&dispute).unwrap().evidence;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].commitment, ContentDigest::of(b"exhibit-a"));
        assert_eq!(log[1].commitment, ContentDigest::of(b"exhibit-b"));
    }

    #[test]
    fn evidence_rejected_after_window() {
        let mut h = harness();
        let (_receipt, dispute) = opened(&mut h);
        let late = h.engine.submit_evidence(
            &h.registry,
            &dispute,
            addr(CHALLENGER),
            ContentDigest::of(b"too-late"),
            ts(99_501),
        );
        assert!(matches!(late, Err(DisputeError::EvidenceWindowClosed { .. })));
    }

    #[test]
    fn paused_engine_rejects_new_disputes() {
        let mut h = harness();
        let receipt = hub_disputed(&mut h, DisputeReason::ConstraintViolation);
        h.engine.pause(&addr(ADMIN), ts(13_050)).unwrap();
        let result = h
            .engine
            .open(&mut h.hub, &receipt, addr(CHALLENGER), ts(13_100));
        assert!(matches!(result, Err(DisputeError::Paused)));
    }

    #[test]
    fn dispute_serialization_roundtrip() {
        let mut h = harness();
        let (_receipt, dispute_id) = opened(&mut h);
        let dispute = h.engine.dispute(&dispute_id).unwrap();
        let json = serde_json::to_string(dispute).unwrap();
        let back: OptimisticDispute = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, dispute.id);
        assert_eq!(back.status, dispute.status);
        assert_eq!(back.challenger_bond, dispute.challenger_bond);
    }
}
