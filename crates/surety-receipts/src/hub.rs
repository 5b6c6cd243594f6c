//! # The Receipt Hub
//!
//! The state machine at the center of the ledger: receipts enter here,
//! run their challenge window, and leave Finalized or Slashed.
//!
//! ## Security Invariant
//!
//! Every entry point is check-then-mutate, and every fund movement is a
//! payout-ledger credit issued only after the receipt status, dispute
//! record, and registry balances have been updated. Slash distributions
//! are computed remainder-first, so the shares always sum to exactly the
//! slashed amount.

use std::collections::{BTreeSet, HashMap};

use surety_core::{
    split_exact, verify_receipt_signature, AccountAddress, Amount, CallerId, ContentDigest,
    DisputeReason, ExecutionReceipt, ExecutorId, ProtocolParams, ReceiptId, ReceiptSignature,
    ResolutionPath, Timestamp,
};
use surety_escrow::{EscrowLedger, PayoutLedger};
use surety_registry::{ExecutorRegistry, ExecutorStatus, RegistryCapability, RegistryError};

use crate::error::ReceiptError;
use crate::event::HubEvent;
use crate::record::{DisputeRecord, ReceiptRecord, ReceiptStatus};
use crate::settlement::SettlementAttestation;
use crate::sink::{ReputationSink, ReputationUpdate, SettlementOutcome};

/// An unforgeable proof that the holder was issued hub settlement or
/// attestation authority under a caller id.
///
/// Held by the optimistic dispute engine (for the escalated settlement
/// callback) and by settlement adapters (for attestation ingestion).
#[derive(Debug, Clone)]
pub struct HubCapability {
    issued_to: CallerId,
}

impl HubCapability {
    /// The caller id this capability was issued under.
    pub fn issued_to(&self) -> &CallerId {
        &self.issued_to
    }
}

/// Copies of everything a dispute settlement needs, taken before any
/// mutation begins.
struct DisputeContext {
    executor: ExecutorId,
    operator: AccountAddress,
    challenger: AccountAddress,
    reason: DisputeReason,
    bond: Amount,
    locked: Amount,
    evidence: ContentDigest,
    volume: Amount,
}

/// The receipt hub component.
pub struct ReceiptHub {
    params: ProtocolParams,
    admin: AccountAddress,
    treasury: AccountAddress,
    arbitrator: AccountAddress,
    registry_cap: RegistryCapability,
    paused: bool,
    receipts: HashMap<ReceiptId, ReceiptRecord>,
    disputes: HashMap<ReceiptId, DisputeRecord>,
    attestations: HashMap<ReceiptId, SettlementAttestation>,
    authorized: BTreeSet<CallerId>,
    sink: Box<dyn ReputationSink>,
    events: Vec<HubEvent>,
}

impl ReceiptHub {
    /// Create a hub with validated parameters.
    ///
    /// `registry_cap` must have been issued by the executor registry this
    /// hub will be wired to; `sink` receives best-effort outcome pushes.
    ///
    /// # Errors
    ///
    /// Returns the parameter validation error unchanged.
    pub fn new(
        params: ProtocolParams,
        admin: AccountAddress,
        treasury: AccountAddress,
        arbitrator: AccountAddress,
        registry_cap: RegistryCapability,
        sink: Box<dyn ReputationSink>,
    ) -> Result<Self, surety_core::ParamsError> {
        params.validate()?;
        Ok(Self {
            params,
            admin,
            treasury,
            arbitrator,
            registry_cap,
            paused: false,
            receipts: HashMap::new(),
            disputes: HashMap::new(),
            attestations: HashMap::new(),
            authorized: BTreeSet::new(),
            sink,
            events: Vec::new(),
        })
    }

    // ── Administration ─────────────────────────────────────────────────

    fn require_admin(&self, caller: &AccountAddress) -> Result<(), ReceiptError> {
        if *caller != self.admin {
            return Err(ReceiptError::NotAdmin {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    fn require_authorized(&self, cap: &HubCapability) -> Result<(), ReceiptError> {
        if !self.authorized.contains(cap.issued_to()) {
            return Err(ReceiptError::NotAuthorized {
                caller: cap.issued_to().to_string(),
            });
        }
        Ok(())
    }

    /// Issue hub settlement/attestation authority under `caller_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotAdmin`] unless called by the admin.
    pub fn grant_capability(
        &mut self,
        caller: &AccountAddress,
        caller_id: CallerId,
    ) -> Result<HubCapability, ReceiptError> {
        self.require_admin(caller)?;
        self.authorized.insert(caller_id.clone());
        Ok(HubCapability {
            issued_to: caller_id,
        })
    }

    /// Revoke hub authority from `caller_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotAdmin`] unless called by the admin.
    pub fn revoke_capability(
        &mut self,
        caller: &AccountAddress,
        caller_id: &CallerId,
    ) -> Result<(), ReceiptError> {
        self.require_admin(caller)?;
        self.authorized.remove(caller_id);
        Ok(())
    }

    /// Block new receipts and new disputes. Open timers are unaffected:
    /// finalize and every resolve path keep working while paused.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotAdmin`] unless called by the admin.
    pub fn pause(&mut self, caller: &AccountAddress, now: Timestamp) -> Result<(), ReceiptError> {
        self.require_admin(caller)?;
        self.paused = true;
        self.events.push(HubEvent::Paused { at: now });
        tracing::warn!("receipt hub paused");
        Ok(())
    }

    /// Re-open the hub for new receipts and disputes.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotAdmin`] unless called by the admin.
    pub fn unpause(&mut self, caller: &AccountAddress, now: Timestamp) -> Result<(), ReceiptError> {
        self.require_admin(caller)?;
        self.paused = false;
        self.events.push(HubEvent::Unpaused { at: now });
        Ok(())
    }

    /// Rotate the arbitrator address.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotAdmin`] unless called by the admin.
    pub fn rotate_arbitrator(
        &mut self,
        caller: &AccountAddress,
        arbitrator: AccountAddress,
    ) -> Result<(), ReceiptError> {
        self.require_admin(caller)?;
        self.arbitrator = arbitrator;
        Ok(())
    }

    /// Rotate the treasury address.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotAdmin`] unless called by the admin.
    pub fn rotate_treasury(
        &mut self,
        caller: &AccountAddress,
        treasury: AccountAddress,
    ) -> Result<(), ReceiptError> {
        self.require_admin(caller)?;
        self.treasury = treasury;
        Ok(())
    }

    // ── Receipt lifecycle ──────────────────────────────────────────────

    /// Post a signed execution receipt, opening its challenge window.
    ///
    /// Validates that the executor is Active, the operator signature
    /// covers the content digest, the content hash is unused, the expiry
    /// is in the future, and available stake covers the declared volume.
    ///
    /// # Errors
    ///
    /// Any violated precondition aborts the call with no state change.
    pub fn post_receipt(
        &mut self,
        registry: &ExecutorRegistry,
        receipt: ExecutionReceipt,
        signature: ReceiptSignature,
        declared_volume: Amount,
        now: Timestamp,
    ) -> Result<ReceiptId, ReceiptError> {
        if self.paused {
            return Err(ReceiptError::Paused);
        }
        if declared_volume.is_zero() {
            return Err(ReceiptError::ZeroVolume);
        }
        let executor = registry.executor(&receipt.executor).ok_or_else(|| {
            ReceiptError::Registry(RegistryError::UnknownExecutor {
                executor: receipt.executor.to_string(),
            })
        })?;
        if executor.status != ExecutorStatus::Active {
            return Err(ReceiptError::ExecutorNotActive {
                executor: receipt.executor.to_string(),
                status: executor.status.as_str().to_string(),
            });
        }

        let id = receipt.id();
        verify_receipt_signature(&executor.operator, &id, &signature)?;
        if self.receipts.contains_key(&id) {
            return Err(ReceiptError::DuplicateReceipt {
                receipt: id.to_string(),
            });
        }
        if receipt.expires_at <= now {
            return Err(ReceiptError::ExpiryNotFuture {
                receipt: id.to_string(),
                expires_at: receipt.expires_at.to_string(),
                now: now.to_string(),
            });
        }
        let required = declared_volume.share_bps(self.params.coverage_bps)?;
        if executor.available < required {
            return Err(ReceiptError::InsufficientCoverage {
                executor: receipt.executor.to_string(),
                required: required.base_units(),
                available: executor.available.base_units(),
            });
        }

        let challenge_deadline = now.plus_secs(self.params.challenge_window_secs);
        let executor_id = receipt.executor;
        self.receipts.insert(
            id,
            ReceiptRecord {
                id,
                receipt,
                signature,
                declared_volume,
                posted_at: now,
                challenge_deadline,
                status: ReceiptStatus::Posted,
                resolved_at: None,
            },
        );
        self.events.push(HubEvent::ReceiptPosted {
            receipt: id,
            executor: executor_id,
            volume: declared_volume,
            challenge_deadline,
        });
        tracing::info!(receipt = %id, executor = %executor_id, volume = %declared_volume, "receipt posted");
        Ok(id)
    }

    /// Open a dispute against a posted receipt.
    ///
    /// The attached bond must equal the required fraction of the
    /// executor's total stake; the declared volume (capped by available
    /// stake) is locked through the registry.
    ///
    /// # Errors
    ///
    /// Permitted only while Posted and only inside the challenge window.
    pub fn open_dispute(
        &mut self,
        registry: &mut ExecutorRegistry,
        challenger: AccountAddress,
        receipt_id: &ReceiptId,
        reason: DisputeReason,
        evidence: ContentDigest,
        bond: Amount,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        if self.paused {
            return Err(ReceiptError::Paused);
        }
        let record = self.receipt_or_err(receipt_id)?;
        if record.status != ReceiptStatus::Posted {
            return Err(ReceiptError::InvalidStatus {
                receipt: receipt_id.to_string(),
                operation: "open_dispute".to_string(),
                status: record.status.as_str().to_string(),
            });
        }
        if now > record.challenge_deadline {
            return Err(ReceiptError::ChallengeWindowClosed {
                receipt: receipt_id.to_string(),
                closed_at: record.challenge_deadline.to_string(),
                now: now.to_string(),
            });
        }
        let executor_id = record.receipt.executor;
        let volume = record.declared_volume;
        let executor = registry.executor(&executor_id).ok_or_else(|| {
            ReceiptError::Registry(RegistryError::UnknownExecutor {
                executor: executor_id.to_string(),
            })
        })?;
        let required_bond = executor.total_stake().share_bps(self.params.dispute_bond_bps)?;
        if bond != required_bond {
            return Err(ReceiptError::BondMismatch {
                required: required_bond.base_units(),
                provided: bond.base_units(),
            });
        }
        let lock_amount = volume.min(executor.available);
        if lock_amount.is_zero() {
            return Err(ReceiptError::NothingAtStake {
                receipt: receipt_id.to_string(),
            });
        }

        registry.lock_stake(&self.registry_cap, &executor_id, lock_amount, now)?;
        registry.record_dispute_opened(&self.registry_cap, &executor_id)?;
        self.transition(receipt_id, ReceiptStatus::Disputed, now)?;
        self.disputes.insert(
            *receipt_id,
            DisputeRecord {
                receipt: *receipt_id,
                challenger,
                reason,
                evidence,
                bond,
                locked: lock_amount,
                opened_at: now,
                escalated_to_engine: false,
                resolved: false,
            },
        );
        self.events.push(HubEvent::DisputeOpened {
            receipt: *receipt_id,
            challenger,
            reason,
            bond,
            locked: lock_amount,
            at: now,
        });
        tracing::warn!(receipt = %receipt_id, challenger = %challenger, reason = %reason, "dispute opened");
        Ok(())
    }

    /// Finalize a receipt whose challenge window elapsed undisputed.
    ///
    /// Idempotence is by rejection: the first call moves the receipt to
    /// Finalized, any repeat fails deterministically on the status check.
    ///
    /// # Errors
    ///
    /// Requires Posted status and an elapsed window.
    pub fn finalize(
        &mut self,
        registry: &mut ExecutorRegistry,
        receipt_id: &ReceiptId,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        let record = self.receipt_or_err(receipt_id)?;
        if record.status != ReceiptStatus::Posted {
            return Err(ReceiptError::InvalidStatus {
                receipt: receipt_id.to_string(),
                operation: "finalize".to_string(),
                status: record.status.as_str().to_string(),
            });
        }
        if now <= record.challenge_deadline {
            return Err(ReceiptError::ChallengeWindowOpen {
                receipt: receipt_id.to_string(),
                closes_at: record.challenge_deadline.to_string(),
                now: now.to_string(),
            });
        }
        let executor = record.receipt.executor;
        let volume = record.declared_volume;
        let evidence = record.receipt.evidence;

        registry.record_fill(&self.registry_cap, &executor, volume, now)?;
        self.transition(receipt_id, ReceiptStatus::Finalized, now)?;
        self.events.push(HubEvent::ReceiptFinalized {
            receipt: *receipt_id,
            at: now,
        });
        tracing::info!(receipt = %receipt_id, executor = %executor, "receipt finalized");
        self.publish_outcome(*receipt_id, executor, SettlementOutcome::Finalized, evidence, volume);
        Ok(())
    }

    /// Resolve a dispute whose reason code is mechanically checkable.
    ///
    /// Callable by anyone: the verdict is a pure function of ledger
    /// state. At fault, the locked stake is slashed and distributed
    /// 80/15/5 (beneficiary/challenger/treasury) and the bond returns to
    /// the challenger; not at fault, the stake unlocks and the bond is
    /// forfeited to the executor. Returns whether the executor was at
    /// fault.
    ///
    /// # Errors
    ///
    /// Rejects escalated-path reasons and conditions that cannot be
    /// decided yet (e.g., expiry not reached).
    pub fn resolve_deterministic(
        &mut self,
        registry: &mut ExecutorRegistry,
        escrows: &EscrowLedger,
        payouts: &mut PayoutLedger,
        receipt_id: &ReceiptId,
        now: Timestamp,
    ) -> Result<bool, ReceiptError> {
        let ctx = self.disputed_context(registry, receipt_id, "resolve_deterministic")?;
        if ctx.reason.path() != ResolutionPath::Deterministic {
            return Err(ReceiptError::WrongPath {
                receipt: receipt_id.to_string(),
                reason: ctx.reason.as_str().to_string(),
                attempted: "deterministic".to_string(),
            });
        }
        let fault = self.mechanical_verdict(receipt_id, &ctx, now)?;
        if fault {
            let beneficiary = escrows.depositor_for(receipt_id).unwrap_or(ctx.challenger);
            self.settle_fault(registry, payouts, receipt_id, &ctx, beneficiary, now)?;
        } else {
            self.settle_no_fault(registry, payouts, receipt_id, &ctx, now)?;
        }
        Ok(fault)
    }

    /// Resolve an escalated dispute after arbitration review.
    ///
    /// The arbitration fallback for subjective reason codes when no
    /// optimistic dispute was opened. Distribution and stake-unlock
    /// logic match the deterministic path.
    ///
    /// # Errors
    ///
    /// Arbitrator-only; requires an escalated-path dispute in Disputed
    /// status.
    pub fn resolve_escalated_dispute(
        &mut self,
        registry: &mut ExecutorRegistry,
        escrows: &EscrowLedger,
        payouts: &mut PayoutLedger,
        caller: &AccountAddress,
        receipt_id: &ReceiptId,
        executor_fault: bool,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        if *caller != self.arbitrator {
            return Err(ReceiptError::NotArbitrator {
                caller: caller.to_string(),
            });
        }
        let ctx = self.disputed_context(registry, receipt_id, "resolve_escalated_dispute")?;
        if ctx.reason.path() != ResolutionPath::Escalated {
            return Err(ReceiptError::WrongPath {
                receipt: receipt_id.to_string(),
                reason: ctx.reason.as_str().to_string(),
                attempted: "escalated".to_string(),
            });
        }
        if self
            .disputes
            .get(receipt_id)
            .map(|d| d.escalated_to_engine)
            .unwrap_or(false)
        {
            return Err(ReceiptError::EscalatedToEngine {
                receipt: receipt_id.to_string(),
            });
        }
        if executor_fault {
            let beneficiary = escrows.depositor_for(receipt_id).unwrap_or(ctx.challenger);
            self.settle_fault(registry, payouts, receipt_id, &ctx, beneficiary, now)?;
        } else {
            self.settle_no_fault(registry, payouts, receipt_id, &ctx, now)?;
        }
        Ok(())
    }

    /// Hand an escalated dispute to the optimistic engine.
    ///
    /// Called by the engine when an optimistic dispute opens. From this
    /// point the hub's own arbitration path rejects the dispute; the
    /// engine settles it through [`settle_escalated`](Self::settle_escalated).
    ///
    /// # Errors
    ///
    /// Requires a valid hub capability and an unescalated, escalated-path
    /// dispute in Disputed status.
    pub fn mark_escalated(
        &mut self,
        cap: &HubCapability,
        receipt_id: &ReceiptId,
    ) -> Result<(), ReceiptError> {
        self.require_authorized(cap)?;
        let record = self.receipt_or_err(receipt_id)?;
        if record.status != ReceiptStatus::Disputed {
            return Err(ReceiptError::InvalidStatus {
                receipt: receipt_id.to_string(),
                operation: "mark_escalated".to_string(),
                status: record.status.as_str().to_string(),
            });
        }
        let dispute = self
            .disputes
            .get_mut(receipt_id)
            .ok_or_else(|| ReceiptError::NoDispute {
                receipt: receipt_id.to_string(),
            })?;
        if dispute.reason.path() != ResolutionPath::Escalated {
            return Err(ReceiptError::WrongPath {
                receipt: receipt_id.to_string(),
                reason: dispute.reason.as_str().to_string(),
                attempted: "escalated".to_string(),
            });
        }
        if dispute.escalated_to_engine {
            return Err(ReceiptError::EscalatedToEngine {
                receipt: receipt_id.to_string(),
            });
        }
        dispute.escalated_to_engine = true;
        tracing::info!(receipt = %receipt_id, "dispute escalated to optimistic engine");
        Ok(())
    }

    /// Settle an escalated dispute on behalf of the optimistic engine.
    ///
    /// The engine performs its own slashing, bond routing, and escrow
    /// settlement; this callback only moves the receipt to its terminal
    /// status, jails on fault, records the fill on no-fault, and pushes
    /// the outcome to the reputation sink.
    ///
    /// # Errors
    ///
    /// Requires a valid hub capability and an escalated-path dispute in
    /// Disputed status.
    pub fn settle_escalated(
        &mut self,
        cap: &HubCapability,
        registry: &mut ExecutorRegistry,
        receipt_id: &ReceiptId,
        executor_fault: bool,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        self.require_authorized(cap)?;
        let ctx = self.disputed_context(registry, receipt_id, "settle_escalated")?;
        if ctx.reason.path() != ResolutionPath::Escalated {
            return Err(ReceiptError::WrongPath {
                receipt: receipt_id.to_string(),
                reason: ctx.reason.as_str().to_string(),
                attempted: "escalated".to_string(),
            });
        }
        if executor_fault {
            self.jail_unless_banned(registry, &ctx.executor, now)?;
            self.transition(receipt_id, ReceiptStatus::Slashed, now)?;
        } else {
            registry.record_fill(&self.registry_cap, &ctx.executor, ctx.volume, now)?;
            self.transition(receipt_id, ReceiptStatus::Finalized, now)?;
        }
        self.events.push(HubEvent::EscalatedSettled {
            receipt: *receipt_id,
            executor_fault,
            at: now,
        });
        let outcome = if executor_fault {
            SettlementOutcome::Slashed
        } else {
            SettlementOutcome::Finalized
        };
        self.publish_outcome(*receipt_id, ctx.executor, outcome, ctx.evidence, ctx.volume);
        Ok(())
    }

    /// Record what a settlement adapter observed for a receipt.
    ///
    /// At most one attestation per receipt, never modified afterwards.
    ///
    /// # Errors
    ///
    /// Requires a valid hub capability and an unattested, known receipt.
    pub fn record_settlement(
        &mut self,
        cap: &HubCapability,
        receipt_id: &ReceiptId,
        destination: ContentDigest,
        asset: ContentDigest,
        recipient: ContentDigest,
        settled_at: Timestamp,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        self.require_authorized(cap)?;
        self.receipt_or_err(receipt_id)?;
        if self.attestations.contains_key(receipt_id) {
            return Err(ReceiptError::AttestationAlreadyRecorded {
                receipt: receipt_id.to_string(),
            });
        }
        self.attestations.insert(
            *receipt_id,
            SettlementAttestation {
                receipt: *receipt_id,
                destination,
                asset,
                recipient,
                settled_at,
                recorded_at: now,
            },
        );
        self.events.push(HubEvent::SettlementRecorded {
            receipt: *receipt_id,
            at: now,
        });
        tracing::info!(receipt = %receipt_id, "settlement attested");
        Ok(())
    }

    // ── Settlement internals ───────────────────────────────────────────

    fn settle_fault(
        &mut self,
        registry: &mut ExecutorRegistry,
        payouts: &mut PayoutLedger,
        receipt_id: &ReceiptId,
        ctx: &DisputeContext,
        beneficiary: AccountAddress,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        let slashed = registry.slash(
            &self.registry_cap,
            &ctx.executor,
            ctx.locked,
            *receipt_id,
            ctx.reason,
            now,
        )?;
        self.jail_unless_banned(registry, &ctx.executor, now)?;
        self.transition(receipt_id, ReceiptStatus::Slashed, now)?;

        let dist = split_exact(
            slashed,
            self.params.slash_challenger_bps,
            self.params.slash_treasury_bps,
        )?;
        payouts.credit(beneficiary, dist.primary, "slash beneficiary share")?;
        payouts.credit(ctx.challenger, dist.secondary, "slash challenger share")?;
        payouts.credit(self.treasury, dist.tertiary, "slash treasury share")?;
        payouts.credit(ctx.challenger, ctx.bond, "dispute bond return")?;

        self.events.push(HubEvent::ReceiptSlashed {
            receipt: *receipt_id,
            slashed,
            at: now,
        });
        tracing::warn!(receipt = %receipt_id, executor = %ctx.executor, slashed = %slashed, "receipt slashed");
        self.publish_outcome(
            *receipt_id,
            ctx.executor,
            SettlementOutcome::Slashed,
            ctx.evidence,
            ctx.volume,
        );
        Ok(())
    }

    fn settle_no_fault(
        &mut self,
        registry: &mut ExecutorRegistry,
        payouts: &mut PayoutLedger,
        receipt_id: &ReceiptId,
        ctx: &DisputeContext,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        registry.unlock_stake(&self.registry_cap, &ctx.executor, ctx.locked, now)?;
        registry.record_fill(&self.registry_cap, &ctx.executor, ctx.volume, now)?;
        self.transition(receipt_id, ReceiptStatus::Finalized, now)?;

        // Anti-griefing: the challenger's bond goes to the operator.
        payouts.credit(ctx.operator, ctx.bond, "forfeited dispute bond")?;

        self.events.push(HubEvent::ReceiptFinalized {
            receipt: *receipt_id,
            at: now,
        });
        tracing::info!(receipt = %receipt_id, executor = %ctx.executor, "dispute resolved without fault");
        self.publish_outcome(
            *receipt_id,
            ctx.executor,
            SettlementOutcome::Finalized,
            ctx.evidence,
            ctx.volume,
        );
        Ok(())
    }

    fn mechanical_verdict(
        &self,
        receipt_id: &ReceiptId,
        ctx: &DisputeContext,
        now: Timestamp,
    ) -> Result<bool, ReceiptError> {
        let record = self.receipt_or_err(receipt_id)?;
        let expires_at = record.receipt.expires_at;
        match ctx.reason {
            DisputeReason::InvalidSignature => {
                Ok(verify_receipt_signature(&ctx.operator, receipt_id, &record.signature).is_err())
            }
            DisputeReason::SettlementTimeout => {
                if now <= expires_at {
                    return Err(ReceiptError::NotYetDecidable {
                        receipt: receipt_id.to_string(),
                        reason: ctx.reason.as_str().to_string(),
                    });
                }
                Ok(match self.attestations.get(receipt_id) {
                    None => true,
                    Some(a) => a.settled_at > expires_at,
                })
            }
            DisputeReason::WrongDestination
            | DisputeReason::WrongAsset
            | DisputeReason::WrongRecipient => match self.attestations.get(receipt_id) {
                Some(a) => Ok(match ctx.reason {
                    DisputeReason::WrongDestination => {
                        a.destination != record.receipt.route.destination
                    }
                    DisputeReason::WrongAsset => a.asset != record.receipt.route.asset,
                    _ => a.recipient != record.receipt.route.recipient,
                }),
                // No settlement at all after expiry is provable fault on
                // any route code; before expiry it is simply undecided.
                None if now > expires_at => Ok(true),
                None => Err(ReceiptError::NotYetDecidable {
                    receipt: receipt_id.to_string(),
                    reason: ctx.reason.as_str().to_string(),
                }),
            },
            _ => Err(ReceiptError::WrongPath {
                receipt: receipt_id.to_string(),
                reason: ctx.reason.as_str().to_string(),
                attempted: "deterministic".to_string(),
            }),
        }
    }

    fn disputed_context(
        &self,
        registry: &ExecutorRegistry,
        receipt_id: &ReceiptId,
        operation: &str,
    ) -> Result<DisputeContext, ReceiptError> {
        let record = self.receipt_or_err(receipt_id)?;
        if record.status != ReceiptStatus::Disputed {
            return Err(ReceiptError::InvalidStatus {
                receipt: receipt_id.to_string(),
                operation: operation.to_string(),
                status: record.status.as_str().to_string(),
            });
        }
        let dispute = self
            .disputes
            .get(receipt_id)
            .ok_or_else(|| ReceiptError::NoDispute {
                receipt: receipt_id.to_string(),
            })?;
        let executor_id = record.receipt.executor;
        let executor = registry.executor(&executor_id).ok_or_else(|| {
            ReceiptError::Registry(RegistryError::UnknownExecutor {
                executor: executor_id.to_string(),
            })
        })?;
        Ok(DisputeContext {
            executor: executor_id,
            operator: executor.operator,
            challenger: dispute.challenger,
            reason: dispute.reason,
            bond: dispute.bond,
            locked: dispute.locked,
            evidence: dispute.evidence,
            volume: record.declared_volume,
        })
    }

    fn jail_unless_banned(
        &self,
        registry: &mut ExecutorRegistry,
        executor: &ExecutorId,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        let already_banned = registry
            .executor(executor)
            .map(|r| r.status == ExecutorStatus::Banned)
            .unwrap_or(false);
        if !already_banned {
            registry.jail(&self.registry_cap, executor, now)?;
        }
        Ok(())
    }

    fn transition(
        &mut self,
        receipt_id: &ReceiptId,
        to: ReceiptStatus,
        now: Timestamp,
    ) -> Result<(), ReceiptError> {
        let record = self
            .receipts
            .get_mut(receipt_id)
            .ok_or_else(|| ReceiptError::UnknownReceipt {
                receipt: receipt_id.to_string(),
            })?;
        if !record.status.can_transition_to(to) {
            return Err(ReceiptError::InvalidStatus {
                receipt: receipt_id.to_string(),
                operation: format!("transition to {to}"),
                status: record.status.as_str().to_string(),
            });
        }
        record.status = to;
        if to.is_terminal() {
            record.resolved_at = Some(now);
            if let Some(dispute) = self.disputes.get_mut(receipt_id) {
                dispute.resolved = true;
            }
        }
        Ok(())
    }

    fn publish_outcome(
        &mut self,
        receipt: ReceiptId,
        executor: ExecutorId,
        outcome: SettlementOutcome,
        evidence: ContentDigest,
        volume: Amount,
    ) {
        let update = ReputationUpdate {
            receipt,
            executor,
            outcome,
            evidence,
            volume,
        };
        if let Err(err) = self.sink.publish(&update) {
            tracing::warn!(receipt = %receipt, error = %err, "reputation publish failed; outcome settled regardless");
            self.events.push(HubEvent::ReputationPublishFailed {
                receipt,
                error: err.to_string(),
            });
        }
    }

    fn receipt_or_err(&self, receipt_id: &ReceiptId) -> Result<&ReceiptRecord, ReceiptError> {
        self.receipts
            .get(receipt_id)
            .ok_or_else(|| ReceiptError::UnknownReceipt {
                receipt: receipt_id.to_string(),
            })
    }

    // ── Views ──────────────────────────────────────────────────────────

    /// Look up a receipt record.
    pub fn receipt(&self, receipt_id: &ReceiptId) -> Option<&ReceiptRecord> {
        self.receipts.get(receipt_id)
    }

    /// Look up the dispute opened against a receipt, if any.
    pub fn dispute(&self, receipt_id: &ReceiptId) -> Option<&DisputeRecord> {
        self.disputes.get(receipt_id)
    }

    /// Look up the settlement attestation for a receipt, if any.
    pub fn attestation(&self, receipt_id: &ReceiptId) -> Option<&SettlementAttestation> {
        self.attestations.get(receipt_id)
    }

    /// Whether the hub is paused for new receipts and disputes.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The current arbitrator address.
    pub fn arbitrator(&self) -> &AccountAddress {
        &self.arbitrator
    }

    /// The protocol parameters this hub was built with.
    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    /// The append-only event log.
    pub fn events(&self) -> &[HubEvent] {
        &self.events
    }
}
