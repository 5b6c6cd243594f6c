//! # Escrow Ledger
//!
//! Holds a depositor's funds against exactly one receipt until a dispute
//! outcome releases them to the executor or refunds the depositor.
//!
//! ## Security Invariant
//!
//! An escrow's amount never changes after creation except by release or
//! refund, each of which fires at most once. Terminal statuses
//! (Released, Refunded) reject all further operations. Settlement entry
//! points are capability-gated; only the dispute engine holds an
//! [`EscrowCapability`] in a standard deployment. The permissionless
//! exception is [`EscrowLedger::refund_expired`], which guarantees no
//! depositor's funds can be frozen forever by an absent engine.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use surety_core::{
    AccountAddress, Amount, CallerId, ContentDigest, EscrowId, ReceiptId, Timestamp,
};

use crate::error::EscrowError;
use crate::payout::PayoutLedger;

/// The asset an escrow holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// The ledger's native currency.
    Native,
    /// A fungible token, identified by the digest of its issuer id.
    Token(ContentDigest),
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Token(id) => write!(f, "token:{}", id.to_hex()),
        }
    }
}

/// The status of an escrow account.
///
/// Status machine: `Active → [Released | Refunded]`. Both successors are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EscrowStatus {
    /// Funds are held pending a dispute outcome.
    Active,
    /// Funds were released to the executor. Terminal state.
    Released,
    /// Funds were returned to the depositor. Terminal state.
    Refunded,
}

impl EscrowStatus {
    /// Whether this status is terminal (no further operations allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Released | Self::Refunded)
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Released => "RELEASED",
            Self::Refunded => "REFUNDED",
        }
    }
}

impl std::fmt::Display for EscrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An escrow account holding funds against one receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Escrow {
    /// Unique escrow account identifier.
    pub id: EscrowId,
    /// The receipt this escrow is tied to.
    pub receipt: ReceiptId,
    /// Who deposited the funds (and receives any refund).
    pub depositor: AccountAddress,
    /// The asset held.
    pub asset: AssetKind,
    /// The held amount; immutable after creation.
    pub amount: Amount,
    /// Current status.
    pub status: EscrowStatus,
    /// After this deadline anyone may trigger a refund.
    pub deadline: Timestamp,
    /// When the escrow was created.
    pub created_at: Timestamp,
}

/// An unforgeable proof that the holder was issued escrow settlement
/// authority under a caller id.
///
/// Constructed only by [`EscrowLedger::grant_capability`]; the private
/// field keeps it unforgeable outside this crate. Authority is checked
/// against the revocable allow-list at every call.
#[derive(Debug, Clone)]
pub struct EscrowCapability {
    issued_to: CallerId,
}

impl EscrowCapability {
    /// The caller id this capability was issued under.
    pub fn issued_to(&self) -> &CallerId {
        &self.issued_to
    }
}

/// Lifecycle events appended by the escrow ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EscrowEvent {
    /// An escrow was created and funded.
    Created {
        /// The escrow id.
        escrow: EscrowId,
        /// The linked receipt.
        receipt: ReceiptId,
        /// The held amount.
        amount: Amount,
        /// When it was created.
        at: Timestamp,
    },
    /// Funds were released to a recipient.
    Released {
        /// The escrow id.
        escrow: EscrowId,
        /// Who received the funds.
        recipient: AccountAddress,
        /// The released amount.
        amount: Amount,
        /// When release happened.
        at: Timestamp,
    },
    /// Funds were returned to the depositor.
    Refunded {
        /// The escrow id.
        escrow: EscrowId,
        /// The refunded amount.
        amount: Amount,
        /// Whether the refund was the permissionless expiry path.
        expired: bool,
        /// When refund happened.
        at: Timestamp,
    },
}

/// The escrow ledger: all escrow accounts plus settlement authority.
#[derive(Debug)]
pub struct EscrowLedger {
    admin: AccountAddress,
    escrows: HashMap<EscrowId, Escrow>,
    by_receipt: HashMap<ReceiptId, EscrowId>,
    authorized: BTreeSet<CallerId>,
    events: Vec<EscrowEvent>,
}

impl EscrowLedger {
    /// Create an empty escrow ledger administered by `admin`.
    pub fn new(admin: AccountAddress) -> Self {
        Self {
            admin,
            escrows: HashMap::new(),
            by_receipt: HashMap::new(),
            authorized: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    fn require_admin(&self, caller: &AccountAddress) -> Result<(), EscrowError> {
        if *caller != self.admin {
            return Err(EscrowError::NotAdmin {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    fn require_authorized(&self, cap: &EscrowCapability) -> Result<(), EscrowError> {
        if !self.authorized.contains(cap.issued_to()) {
            return Err(EscrowError::NotAuthorized {
                caller: cap.issued_to().to_string(),
            });
        }
        Ok(())
    }

    /// Issue settlement authority under `caller_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::NotAdmin`] unless called by the admin.
    pub fn grant_capability(
        &mut self,
        caller: &AccountAddress,
        caller_id: CallerId,
    ) -> Result<EscrowCapability, EscrowError> {
        self.require_admin(caller)?;
        self.authorized.insert(caller_id.clone());
        Ok(EscrowCapability {
            issued_to: caller_id,
        })
    }

    /// Revoke settlement authority from `caller_id`. Outstanding
    /// capability values under that id stop working immediately.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowError::NotAdmin`] unless called by the admin.
    pub fn revoke_capability(
        &mut self,
        caller: &AccountAddress,
        caller_id: &CallerId,
    ) -> Result<(), EscrowError> {
        self.require_admin(caller)?;
        self.authorized.remove(caller_id);
        Ok(())
    }

    /// Create an escrow holding `amount` of `asset` against `receipt`.
    ///
    /// Creation is permissionless: the depositor attaches the funds.
    ///
    /// # Errors
    ///
    /// Rejects zero amounts, past deadlines, and receipts that already
    /// have a linked escrow.
    pub fn create(
        &mut self,
        receipt: ReceiptId,
        depositor: AccountAddress,
        asset: AssetKind,
        amount: Amount,
        deadline: Timestamp,
        now: Timestamp,
    ) -> Result<EscrowId, EscrowError> {
        if amount.is_zero() {
            return Err(EscrowError::ZeroAmount);
        }
        if deadline <= now {
            return Err(EscrowError::DeadlineNotFuture {
                deadline: deadline.to_string(),
                now: now.to_string(),
            });
        }
        if let Some(existing) = self.by_receipt.get(&receipt) {
            return Err(EscrowError::ReceiptAlreadyEscrowed {
                receipt: receipt.to_string(),
                escrow: existing.to_string(),
            });
        }

        let id = EscrowId::new();
        self.escrows.insert(
            id,
            Escrow {
                id,
                receipt,
                depositor,
                asset,
                amount,
                status: EscrowStatus::Active,
                deadline,
                created_at: now,
            },
        );
        self.by_receipt.insert(receipt, id);
        self.events.push(EscrowEvent::Created {
            escrow: id,
            receipt,
            amount,
            at: now,
        });
        tracing::info!(escrow = %id, receipt = %receipt, amount = %amount, "escrow created");
        Ok(id)
    }

    /// Release the held funds to `recipient`.
    ///
    /// # Errors
    ///
    /// Requires a valid capability and Active status.
    pub fn release(
        &mut self,
        cap: &EscrowCapability,
        id: &EscrowId,
        recipient: AccountAddress,
        payouts: &mut PayoutLedger,
        now: Timestamp,
    ) -> Result<Amount, EscrowError> {
        self.require_authorized(cap)?;
        let escrow = self.active_escrow_mut(id, "release")?;
        escrow.status = EscrowStatus::Released;
        let amount = escrow.amount;
        self.events.push(EscrowEvent::Released {
            escrow: *id,
            recipient,
            amount,
            at: now,
        });
        tracing::info!(escrow = %id, recipient = %recipient, amount = %amount, "escrow released");
        payouts.credit(recipient, amount, "escrow release")?;
        Ok(amount)
    }

    /// Return the held funds to the depositor.
    ///
    /// # Errors
    ///
    /// Requires a valid capability and Active status.
    pub fn refund(
        &mut self,
        cap: &EscrowCapability,
        id: &EscrowId,
        payouts: &mut PayoutLedger,
        now: Timestamp,
    ) -> Result<Amount, EscrowError> {
        self.require_authorized(cap)?;
        self.refund_inner(id, payouts, false, now)
    }

    /// Permissionless refund once the escrow deadline has passed.
    ///
    /// Guarantees a depositor can always recover funds from an escrow no
    /// settlement path ever consumed.
    ///
    /// # Errors
    ///
    /// Requires Active status and `now` past the deadline.
    pub fn refund_expired(
        &mut self,
        id: &EscrowId,
        payouts: &mut PayoutLedger,
        now: Timestamp,
    ) -> Result<Amount, EscrowError> {
        let escrow = self.escrow_or_err(id)?;
        if now <= escrow.deadline {
            return Err(EscrowError::DeadlineNotReached {
                escrow: id.to_string(),
                deadline: escrow.deadline.to_string(),
                now: now.to_string(),
            });
        }
        self.refund_inner(id, payouts, true, now)
    }

    fn refund_inner(
        &mut self,
        id: &EscrowId,
        payouts: &mut PayoutLedger,
        expired: bool,
        now: Timestamp,
    ) -> Result<Amount, EscrowError> {
        let escrow = self.active_escrow_mut(id, "refund")?;
        escrow.status = EscrowStatus::Refunded;
        let amount = escrow.amount;
        let depositor = escrow.depositor;
        self.events.push(EscrowEvent::Refunded {
            escrow: *id,
            amount,
            expired,
            at: now,
        });
        tracing::info!(escrow = %id, depositor = %depositor, amount = %amount, expired, "escrow refunded");
        payouts.credit(depositor, amount, "escrow refund")?;
        Ok(amount)
    }

    fn escrow_or_err(&self, id: &EscrowId) -> Result<&Escrow, EscrowError> {
        self.escrows.get(id).ok_or_else(|| EscrowError::UnknownEscrow {
            escrow: id.to_string(),
        })
    }

    fn active_escrow_mut(
        &mut self,
        id: &EscrowId,
        operation: &str,
    ) -> Result<&mut Escrow, EscrowError> {
        let escrow = self
            .escrows
            .get_mut(id)
            .ok_or_else(|| EscrowError::UnknownEscrow {
                escrow: id.to_string(),
            })?;
        if escrow.status != EscrowStatus::Active {
            return Err(EscrowError::InvalidStatus {
                escrow: id.to_string(),
                operation: operation.to_string(),
                status: escrow.status.as_str().to_string(),
            });
        }
        Ok(escrow)
    }

    /// Look up an escrow by id.
    pub fn escrow(&self, id: &EscrowId) -> Option<&Escrow> {
        self.escrows.get(id)
    }

    /// Look up the escrow linked to a receipt, if any.
    pub fn escrow_for_receipt(&self, receipt: &ReceiptId) -> Option<&Escrow> {
        self.by_receipt
            .get(receipt)
            .and_then(|id| self.escrows.get(id))
    }

    /// The depositor behind a receipt's escrow, if one exists.
    pub fn depositor_for(&self, receipt: &ReceiptId) -> Option<AccountAddress> {
        self.escrow_for_receipt(receipt).map(|e| e.depositor)
    }

    /// The append-only event log.
    pub fn events(&self) -> &[EscrowEvent] {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_core::ContentDigest;

    fn addr(byte: u8) -> AccountAddress {
        AccountAddress::from_bytes([byte; 32])
    }

    fn receipt(label: &[u8]) -> ReceiptId {
        ReceiptId::from_digest(ContentDigest::of(label))
    }

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs)
    }

    fn ledger_with_cap() -> (EscrowLedger, EscrowCapability) {
        let admin = addr(0xAA);
        let mut ledger = EscrowLedger::new(admin);
        let cap = ledger
            .grant_capability(&admin, CallerId::new("dispute-engine"))
            .unwrap();
        (ledger, cap)
    }

    fn funded(ledger: &mut EscrowLedger) -> EscrowId {
        ledger
            .create(
                receipt(b"r1"),
                addr(1),
                AssetKind::Native,
                Amount::from_base_units(10_000),
                ts(100_000),
                ts(1_000),
            )
            .unwrap()
    }

    #[test]
    fn create_starts_active() {
        let (mut ledger, _cap) = ledger_with_cap();
        let id = funded(&mut ledger);
        let escrow = ledger.escrow(&id).unwrap();
        assert_eq!(escrow.status, EscrowStatus::Active);
        assert_eq!(escrow.amount, Amount::from_base_units(10_000));
    }

    #[test]
    fn zero_amount_rejected() {
        let (mut ledger, _cap) = ledger_with_cap();
        let result = ledger.create(
            receipt(b"r1"),
            addr(1),
            AssetKind::Native,
            Amount::ZERO,
            ts(100_000),
            ts(1_000),
        );
        assert!(matches!(result, Err(EscrowError::ZeroAmount)));
    }

    #[test]
    fn past_deadline_rejected() {
        let (mut ledger, _cap) = ledger_with_cap();
        let result = ledger.create(
            receipt(b"r1"),
            addr(1),
            AssetKind::Native,
            Amount::from_base_units(10),
            ts(1_000),
            ts(1_000),
        );
        assert!(matches!(result, Err(EscrowError::DeadlineNotFuture { .. })));
    }

    #[test]
    fn second_escrow_per_receipt_rejected() {
        let (mut ledger, _cap) = ledger_with_cap();
        funded(&mut ledger);
        let result = ledger.create(
            receipt(b"r1"),
            addr(2),
            AssetKind::Native,
            Amount::from_base_units(5),
            ts(100_000),
            ts(1_000),
        );
        assert!(matches!(
            result,
            Err(EscrowError::ReceiptAlreadyEscrowed { .. })
        ));
    }

    #[test]
    fn release_credits_recipient_once() {
        let (mut ledger, cap) = ledger_with_cap();
        let id = funded(&mut ledger);
        let mut payouts = PayoutLedger::new();

        let released = ledger
            .release(&cap, &id, addr(7), &mut payouts, ts(2_000))
            .unwrap();
        assert_eq!(released, Amount::from_base_units(10_000));
        assert_eq!(payouts.balance(&addr(7)), Amount::from_base_units(10_000));

        // Terminal status rejects a second settlement of either kind.
        assert!(ledger
            .release(&cap, &id, addr(7), &mut payouts, ts(2_001))
            .is_err());
        assert!(ledger.refund(&cap, &id, &mut payouts, ts(2_001)).is_err());
    }

    #[test]
    fn refund_credits_depositor() {
        let (mut ledger, cap) = ledger_with_cap();
        let id = funded(&mut ledger);
        let mut payouts = PayoutLedger::new();

        ledger.refund(&cap, &id, &mut payouts, ts(2_000)).unwrap();
        assert_eq!(payouts.balance(&addr(1)), Amount::from_base_units(10_000));
        assert_eq!(
            ledger.escrow(&id).unwrap().status,
            EscrowStatus::Refunded
        );
    }

    #[test]
    fn unauthorized_settlement_rejected() {
        let (mut ledger, _cap) = ledger_with_cap();
        let id = funded(&mut ledger);
        let mut payouts = PayoutLedger::new();

        // Capability issued, then revoked: the value stops working.
        let admin = addr(0xAA);
        let cap = ledger
            .grant_capability(&admin, CallerId::new("rogue"))
            .unwrap();
        ledger
            .revoke_capability(&admin, &CallerId::new("rogue"))
            .unwrap();
        let result = ledger.release(&cap, &id, addr(7), &mut payouts, ts(2_000));
        assert!(matches!(result, Err(EscrowError::NotAuthorized { .. })));
    }

    #[test]
    fn grant_requires_admin() {
        let (mut ledger, _cap) = ledger_with_cap();
        let result = ledger.grant_capability(&addr(0xBB), CallerId::new("x"));
        assert!(matches!(result, Err(EscrowError::NotAdmin { .. })));
    }

    #[test]
    fn refund_expired_before_deadline_rejected() {
        let (mut ledger, _cap) = ledger_with_cap();
        let id = funded(&mut ledger);
        let mut payouts = PayoutLedger::new();
        let result = ledger.refund_expired(&id, &mut payouts, ts(100_000));
        assert!(matches!(result, Err(EscrowError::DeadlineNotReached { .. })));
    }

    #[test]
    fn refund_expired_after_deadline_is_permissionless() {
        let (mut ledger, _cap) = ledger_with_cap();
        let id = funded(&mut ledger);
        let mut payouts = PayoutLedger::new();
        ledger
            .refund_expired(&id, &mut payouts, ts(100_001))
            .unwrap();
        assert_eq!(payouts.balance(&addr(1)), Amount::from_base_units(10_000));
        // Exactly once.
        assert!(ledger
            .refund_expired(&id, &mut payouts, ts(100_002))
            .is_err());
    }

    #[test]
    fn depositor_lookup_by_receipt() {
        let (mut ledger, _cap) = ledger_with_cap();
        funded(&mut ledger);
        assert_eq!(ledger.depositor_for(&receipt(b"r1")), Some(addr(1)));
        assert_eq!(ledger.depositor_for(&receipt(b"r2")), None);
    }

    #[test]
    fn events_are_append_only_records() {
        let (mut ledger, cap) = ledger_with_cap();
        let id = funded(&mut ledger);
        let mut payouts = PayoutLedger::new();
        ledger.refund(&cap, &id, &mut payouts, ts(2_000)).unwrap();
        assert_eq!(ledger.events().len(), 2);
        assert!(matches!(ledger.events()[0], EscrowEvent::Created { .. }));
        assert!(matches!(ledger.events()[1], EscrowEvent::Refunded { .. }));
    }

    #[test]
    fn escrow_serialization_roundtrip() {
        let (mut ledger, _cap) = ledger_with_cap();
        let id = funded(&mut ledger);
        let escrow = ledger.escrow(&id).unwrap();
        let json = serde_json::to_string(escrow).unwrap();
        let back: Escrow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, escrow.id);
        assert_eq!(back.status, escrow.status);
        assert_eq!(back.amount, escrow.amount);
    }
}
