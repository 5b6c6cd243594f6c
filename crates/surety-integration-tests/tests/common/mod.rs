//! Shared harness for cross-crate integration tests: a fully wired
//! stack (registry, hub, escrow ledger, dispute engine, payout ledger)
//! with one active executor.

#![allow(dead_code)]

use surety_core::{
    AccountAddress, Amount, CallerId, ContentDigest, DisputeReason, ExecutionReceipt, ExecutorId,
    OperatorKeypair, ProtocolParams, ReceiptId, RouteCommitment, Timestamp,
};
use surety_disputes::OptimisticDisputeEngine;
use surety_escrow::{AssetKind, EscrowLedger, PayoutLedger};
use surety_receipts::{NullSink, ReceiptHub};
use surety_registry::ExecutorRegistry;

pub const MIN_STAKE: u64 = 100_000_000;
pub const VOLUME: u64 = 50_000_000;
pub const BOND: u64 = 10_000_000;
pub const ESCROW_AMOUNT: u64 = 20_000_000;

pub const ADMIN: u8 = 0xAD;
pub const TREASURY: u8 = 0xFE;
pub const ARBITRATOR: u8 = 0xAB;
pub const CHALLENGER: u8 = 0x0C;
pub const DEPOSITOR: u8 = 0x55;

pub fn addr(byte: u8) -> AccountAddress {
    AccountAddress::from_bytes([byte; 32])
}

pub fn ts(secs: i64) -> Timestamp {
    Timestamp::from_unix_secs(secs)
}

pub fn units(n: u64) -> Amount {
    Amount::from_base_units(n)
}

pub struct Stack {
    pub registry: ExecutorRegistry,
    pub hub: ReceiptHub,
    pub escrows: EscrowLedger,
    pub engine: OptimisticDisputeEngine,
    pub payouts: PayoutLedger,
    pub keypair: OperatorKeypair,
    pub executor: ExecutorId,
}

impl Stack {
    /// Wire every component and register one executor staked at exactly
    /// the minimum (0.1 native units).
    pub fn new() -> Self {
        // RUST_LOG=surety_registry=info etc. surfaces component traces
        // while debugging a failing scenario.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

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
            .register(keypair.address(), ContentDigest::of(b"executor-metadata"), ts(1_000))
            .unwrap();
        registry
            .deposit_stake(&executor, units(MIN_STAKE), ts(1_100))
            .unwrap();

        Stack {
            registry,
            hub,
            escrows,
            engine,
            payouts: PayoutLedger::new(),
            keypair,
            executor,
        }
    }

    /// A receipt over `intent_label` created at 9 000, expiring at 20 000.
    pub fn receipt(&self, intent_label: &[u8]) -> ExecutionReceipt {
        ExecutionReceipt {
            intent: ContentDigest::of(intent_label),
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
            executor: self.executor,
        }
    }

    /// Post `intent_label` at 10 000; the challenge window closes at
    /// 13 600.
    pub fn post(&mut self, intent_label: &[u8]) -> ReceiptId {
        let receipt = self.receipt(intent_label);
        let signature = self.keypair.sign_receipt(&receipt.id());
        self.hub
            .post_receipt(&self.registry, receipt, signature, units(VOLUME), ts(10_000))
            .unwrap()
    }

    /// Open a hub dispute at 13 000 with the exact required bond.
    pub fn dispute(&mut self, receipt: &ReceiptId, reason: DisputeReason) {
        self.hub
            .open_dispute(
                &mut self.registry,
                addr(CHALLENGER),
                receipt,
                reason,
                ContentDigest::of(b"challenger-evidence"),
                units(BOND),
                ts(13_000),
            )
            .unwrap();
    }

    /// Create an escrow for `receipt` funded by the depositor.
    pub fn escrow(&mut self, receipt: ReceiptId) {
        self.escrows
            .create(
                receipt,
                addr(DEPOSITOR),
                AssetKind::Native,
                units(ESCROW_AMOUNT),
                ts(10_000_000),
                ts(12_000),
            )
            .unwrap();
    }
}
