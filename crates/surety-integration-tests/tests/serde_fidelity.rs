//! JSON round-trip fidelity for every record shape the ledger stores or
//! emits. A record that cannot survive serialization cannot be part of a
//! replayable audit trail.

mod common;

use common::*;
use surety_core::{
    Amount, ContentDigest, DisputeReason, EscrowId, ExecutionReceipt, ProtocolParams,
    ResolutionPath, RouteCommitment, Timestamp,
};
use surety_disputes::{EvidenceEntry, OptimisticDispute, OptimisticDisputeStatus};
use surety_escrow::{AssetKind, Escrow, EscrowStatus};
use surety_receipts::{DisputeRecord, ReceiptRecord, SettlementAttestation};
use surety_registry::{ExecutorRecord, ReputationCounters};

fn roundtrip<T>(value: &T) -> T
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    let json = serde_json::to_string(value).expect("serialize");
    serde_json::from_str(&json).expect("deserialize")
}

#[test]
fn protocol_params_roundtrip() {
    let params = ProtocolParams::default();
    assert_eq!(roundtrip(&params), params);
}

#[test]
fn execution_receipt_roundtrip_preserves_identity() {
    let stack = Stack::new();
    let receipt = stack.receipt(b"serde-intent");
    let back: ExecutionReceipt = roundtrip(&receipt);
    assert_eq!(back, receipt);
    assert_eq!(back.id(), receipt.id());
}

#[test]
fn route_commitment_roundtrip() {
    let route = RouteCommitment {
        destination: ContentDigest::of(b"d"),
        asset: ContentDigest::of(b"a"),
        recipient: ContentDigest::of(b"r"),
    };
    assert_eq!(roundtrip(&route), route);
}

#[test]
fn executor_record_roundtrip() {
    let mut stack = Stack::new();
    let receipt = stack.post(b"serde-fill");
    stack
        .hub
        .finalize(&mut stack.registry, &receipt, ts(13_601))
        .unwrap();
    let record = stack.registry.executor(&stack.executor).unwrap().clone();
    let back: ExecutorRecord = roundtrip(&record);
    assert_eq!(back.id, record.id);
    assert_eq!(back.status, record.status);
    assert_eq!(back.available, record.available);
    assert_eq!(back.reputation, record.reputation);
}

#[test]
fn receipt_and_dispute_records_roundtrip() {
    let mut stack = Stack::new();
    let receipt = stack.post(b"serde-disputed");
    stack.dispute(&receipt, DisputeReason::ConstraintViolation);

    let record = stack.hub.receipt(&receipt).unwrap().clone();
    let back: ReceiptRecord = roundtrip(&record);
    assert_eq!(back.id, record.id);
    assert_eq!(back.status, record.status);
    assert_eq!(back.challenge_deadline, record.challenge_deadline);

    let dispute = stack.hub.dispute(&receipt).unwrap().clone();
    let back: DisputeRecord = roundtrip(&dispute);
    assert_eq!(back.receipt, dispute.receipt);
    assert_eq!(back.reason, dispute.reason);
    assert_eq!(back.bond, dispute.bond);
}

#[test]
fn optimistic_dispute_roundtrip() {
    let dispute = OptimisticDispute {
        id: surety_core::DisputeId::derive(
            &surety_core::ReceiptId::from_digest(ContentDigest::of(b"r")),
            &addr(CHALLENGER),
            &ts(13_100),
        ),
        receipt: surety_core::ReceiptId::from_digest(ContentDigest::of(b"r")),
        executor: surety_core::ExecutorId::from_bytes([9; 32]),
        challenger: addr(CHALLENGER),
        challenger_bond: Amount::from_base_units(BOND),
        counter_bond: Amount::ZERO,
        opened_at: ts(13_100),
        counter_deadline: ts(99_500),
        arbitration_deadline: None,
        status: OptimisticDisputeStatus::Open,
        evidence: vec![EvidenceEntry {
            submitted_by: addr(CHALLENGER),
            commitment: ContentDigest::of(b"exhibit"),
            submitted_at: ts(14_000),
        }],
    };
    let back = roundtrip(&dispute);
    assert_eq!(back.id, dispute.id);
    assert_eq!(back.status, dispute.status);
    assert_eq!(back.evidence, dispute.evidence);
}

#[test]
fn escrow_roundtrip() {
    let escrow = Escrow {
        id: EscrowId::new(),
        receipt: surety_core::ReceiptId::from_digest(ContentDigest::of(b"r")),
        depositor: addr(DEPOSITOR),
        asset: AssetKind::Token(ContentDigest::of(b"usdc")),
        amount: Amount::from_base_units(ESCROW_AMOUNT),
        status: EscrowStatus::Active,
        deadline: ts(10_000_000),
        created_at: ts(12_000),
    };
    let back = roundtrip(&escrow);
    assert_eq!(back.id, escrow.id);
    assert_eq!(back.asset, escrow.asset);
    assert_eq!(back.amount, escrow.amount);
}

#[test]
fn settlement_attestation_roundtrip() {
    let attestation = SettlementAttestation {
        receipt: surety_core::ReceiptId::from_digest(ContentDigest::of(b"r")),
        destination: ContentDigest::of(b"d"),
        asset: ContentDigest::of(b"a"),
        recipient: ContentDigest::of(b"rcpt"),
        settled_at: ts(15_000),
        recorded_at: ts(15_100),
    };
    assert_eq!(roundtrip(&attestation), attestation);
}

#[test]
fn reason_codes_keep_their_path_through_serde() {
    for reason in DisputeReason::all() {
        let back: DisputeReason = roundtrip(reason);
        assert_eq!(back, *reason);
        assert_eq!(back.path(), reason.path());
    }
    // The fixed table itself: five deterministic, three escalated.
    let deterministic = DisputeReason::all()
        .iter()
        .filter(|r| r.path() == ResolutionPath::Deterministic)
        .count();
    assert_eq!(deterministic, 5);
    assert_eq!(DisputeReason::all().len() - deterministic, 3);
}

#[test]
fn counters_and_timestamps_roundtrip() {
    let counters = ReputationCounters {
        total_fills: 10,
        successful_fills: 9,
        disputes_opened: 3,
        disputes_lost: 1,
        volume_processed: u128::from(u64::MAX) * 2,
        total_slashed: 42,
    };
    assert_eq!(roundtrip(&counters), counters);

    let timestamp = Timestamp::from_unix_secs(1_700_000_000);
    assert_eq!(roundtrip(&timestamp), timestamp);
}
