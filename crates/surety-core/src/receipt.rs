//! # Execution Receipts
//!
//! The signed record an executor posts after fulfilling an intent. A
//! receipt's identity is the domain-tagged SHA-256 digest of its full
//! content tuple; the operator's Ed25519 signature covers that digest.
//!
//! ## Commitment Scheme
//!
//! `ReceiptId = SHA256("surety/receipt/v1" ‖ intent ‖ constraints ‖
//! route.destination ‖ route.asset ‖ route.recipient ‖ outcome ‖
//! evidence ‖ created_at ‖ expires_at ‖ executor)`
//!
//! where all digests and the executor id are their raw 32 bytes and both
//! timestamps are 8-byte big-endian Unix seconds. Every field is
//! fixed-width, so no length prefixes are required. External adapters
//! translating third-party settlement events into receipts must reproduce
//! this scheme byte-for-byte for identifiers to match.

use serde::{Deserialize, Serialize};

use crate::digest::{sha256_tagged, ContentDigest};
use crate::identity::{ExecutorId, ReceiptId};
use crate::temporal::Timestamp;

/// Commitments to the route an execution took.
///
/// Each field is the plain SHA-256 digest of the underlying value as the
/// settlement venue renders it. Deterministic dispute resolution compares
/// these against a recorded settlement attestation field-by-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCommitment {
    /// Digest of the destination (chain/venue) identifier.
    pub destination: ContentDigest,
    /// Digest of the asset delivered.
    pub asset: ContentDigest,
    /// Digest of the recipient of the delivered asset.
    pub recipient: ContentDigest,
}

/// The content of an execution receipt.
///
/// The executor's signature is carried separately (it signs the content
/// digest and is therefore not part of it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    /// Reference to the intent this execution fulfilled.
    pub intent: ContentDigest,
    /// Commitment to the intent's constraint set.
    pub constraints: ContentDigest,
    /// Commitments to the execution route.
    pub route: RouteCommitment,
    /// Commitment to the execution outcome.
    pub outcome: ContentDigest,
    /// Commitment to the supporting evidence bundle.
    pub evidence: ContentDigest,
    /// When the executor produced the receipt.
    pub created_at: Timestamp,
    /// Deadline by which settlement must be observable.
    pub expires_at: Timestamp,
    /// The executor claiming the fill.
    pub executor: ExecutorId,
}

impl ExecutionReceipt {
    /// Compute the receipt's content-derived identity.
    pub fn id(&self) -> ReceiptId {
        let created = self.created_at.unix_secs().to_be_bytes();
        let expires = self.expires_at.unix_secs().to_be_bytes();
        let digest = sha256_tagged(
            "surety/receipt/v1",
            &[
                self.intent.as_bytes(),
                self.constraints.as_bytes(),
                self.route.destination.as_bytes(),
                self.route.asset.as_bytes(),
                self.route.recipient.as_bytes(),
                self.outcome.as_bytes(),
                self.evidence.as_bytes(),
                &created,
                &expires,
                self.executor.as_bytes(),
            ],
        );
        ReceiptId::from_digest(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AccountAddress;

    fn sample_receipt() -> ExecutionReceipt {
        let operator = AccountAddress::from_bytes([1; 32]);
        let meta = ContentDigest::of(b"meta");
        let registered = Timestamp::from_unix_secs(1_000);
        ExecutionReceipt {
            intent: ContentDigest::of(b"intent"),
            constraints: ContentDigest::of(b"constraints"),
            route: RouteCommitment {
                destination: ContentDigest::of(b"destination"),
                asset: ContentDigest::of(b"asset"),
                recipient: ContentDigest::of(b"recipient"),
            },
            outcome: ContentDigest::of(b"outcome"),
            evidence: ContentDigest::of(b"evidence"),
            created_at: Timestamp::from_unix_secs(2_000),
            expires_at: Timestamp::from_unix_secs(5_600),
            executor: ExecutorId::derive(&operator, &meta, &registered),
        }
    }

    #[test]
    fn id_is_deterministic() {
        assert_eq!(sample_receipt().id(), sample_receipt().id());
    }

    #[test]
    fn id_changes_with_outcome() {
        let a = sample_receipt();
        let mut b = sample_receipt();
        b.outcome = ContentDigest::of(b"different outcome");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn id_changes_with_expiry() {
        let a = sample_receipt();
        let mut b = sample_receipt();
        b.expires_at = Timestamp::from_unix_secs(5_601);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn id_changes_with_route_recipient() {
        let a = sample_receipt();
        let mut b = sample_receipt();
        b.route.recipient = ContentDigest::of(b"someone else");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn serde_roundtrip_preserves_id() {
        let receipt = sample_receipt();
        let json = serde_json::to_string(&receipt).unwrap();
        let back: ExecutionReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(receipt.id(), back.id());
    }
}
