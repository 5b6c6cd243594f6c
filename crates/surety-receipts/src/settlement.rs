//! # Settlement Attestations
//!
//! The adapter boundary. A protocol adapter observing a third-party
//! settlement venue records what actually settled for a receipt:
//! destination, asset, and recipient digests plus the settlement time.
//! Deterministic dispute resolution compares these against the receipt's
//! route commitments field-by-field.
//!
//! Attestations are recorded at most once per receipt and never
//! modified; the ingestion entry point is capability-gated.

use serde::{Deserialize, Serialize};

use surety_core::{ContentDigest, ReceiptId, Timestamp};

/// What a settlement adapter observed for a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementAttestation {
    /// The receipt the observation is for.
    pub receipt: ReceiptId,
    /// Digest of the observed destination identifier.
    pub destination: ContentDigest,
    /// Digest of the observed delivered asset.
    pub asset: ContentDigest,
    /// Digest of the observed recipient.
    pub recipient: ContentDigest,
    /// When the settlement was observed on the venue.
    pub settled_at: Timestamp,
    /// When the attestation was recorded in the hub.
    pub recorded_at: Timestamp,
}
