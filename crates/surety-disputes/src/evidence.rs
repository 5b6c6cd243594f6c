//! # Evidence Log
//!
//! Each optimistic dispute carries an append-only list of evidence
//! commitments. Entries are never overwritten or removed — the log is
//! the tamper-evident record both parties argue from, ordered by
//! submission.

use serde::{Deserialize, Serialize};

use surety_core::{AccountAddress, ContentDigest, Timestamp};

/// One submitted piece of evidence.
///
/// The ledger stores only the commitment; the underlying artifact lives
/// off-ledger and is verified against the digest by whoever reviews it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    /// Which party submitted the evidence.
    pub submitted_by: AccountAddress,
    /// Commitment to the evidence artifact.
    pub commitment: ContentDigest,
    /// When the submission was recorded.
    pub submitted_at: Timestamp,
}
