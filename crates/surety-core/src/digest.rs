//! # Content-Addressed Digests
//!
//! Defines [`ContentDigest`] and the domain-tagged SHA-256 helper that
//! produces every content-derived identifier in the stack.
//!
//! ## Security Invariant
//!
//! All content-derived identifiers flow through [`sha256_tagged`], which
//! hashes a versioned domain tag ahead of the payload. A receipt digest
//! can therefore never collide with an executor digest even when their
//! payload bytes coincide.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 32-byte SHA-256 content digest.
///
/// Used for intent references, constraint/route/outcome/evidence
/// commitments, and as the raw material for content-derived identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Create a digest from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Compute the digest of arbitrary bytes (no domain tag).
    ///
    /// Commitments supplied by external adapters (destination, asset,
    /// recipient digests) are plain hashes of the underlying value.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a domain-tagged SHA-256 digest over ordered parts.
///
/// The tag (e.g., `"surety/receipt/v1"`) is hashed first, followed by each
/// part in order. Parts are fixed-width in every caller, so no length
/// prefixes are needed; the tag version must be bumped if a caller's field
/// layout ever changes.
pub fn sha256_tagged(tag: &str, parts: &[&[u8]]) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(tag.as_bytes());
    for part in parts {
        hasher.update(part);
    }
    ContentDigest(hasher.finalize().into())
}
