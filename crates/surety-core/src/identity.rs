//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the Surety Stack.
//! Each identifier is a distinct type — you cannot pass an [`ExecutorId`]
//! where a [`ReceiptId`] is expected.
//!
//! ## Derivation
//!
//! Content-derived identifiers ([`ExecutorId`], [`ReceiptId`],
//! [`DisputeId`]) are domain-tagged SHA-256 digests of their defining
//! tuple, so equal content always maps to the same id and the ledger can
//! enforce one-record-per-content. [`EscrowId`] is synthetic
//! (UUID-backed): escrows are explicitly linked to a receipt rather than
//! derived from one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::digest::{sha256_tagged, ContentDigest};
use crate::temporal::Timestamp;

/// The address of an account able to send calls and hold payouts.
///
/// The 32 bytes are an Ed25519 public key; operators prove control of an
/// address by signature. Treasury and arbitrator addresses are plain
/// payout destinations and never need to sign inside this stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountAddress(pub [u8; 32]);

impl AccountAddress {
    /// Create an address from raw key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the address as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "addr:{}", self.to_hex())
    }
}

/// The opaque 32-byte identity of a registered executor.
///
/// Derived once at registration; the binding from operator address to
/// executor id is permanent, surviving even a ban.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExecutorId([u8; 32]);

impl ExecutorId {
    /// Derive an executor id from its registration tuple.
    pub fn derive(
        operator: &AccountAddress,
        metadata: &ContentDigest,
        registered_at: &Timestamp,
    ) -> Self {
        let ts = registered_at.unix_secs().to_be_bytes();
        let digest = sha256_tagged(
            "surety/executor/v1",
            &[operator.as_bytes(), metadata.as_bytes(), &ts],
        );
        Self(*digest.as_bytes())
    }

    /// Create an executor id from raw bytes (e.g., deserialized state).
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Access the raw id bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the id as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ExecutorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "executor:{}", self.to_hex())
    }
}

/// The content-derived identity of an execution receipt.
///
/// Computed by [`ExecutionReceipt::id`](crate::ExecutionReceipt::id);
/// exactly one receipt may exist per id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptId([u8; 32]);

impl ReceiptId {
    /// Create a receipt id from a computed digest.
    pub fn from_digest(digest: ContentDigest) -> Self {
        Self(*digest.as_bytes())
    }

    /// Access the raw id bytes. This is the message operators sign.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the id as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "receipt:{}", self.to_hex())
    }
}

/// The identity of an optimistic dispute.
///
/// Derived from the disputed receipt, the challenger, and the open time,
/// so re-opening after a resolved dispute yields a distinct id while the
/// engine enforces at most one *active* dispute per receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisputeId([u8; 32]);

impl DisputeId {
    /// Derive a dispute id from its opening tuple.
    pub fn derive(receipt: &ReceiptId, challenger: &AccountAddress, opened_at: &Timestamp) -> Self {
        let ts = opened_at.unix_secs().to_be_bytes();
        let digest = sha256_tagged(
            "surety/dispute/v1",
            &[receipt.as_bytes(), challenger.as_bytes(), &ts],
        );
        Self(*digest.as_bytes())
    }

    /// Access the raw id bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the id as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for DisputeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dispute:{}", self.to_hex())
    }
}

/// The name under which a component is authorized to call another.
///
/// Fund-holding components (registry, escrow ledger, receipt hub) each
/// maintain an allow-list of caller ids and issue unforgeable capability
/// values bound to one. The id is the revocation handle; the capability
/// value is the proof of issuance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallerId(String);

impl CallerId {
    /// Create a caller id. Empty names are collapsed to `"anonymous"`
    /// rather than rejected; allow-lists are admin-curated, so an odd
    /// name is a configuration smell, not a safety hazard.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Self("anonymous".to_string())
        } else {
            Self(name)
        }
    }

    /// The caller name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "caller:{}", self.0)
    }
}

/// A unique identifier for an escrow account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EscrowId(Uuid);

impl EscrowId {
    /// Create a new random escrow identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EscrowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EscrowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "escrow:{}", self.0)
    }
}
