//! # Registry Capabilities
//!
//! The stake primitives (`lock_stake`, `unlock_stake`, `slash`, `jail`,
//! fill/dispute accounting) mutate balances other components depend on,
//! so they are gated on an unforgeable capability value rather than a
//! caller-address allow-list.
//!
//! ## Security Invariant
//!
//! The `issued_to` field is private and the only constructor is
//! [`ExecutorRegistry::grant_capability`](crate::ExecutorRegistry::grant_capability),
//! so holding a `RegistryCapability` proves issuance by the registry
//! admin. Revocation removes the caller id from the allow-list; issued
//! values stop working immediately because authority is re-checked on
//! every call.

use surety_core::CallerId;

/// An unforgeable proof that the holder was issued stake-mutation
/// authority under a caller id.
#[derive(Debug, Clone)]
pub struct RegistryCapability {
    issued_to: CallerId,
}

impl RegistryCapability {
    pub(crate) fn new(issued_to: CallerId) -> Self {
        Self { issued_to }
    }

    /// The caller id this capability was issued under.
    pub fn issued_to(&self) -> &CallerId {
        &self.issued_to
    }
}
