//! # Ed25519 Operator Signatures
//!
//! Operators prove authorship of a receipt by signing its content digest
//! with the Ed25519 key whose public half is their bound
//! [`AccountAddress`].
//!
//! ## Security Invariant
//!
//! Signatures always cover the receipt's content-derived id, never an
//! ad-hoc serialization, so a signature can only ever attest to exactly
//! one receipt content tuple.

use ed25519_dalek::{Signer, Verifier};
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};

use crate::error::SignatureError;
use crate::identity::{AccountAddress, ReceiptId};

/// An Ed25519 signature over a receipt commitment (64 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptSignature(pub Vec<u8>);

impl ReceiptSignature {
    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// An operator's Ed25519 signing key.
///
/// Held by embedders and tests; the ledger itself only ever sees the
/// public half as an [`AccountAddress`].
pub struct OperatorKeypair {
    inner: ed25519_dalek::SigningKey,
}

impl OperatorKeypair {
    /// Create a keypair from 32 secret bytes.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::from_bytes(&bytes),
        }
    }

    /// Generate a fresh random keypair.
    pub fn generate<R: CryptoRngCore>(rng: &mut R) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::generate(rng),
        }
    }

    /// The account address bound to this keypair.
    pub fn address(&self) -> AccountAddress {
        AccountAddress::from_bytes(self.inner.verifying_key().to_bytes())
    }

    /// Sign a receipt's content digest.
    pub fn sign_receipt(&self, receipt_id: &ReceiptId) -> ReceiptSignature {
        let signature = self.inner.sign(receipt_id.as_bytes());
        ReceiptSignature(signature.to_bytes().to_vec())
    }
}

/// Verify an operator signature over a receipt commitment.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidPublicKey`] if the operator address is
/// not a valid Ed25519 key, [`SignatureError::MalformedSignature`] if the
/// signature is not 64 bytes, and [`SignatureError::VerificationFailed`]
/// if the signature does not verify.
pub fn verify_receipt_signature(
    operator: &AccountAddress,
    receipt_id: &ReceiptId,
    signature: &ReceiptSignature,
) -> Result<(), SignatureError> {
    let key = ed25519_dalek::VerifyingKey::from_bytes(operator.as_bytes()).map_err(|_| {
        SignatureError::InvalidPublicKey {
            address: operator.to_hex(),
        }
    })?;
    let sig = ed25519_dalek::Signature::from_slice(signature.as_bytes()).map_err(|_| {
        SignatureError::MalformedSignature {
            length: signature.as_bytes().len(),
        }
    })?;
    key.verify(receipt_id.as_bytes(), &sig)
        .map_err(|_| SignatureError::VerificationFailed {
            receipt_id: receipt_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::ContentDigest;

    fn keypair(seed: u8) -> OperatorKeypair {
        OperatorKeypair::from_secret_bytes([seed; 32])
    }

    fn receipt_id(label: &[u8]) -> ReceiptId {
        ReceiptId::from_digest(ContentDigest::of(label))
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let kp = keypair(42);
        let id = receipt_id(b"fill-1");
        let sig = kp.sign_receipt(&id);
        assert!(verify_receipt_signature(&kp.address(), &id, &sig).is_ok());
    }

    #[test]
    fn wrong_key_rejected() {
        let kp = keypair(42);
        let other = keypair(43);
        let id = receipt_id(b"fill-1");
        let sig = kp.sign_receipt(&id);
        let err = verify_receipt_signature(&other.address(), &id, &sig).unwrap_err();
        assert!(matches!(err, SignatureError::VerificationFailed { .. }));
    }

    #[test]
    fn wrong_message_rejected() {
        let kp = keypair(42);
        let sig = kp.sign_receipt(&receipt_id(b"fill-1"));
        let err =
            verify_receipt_signature(&kp.address(), &receipt_id(b"fill-2"), &sig).unwrap_err();
        assert!(matches!(err, SignatureError::VerificationFailed { .. }));
    }

    #[test]
    fn generated_keys_differ() {
        let a = OperatorKeypair::generate(&mut rand::rngs::OsRng);
        let b = OperatorKeypair::generate(&mut rand::rngs::OsRng);
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn truncated_signature_rejected() {
        let kp = keypair(42);
        let id = receipt_id(b"fill-1");
        let mut sig = kp.sign_receipt(&id);
        sig.0.truncate(63);
        let err = verify_receipt_signature(&kp.address(), &id, &sig).unwrap_err();
        assert!(matches!(
            err,
            SignatureError::MalformedSignature { length: 63 }
        ));
    }
}
