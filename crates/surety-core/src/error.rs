//! # Core Error Types
//!
//! Error roots shared across the Surety Stack, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Component crates define their own error enums (`RegistryError`,
//! `EscrowError`, `ReceiptError`, `DisputeError`) and embed these roots
//! via `#[from]` where an operation can fail on arithmetic or signature
//! grounds.

use thiserror::Error;

/// Errors from checked integer arithmetic on [`Amount`](crate::Amount).
///
/// Every balance mutation in the stack uses checked operations. An
/// arithmetic error aborts the surrounding state transition before any
/// field has been written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    /// Addition or multiplication exceeded the representable range.
    #[error("arithmetic overflow during {operation}")]
    Overflow {
        /// The operation that overflowed (e.g., "stake deposit").
        operation: String,
    },

    /// Subtraction would have produced a negative amount.
    #[error("arithmetic underflow during {operation}: {minuend} - {subtrahend}")]
    Underflow {
        /// The operation that underflowed.
        operation: String,
        /// The value subtracted from.
        minuend: u64,
        /// The value subtracted.
        subtrahend: u64,
    },

    /// A basis-points factor exceeded the 10 000 denominator.
    #[error("basis points out of range: {0} (max 10000)")]
    BasisPointsOutOfRange(u32),

    /// A percentage exceeded 100.
    #[error("percentage out of range: {0} (max 100)")]
    PercentageOutOfRange(u8),
}

/// Errors from operator signature verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// The operator address bytes are not a valid Ed25519 public key.
    #[error("account address is not a valid Ed25519 public key: {address}")]
    InvalidPublicKey {
        /// Hex rendering of the rejected address.
        address: String,
    },

    /// The signature bytes are not a well-formed Ed25519 signature.
    #[error("malformed signature: expected 64 bytes, got {length}")]
    MalformedSignature {
        /// The actual byte length received.
        length: usize,
    },

    /// The signature does not verify over the receipt commitment.
    #[error("signature verification failed for receipt {receipt_id}")]
    VerificationFailed {
        /// The receipt whose commitment was signed.
        receipt_id: String,
    },
}

/// Errors from protocol parameter validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// A distribution schedule's non-primary shares meet or exceed 100 %.
    #[error("distribution schedule {schedule} reserves {total_bps} bps for non-primary shares (must be < 10000)")]
    ScheduleExhausted {
        /// The schedule name ("deterministic" or "arbitration").
        schedule: String,
        /// The combined non-primary share in basis points.
        total_bps: u32,
    },

    /// A basis-points parameter exceeded the 10 000 denominator.
    #[error("parameter {name} is {value} bps (max 10000)")]
    BasisPointsOutOfRange {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: u32,
    },

    /// The jail limit must allow at least one jailing before a ban.
    #[error("jail limit must be at least 1, got {0}")]
    JailLimitZero(u32),

    /// A window duration must be non-zero.
    #[error("window {name} must be non-zero")]
    ZeroWindow {
        /// The window parameter name.
        name: String,
    },
}
