//! # Dispute Reason Codes
//!
//! Every dispute names a reason code, and the code determines which
//! resolution path applies. The code-to-path table below is a fixed
//! policy: mechanically checkable violations resolve deterministically
//! inside the receipt hub, everything else escalates to arbitration or
//! the optimistic counter-bond engine. Changing the table changes the
//! trust model, so it is a single `match` with no configuration hook.

use serde::{Deserialize, Serialize};

/// Why a receipt is being disputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputeReason {
    /// The receipt expired with no settlement observable on-ledger.
    SettlementTimeout,
    /// The operator signature over the receipt commitment is invalid.
    InvalidSignature,
    /// Settlement went to the wrong destination venue.
    WrongDestination,
    /// Settlement delivered the wrong asset.
    WrongAsset,
    /// Settlement paid the wrong recipient.
    WrongRecipient,
    /// The execution violated the intent's constraint set.
    ConstraintViolation,
    /// The outcome was technically conformant but substantively deficient.
    QualityViolation,
    /// Any other grievance requiring human judgment.
    Other,
}

/// Which resolution machinery handles a dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionPath {
    /// Resolvable by mechanical check against ledger state.
    Deterministic,
    /// Requires arbitration or the optimistic counter-bond protocol.
    Escalated,
}

impl DisputeReason {
    /// The fixed code-to-path mapping.
    pub fn path(&self) -> ResolutionPath {
        match self {
            Self::SettlementTimeout
            | Self::InvalidSignature
            | Self::WrongDestination
            | Self::WrongAsset
            | Self::WrongRecipient => ResolutionPath::Deterministic,
            Self::ConstraintViolation | Self::QualityViolation | Self::Other => {
                ResolutionPath::Escalated
            }
        }
    }

    /// All reason codes as a slice.
    pub fn all() -> &'static [DisputeReason] {
        &[
            Self::SettlementTimeout,
            Self::InvalidSignature,
            Self::WrongDestination,
            Self::WrongAsset,
            Self::WrongRecipient,
            Self::ConstraintViolation,
            Self::QualityViolation,
            Self::Other,
        ]
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SettlementTimeout => "settlement_timeout",
            Self::InvalidSignature => "invalid_signature",
            Self::WrongDestination => "wrong_destination",
            Self::WrongAsset => "wrong_asset",
            Self::WrongRecipient => "wrong_recipient",
            Self::ConstraintViolation => "constraint_violation",
            Self::QualityViolation => "quality_violation",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for DisputeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
