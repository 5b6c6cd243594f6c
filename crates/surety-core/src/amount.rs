//! # Integer Amounts
//!
//! Money throughout the stack is an integer count of base units
//! (10⁹ base units per native unit). Every operation is checked; overflow
//! and underflow are typed errors that abort the surrounding state
//! transition.
//!
//! ## Exact-Sum Distributions
//!
//! Slash distributions are computed remainder-first via [`split_exact`]:
//! the secondary and tertiary shares are rounded down from basis points
//! and the primary share takes the remainder, so the three shares always
//! sum to exactly the slashed amount. No dust is created or lost.

use serde::{Deserialize, Serialize};

use crate::error::ArithmeticError;

/// The basis-points denominator (100 % = 10 000 bps).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// An amount of value in base units.
///
/// Wraps `u64` with checked arithmetic only. Display renders the raw base
/// units; presentation-layer formatting is an embedder concern.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from base units.
    pub const fn from_base_units(units: u64) -> Self {
        Self(units)
    }

    /// The raw base-unit count.
    pub const fn base_units(&self) -> u64 {
        self.0
    }

    /// Whether this amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the sum exceeds `u64::MAX`.
    pub fn checked_add(&self, other: Amount, operation: &str) -> Result<Amount, ArithmeticError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| ArithmeticError::Overflow {
                operation: operation.to_string(),
            })
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Underflow`] if `other` exceeds `self`.
    pub fn checked_sub(&self, other: Amount, operation: &str) -> Result<Amount, ArithmeticError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| ArithmeticError::Underflow {
                operation: operation.to_string(),
                minuend: self.0,
                subtrahend: other.0,
            })
    }

    /// The share of this amount described by `bps` basis points, rounded
    /// down.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::BasisPointsOutOfRange`] if `bps` exceeds
    /// the 10 000 denominator.
    pub fn share_bps(&self, bps: u32) -> Result<Amount, ArithmeticError> {
        if bps > BPS_DENOMINATOR {
            return Err(ArithmeticError::BasisPointsOutOfRange(bps));
        }
        // u64 * bps (≤ 10⁴) fits in u128 with room to spare.
        let share = (self.0 as u128) * (bps as u128) / (BPS_DENOMINATOR as u128);
        Ok(Amount(share as u64))
    }

    /// The share of this amount described by a whole percentage, rounded
    /// down.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::PercentageOutOfRange`] if `pct` exceeds
    /// 100.
    pub fn share_percent(&self, pct: u8) -> Result<Amount, ArithmeticError> {
        if pct > 100 {
            return Err(ArithmeticError::PercentageOutOfRange(pct));
        }
        self.share_bps(pct as u32 * 100)
    }

    /// The smaller of two amounts.
    pub fn min(self, other: Amount) -> Amount {
        Amount(self.0.min(other.0))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A three-way distribution of a slashed amount.
///
/// Produced by [`split_exact`]; the shares sum to exactly the input total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    /// The primary share (remainder after the fixed shares).
    pub primary: Amount,
    /// The secondary share (e.g., challenger or treasury).
    pub secondary: Amount,
    /// The tertiary share (e.g., treasury or arbitrator).
    pub tertiary: Amount,
}

/// Split `total` into three shares that sum exactly to `total`.
///
/// The secondary and tertiary shares are `total × bps / 10000` rounded
/// down; the primary share is the remainder. Callers validate through
/// [`ProtocolParams::validate`](crate::ProtocolParams::validate) that
/// `secondary_bps + tertiary_bps < 10000`, so the primary share is always
/// positive for a positive total.
///
/// # Errors
///
/// Returns [`ArithmeticError::BasisPointsOutOfRange`] if either factor
/// exceeds the denominator, or [`ArithmeticError::Underflow`] if the fixed
/// shares together exceed the total (impossible for validated schedules).
pub fn split_exact(
    total: Amount,
    secondary_bps: u32,
    tertiary_bps: u32,
) -> Result<Distribution, ArithmeticError> {
    let secondary = total.share_bps(secondary_bps)?;
    let tertiary = total.share_bps(tertiary_bps)?;
    let fixed = secondary.checked_add(tertiary, "distribution fixed shares")?;
    let primary = total.checked_sub(fixed, "distribution primary share")?;
    Ok(Distribution {
        primary,
        secondary,
        tertiary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_add_overflow_rejected() {
        let a = Amount::from_base_units(u64::MAX);
        let err = a.checked_add(Amount::from_base_units(1), "test").unwrap_err();
        assert!(matches!(err, ArithmeticError::Overflow { .. }));
    }

    #[test]
    fn checked_sub_underflow_rejected() {
        let a = Amount::from_base_units(5);
        let err = a.checked_sub(Amount::from_base_units(6), "test").unwrap_err();
        assert!(matches!(err, ArithmeticError::Underflow { .. }));
    }

    #[test]
    fn share_bps_rounds_down() {
        let a = Amount::from_base_units(1001);
        // 15% of 1001 = 150.15 → 150
        assert_eq!(a.share_bps(1500).unwrap(), Amount::from_base_units(150));
    }

    #[test]
    fn share_bps_out_of_range_rejected() {
        let a = Amount::from_base_units(100);
        assert!(a.share_bps(10_001).is_err());
    }

    #[test]
    fn share_percent_caps_at_100() {
        let a = Amount::from_base_units(100);
        assert!(a.share_percent(101).is_err());
        assert_eq!(a.share_percent(100).unwrap(), a);
    }

    #[test]
    fn split_exact_sums_to_total() {
        // 80/15/5 schedule over an amount that does not divide evenly.
        let total = Amount::from_base_units(999_999_937);
        let d = split_exact(total, 1500, 500).unwrap();
        let sum = d
            .primary
            .checked_add(d.secondary, "t")
            .unwrap()
            .checked_add(d.tertiary, "t")
            .unwrap();
        assert_eq!(sum, total);
    }

    #[test]
    fn split_exact_zero_total() {
        let d = split_exact(Amount::ZERO, 2000, 1000).unwrap();
        assert_eq!(d.primary, Amount::ZERO);
        assert_eq!(d.secondary, Amount::ZERO);
        assert_eq!(d.tertiary, Amount::ZERO);
    }

    #[test]
    fn split_exact_primary_takes_remainder() {
        let total = Amount::from_base_units(100);
        let d = split_exact(total, 1500, 500).unwrap();
        assert_eq!(d.secondary, Amount::from_base_units(15));
        assert_eq!(d.tertiary, Amount::from_base_units(5));
        assert_eq!(d.primary, Amount::from_base_units(80));
    }
}
