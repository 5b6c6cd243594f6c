//! # Protocol Parameters
//!
//! Every tunable of the accountability ledger in one serde-loadable
//! struct. [`ProtocolParams::default`] encodes the protocol constants;
//! embedders may load alternatives from JSON and must call
//! [`ProtocolParams::validate`] before wiring components.
//!
//! Components receive a validated copy at construction and never read
//! configuration from globals.

use serde::{Deserialize, Serialize};

use crate::amount::{Amount, BPS_DENOMINATOR};
use crate::error::ParamsError;

/// Base units per native unit (10⁹, lamport-style).
pub const BASE_UNITS_PER_NATIVE: u64 = 1_000_000_000;

/// Minimum stake to activate an executor: 0.1 native units.
pub const DEFAULT_MIN_EXECUTOR_STAKE: Amount =
    Amount::from_base_units(BASE_UNITS_PER_NATIVE / 10);

/// Challenge window after a receipt is posted: 1 hour.
pub const DEFAULT_CHALLENGE_WINDOW_SECS: u64 = 3_600;

/// Window for the executor to match a challenger bond: 24 hours.
pub const DEFAULT_COUNTER_BOND_WINDOW_SECS: u64 = 86_400;

/// Window for the arbitrator to rule on a contested dispute: 7 days.
pub const DEFAULT_ARBITRATION_WINDOW_SECS: u64 = 7 * 86_400;

/// Cooldown between requesting and executing a stake withdrawal: 7 days.
pub const DEFAULT_WITHDRAWAL_COOLDOWN_SECS: u64 = 7 * 86_400;

/// Jailings before a permanent ban.
pub const DEFAULT_JAIL_LIMIT: u32 = 3;

/// Challenger bond as a fraction of executor stake: 10 %.
pub const DEFAULT_DISPUTE_BOND_BPS: u32 = 1_000;

/// Inactivity period after which reputation halves: 30 days.
pub const DEFAULT_DECAY_HALF_LIFE_SECS: u64 = 30 * 86_400;

/// Floor for the reputation decay multiplier: 10 %.
pub const DEFAULT_DECAY_FLOOR_BPS: u32 = 1_000;

/// Protocol configuration shared by every component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Minimum available stake for an executor to be Active.
    pub min_executor_stake: Amount,
    /// Stake an executor must hold per unit of declared volume, in basis
    /// points (10 000 = full collateralization).
    pub coverage_bps: u32,
    /// Seconds after posting during which a receipt may be disputed.
    pub challenge_window_secs: u64,
    /// Seconds the executor has to match a challenger bond.
    pub counter_bond_window_secs: u64,
    /// Seconds the arbitrator has to rule on a contested dispute.
    pub arbitration_window_secs: u64,
    /// Seconds between withdrawal request and execution.
    pub withdrawal_cooldown_secs: u64,
    /// Jailings before a permanent ban.
    pub jail_limit: u32,
    /// Challenger bond as a fraction of executor total stake.
    pub dispute_bond_bps: u32,
    /// Challenger share of a deterministic slash (beneficiary takes the
    /// remainder after this and the treasury share).
    pub slash_challenger_bps: u32,
    /// Treasury share of a deterministic slash.
    pub slash_treasury_bps: u32,
    /// Treasury share of an arbitrated slash (beneficiary takes the
    /// remainder after this and the arbitrator share).
    pub arbitration_treasury_bps: u32,
    /// Arbitrator share of an arbitrated slash.
    pub arbitration_arbitrator_bps: u32,
    /// Inactivity period after which read-time reputation halves.
    pub decay_half_life_secs: u64,
    /// Floor for the reputation decay multiplier.
    pub decay_floor_bps: u32,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            min_executor_stake: DEFAULT_MIN_EXECUTOR_STAKE,
            coverage_bps: BPS_DENOMINATOR,
            challenge_window_secs: DEFAULT_CHALLENGE_WINDOW_SECS,
            counter_bond_window_secs: DEFAULT_COUNTER_BOND_WINDOW_SECS,
            arbitration_window_secs: DEFAULT_ARBITRATION_WINDOW_SECS,
            withdrawal_cooldown_secs: DEFAULT_WITHDRAWAL_COOLDOWN_SECS,
            jail_limit: DEFAULT_JAIL_LIMIT,
            dispute_bond_bps: DEFAULT_DISPUTE_BOND_BPS,
            // 80/15/5: beneficiary takes the remainder.
            slash_challenger_bps: 1_500,
            slash_treasury_bps: 500,
            // 70/20/10: beneficiary takes the remainder.
            arbitration_treasury_bps: 2_000,
            arbitration_arbitrator_bps: 1_000,
            decay_half_life_secs: DEFAULT_DECAY_HALF_LIFE_SECS,
            decay_floor_bps: DEFAULT_DECAY_FLOOR_BPS,
        }
    }
}

impl ProtocolParams {
    /// Load parameters from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error for malformed input; the
    /// result must still pass [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check internal consistency of the parameter set.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamsError`] naming the offending parameter. Both
    /// distribution schedules must leave a positive primary share, every
    /// basis-points field must respect the denominator, windows must be
    /// non-zero, and the jail limit must allow at least one jailing.
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in [
            ("coverage_bps", self.coverage_bps),
            ("dispute_bond_bps", self.dispute_bond_bps),
            ("slash_challenger_bps", self.slash_challenger_bps),
            ("slash_treasury_bps", self.slash_treasury_bps),
            ("arbitration_treasury_bps", self.arbitration_treasury_bps),
            ("arbitration_arbitrator_bps", self.arbitration_arbitrator_bps),
            ("decay_floor_bps", self.decay_floor_bps),
        ] {
            if value > BPS_DENOMINATOR {
                return Err(ParamsError::BasisPointsOutOfRange {
                    name: name.to_string(),
                    value,
                });
            }
        }

        let deterministic = self.slash_challenger_bps + self.slash_treasury_bps;
        if deterministic >= BPS_DENOMINATOR {
            return Err(ParamsError::ScheduleExhausted {
                schedule: "deterministic".to_string(),
                total_bps: deterministic,
            });
        }
        let arbitration = self.arbitration_treasury_bps + self.arbitration_arbitrator_bps;
        if arbitration >= BPS_DENOMINATOR {
            return Err(ParamsError::ScheduleExhausted {
                schedule: "arbitration".to_string(),
                total_bps: arbitration,
            });
        }

        if self.jail_limit == 0 {
            return Err(ParamsError::JailLimitZero(0));
        }

        for (name, value) in [
            ("challenge_window_secs", self.challenge_window_secs),
            ("counter_bond_window_secs", self.counter_bond_window_secs),
            ("arbitration_window_secs", self.arbitration_window_secs),
            ("withdrawal_cooldown_secs", self.withdrawal_cooldown_secs),
            ("decay_half_life_secs", self.decay_half_life_secs),
        ] {
            if value == 0 {
                return Err(ParamsError::ZeroWindow {
                    name: name.to_string(),
                });
            }
        }

        Ok(())
    }
}
