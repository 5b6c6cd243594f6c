//! # Executor Records
//!
//! Record shapes for registered executors: lifecycle status, stake
//! balances, reputation counters, and the read-time decay view.
//!
//! ## Conservation Invariant
//!
//! For every executor, at every point in the call history:
//!
//! `available + locked == total_deposited − total_withdrawn − total_slashed`
//!
//! The cumulative counters are `u128` so they cannot saturate within the
//! lifetime of a `u64`-denominated stake; [`ExecutorRecord::conservation_holds`]
//! checks the invariant and is exercised by the property tests.

use serde::{Deserialize, Serialize};

use surety_core::{AccountAddress, Amount, ContentDigest, ExecutorId, Timestamp, BPS_DENOMINATOR};

/// The lifecycle status of an executor.
///
/// Status machine: `Inactive ⇄ Active`, either → `Jailed` on a lost
/// dispute, `Jailed` → `Active`/`Inactive` via privileged unjail, and
/// `Banned` once the jail limit is reached. `Banned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutorStatus {
    /// Registered but below the minimum stake.
    Inactive,
    /// Staked at or above the minimum; may post receipts.
    Active,
    /// Lost a dispute; barred from posting until unjailed.
    Jailed,
    /// Reached the jail limit. Terminal state.
    Banned,
}

impl ExecutorStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Banned)
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "INACTIVE",
            Self::Active => "ACTIVE",
            Self::Jailed => "JAILED",
            Self::Banned => "BANNED",
        }
    }
}

impl std::fmt::Display for ExecutorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifetime reputation counters for an executor.
///
/// Stored counters are exact and never decayed in place; decay is a
/// read-time multiplier only (see [`decay_multiplier_bps`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationCounters {
    /// Receipts settled in the executor's favor or against it.
    pub total_fills: u64,
    /// Receipts finalized without fault.
    pub successful_fills: u64,
    /// Disputes opened against the executor.
    pub disputes_opened: u64,
    /// Disputes the executor lost.
    pub disputes_lost: u64,
    /// Cumulative declared volume across successful fills, base units.
    pub volume_processed: u128,
    /// Cumulative stake forfeited, base units.
    pub total_slashed: u128,
}

/// A withdrawal awaiting its cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingWithdrawal {
    /// The amount requested.
    pub amount: Amount,
    /// When the cooldown elapses.
    pub matures_at: Timestamp,
}

/// A registered executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorRecord {
    /// The executor's opaque identity.
    pub id: ExecutorId,
    /// The operator address bound at registration; never rebound.
    pub operator: AccountAddress,
    /// Digest of the registration metadata.
    pub metadata: ContentDigest,
    /// Current lifecycle status.
    pub status: ExecutorStatus,
    /// Stake available for coverage and withdrawal.
    pub available: Amount,
    /// Stake locked against open disputes.
    pub locked: Amount,
    /// Cumulative deposits, base units.
    pub total_deposited: u128,
    /// Cumulative withdrawals, base units.
    pub total_withdrawn: u128,
    /// Times jailed; at the jail limit the executor is banned.
    pub jail_count: u32,
    /// When the executor registered.
    pub registered_at: Timestamp,
    /// Last successful fill or registration time.
    pub last_activity: Timestamp,
    /// Withdrawal awaiting cooldown, if any.
    pub pending_withdrawal: Option<PendingWithdrawal>,
    /// Lifetime reputation counters.
    pub reputation: ReputationCounters,
}

impl ExecutorRecord {
    /// Available plus locked stake.
    pub fn total_stake(&self) -> Amount {
        Amount::from_base_units(
            self.available.base_units().saturating_add(self.locked.base_units()),
        )
    }

    /// Whether the conservation invariant holds for this record.
    pub fn conservation_holds(&self) -> bool {
        let held = self.available.base_units() as u128 + self.locked.base_units() as u128;
        self.total_deposited
            == held + self.total_withdrawn + self.reputation.total_slashed
    }
}

/// The read-time decay multiplier in basis points.
///
/// Halves for every full `half_life_secs` of inactivity, floored at
/// `floor_bps`. A pure function of its inputs — stored counters are never
/// mutated, so historical totals stay exact and replayable.
pub fn decay_multiplier_bps(
    last_activity: &Timestamp,
    now: &Timestamp,
    half_life_secs: u64,
    floor_bps: u32,
) -> u32 {
    let halvings = now.secs_since(last_activity) / half_life_secs;
    let multiplier = if halvings >= 32 {
        0
    } else {
        BPS_DENOMINATOR >> halvings
    };
    multiplier.max(floor_bps)
}

/// The undecayed reputation score.
///
/// 100 points per successful fill, capped at 10 000, minus 300 per lost
/// dispute, floored at zero.
pub fn reputation_score(counters: &ReputationCounters) -> u32 {
    let earned = counters.successful_fills.saturating_mul(100).min(10_000) as u32;
    let penalty = counters.disputes_lost.saturating_mul(300).min(10_000) as u32;
    earned.saturating_sub(penalty)
}

/// A snapshot of an executor's reputation with decay applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationView {
    /// The undecayed score.
    pub raw_score: u32,
    /// The decay multiplier applied, in basis points.
    pub multiplier_bps: u32,
    /// `raw_score × multiplier_bps / 10000`.
    pub decayed_score: u32,
    /// The exact stored counters.
    pub counters: ReputationCounters,
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_LIFE: u64 = 30 * 86_400;
    const FLOOR: u32 = 1_000;

    fn ts(secs: i64) -> Timestamp {
        Timestamp::from_unix_secs(secs)
    }

    #[test]
    fn no_decay_within_first_half_life() {
        let last = ts(0);
        let now = ts(HALF_LIFE as i64 - 1);
        assert_eq!(decay_multiplier_bps(&last, &now, HALF_LIFE, FLOOR), 10_000);
    }

    #[test]
    fn one_half_life_halves() {
        let last = ts(0);
        let now = ts(HALF_LIFE as i64);
        assert_eq!(decay_multiplier_bps(&last, &now, HALF_LIFE, FLOOR), 5_000);
    }

    #[test]
    fn decay_floors_at_minimum() {
        let last = ts(0);
        let now = ts(HALF_LIFE as i64 * 20);
        assert_eq!(decay_multiplier_bps(&last, &now, HALF_LIFE, FLOOR), FLOOR);
    }

    #[test]
    fn extreme_elapsed_does_not_shift_out_of_range() {
        let last = ts(0);
        let now = ts(HALF_LIFE as i64 * 50);
        assert_eq!(decay_multiplier_bps(&last, &now, HALF_LIFE, FLOOR), FLOOR);
    }

    #[test]
    fn score_rewards_fills_and_penalizes_losses() {
        let counters = ReputationCounters {
            successful_fills: 10,
            disputes_lost: 2,
            ..Default::default()
        };
        assert_eq!(reputation_score(&counters), 400);
    }

    #[test]
    fn score_caps_and_floors() {
        let many_fills = ReputationCounters {
            successful_fills: 1_000,
            ..Default::default()
        };
        assert_eq!(reputation_score(&many_fills), 10_000);

        let many_losses = ReputationCounters {
            successful_fills: 1,
            disputes_lost: 100,
            ..Default::default()
        };
        assert_eq!(reputation_score(&many_losses), 0);
    }

    #[test]
    fn status_terminality() {
        assert!(ExecutorStatus::Banned.is_terminal());
        assert!(!ExecutorStatus::Jailed.is_terminal());
        assert!(!ExecutorStatus::Active.is_terminal());
        assert!(!ExecutorStatus::Inactive.is_terminal());
    }
}
