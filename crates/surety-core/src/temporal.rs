//! # Temporal Types
//!
//! UTC-only timestamp type for the Surety Stack. All timestamps are stored
//! in UTC with second-level precision and a `Z` suffix in serialized form.
//!
//! ## Design Decision
//!
//! Every window in the protocol (challenge, counter-bond, arbitration,
//! withdrawal cooldown) is an absolute deadline compared against ledger
//! time. Ledger time is always passed *into* the state machine as a
//! parameter — nothing in a settlement path reads a wall clock — so window
//! boundaries are deterministic and replayable.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A UTC timestamp with second-level precision.
///
/// Serializes to ISO 8601 format with `Z` suffix (e.g., `2026-01-15T12:00:00Z`).
/// Ordered so that deadline comparisons read naturally
/// (`now > deadline`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current UTC time.
    ///
    /// Intended for embedders constructing ledger input; settlement code
    /// never calls this internally.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Create a timestamp from whole seconds since the Unix epoch.
    ///
    /// Out-of-range inputs clamp to the representable bounds; the ledger
    /// only ever produces second-precision times well inside them.
    pub fn from_unix_secs(secs: i64) -> Self {
        match Utc.timestamp_opt(secs, 0) {
            chrono::LocalResult::Single(dt) => Self(dt),
            _ => Self(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Whole seconds since the Unix epoch.
    pub fn unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// This timestamp advanced by `secs` whole seconds.
    ///
    /// Used to derive window deadlines (`opened_at.plus_secs(window)`).
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0 + chrono::Duration::seconds(secs as i64))
    }

    /// Whole seconds elapsed since `earlier`, zero if `earlier` is in the
    /// future relative to `self`.
    pub fn secs_since(&self, earlier: &Timestamp) -> u64 {
        (self.0 - earlier.0).num_seconds().max(0) as u64
    }

    /// Return the timestamp as an ISO 8601 string with Z suffix,
    /// truncated to seconds.
    pub fn to_canonical_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
