//! # Optimistic Dispute Records
//!
//! Status machine: `Open → {Contested | ChallengerWins}` (counter-bond
//! posted, or counter-bond timeout), `Contested → {ChallengerWins |
//! SolverWins}` (arbitration, or arbitration timeout which defaults to
//! the challenger). Both outcomes are terminal.

use serde::{Deserialize, Serialize};

use surety_core::{AccountAddress, Amount, DisputeId, ExecutorId, ReceiptId, Timestamp};

use crate::evidence::EvidenceEntry;

/// The status of an optimistic dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptimisticDisputeStatus {
    /// Awaiting the executor's counter-bond.
    Open,
    /// Counter-bond posted; awaiting arbitration.
    Contested,
    /// Resolved for the challenger. Terminal state.
    ChallengerWins,
    /// Resolved for the executor. Terminal state.
    SolverWins,
}

impl OptimisticDisputeStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ChallengerWins | Self::SolverWins)
    }

    /// Whether the machine permits a transition from `self` to `to`.
    pub fn can_transition_to(&self, to: OptimisticDisputeStatus) -> bool {
        use OptimisticDisputeStatus::*;
        matches!(
            (self, to),
            (Open, Contested)
                | (Open, ChallengerWins)
                | (Contested, ChallengerWins)
                | (Contested, SolverWins)
        )
    }

    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Contested => "CONTESTED",
            Self::ChallengerWins => "CHALLENGER_WINS",
            Self::SolverWins => "SOLVER_WINS",
        }
    }
}

impl std::fmt::Display for OptimisticDisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An optimistic dispute running the counter-bond protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimisticDispute {
    /// Identity derived from (receipt, challenger, open time).
    pub id: DisputeId,
    /// The disputed receipt.
    pub receipt: ReceiptId,
    /// The executor on the hook.
    pub executor: ExecutorId,
    /// The original hub-dispute challenger.
    pub challenger: AccountAddress,
    /// The challenger's bond, as held by the hub (referenced, never
    /// re-collected).
    pub challenger_bond: Amount,
    /// The executor's matching bond; zero until posted.
    pub counter_bond: Amount,
    /// When the dispute was opened here.
    pub opened_at: Timestamp,
    /// Deadline for the executor to post the counter-bond.
    pub counter_deadline: Timestamp,
    /// Deadline for the arbitrator, set when the dispute is contested.
    pub arbitration_deadline: Option<Timestamp>,
    /// Current status.
    pub status: OptimisticDisputeStatus,
    /// Append-only evidence log.
    pub evidence: Vec<EvidenceEntry>,
}
