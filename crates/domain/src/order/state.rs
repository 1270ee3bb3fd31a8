//! Commit protocol state machine.

use serde::{Deserialize, Serialize};

/// Where a commit currently is.
///
/// State transitions:
/// ```text
/// Idle ──► Validating ──► Committing ──► Done ──┐
///               │              │                ├──► Idle
///               └──────────────┴──► Rejected ───┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommitState {
    /// No commit in progress.
    #[default]
    Idle,

    /// Entry checks passed; every line is being checked against stock.
    Validating,

    /// Stock is being taken out and the order written to the ledger.
    Committing,

    /// The order is in the ledger.
    Done,

    /// The commit failed; stores hold their pre-commit contents.
    Rejected,
}

impl CommitState {
    /// Returns true if a new commit may start.
    pub fn can_validate(&self) -> bool {
        matches!(self, CommitState::Idle)
    }

    /// Returns true if stock may be taken out.
    pub fn can_commit(&self) -> bool {
        matches!(self, CommitState::Validating)
    }

    /// Returns true if the commit may be rejected from here.
    pub fn can_reject(&self) -> bool {
        matches!(self, CommitState::Validating | CommitState::Committing)
    }

    /// Returns true if the commit may finish successfully.
    pub fn can_finish(&self) -> bool {
        matches!(self, CommitState::Committing)
    }

    /// Returns true if this commit has an outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CommitState::Done | CommitState::Rejected)
    }

    /// Returns true if moving to `next` is a legal step.
    pub fn can_transition_to(&self, next: CommitState) -> bool {
        match next {
            CommitState::Idle => self.is_terminal(),
            CommitState::Validating => self.can_validate(),
            CommitState::Committing => self.can_commit(),
            CommitState::Done => self.can_finish(),
            CommitState::Rejected => self.can_reject(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitState::Idle => "Idle",
            CommitState::Validating => "Validating",
            CommitState::Committing => "Committing",
            CommitState::Done => "Done",
            CommitState::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
