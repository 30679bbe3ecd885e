//! Ceremony states and the transitions allowed between them

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::FailureKind;

/// Where a ceremony attempt stands
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum CeremonyState {
    Idle,
    ChallengeRequested,
    ChallengeReceived,
    AwaitingAuthenticator,
    ResponseSubmitted,
    Completed,
    Failed(FailureKind),
}

impl CeremonyState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, CeremonyState::Completed | CeremonyState::Failed(_))
    }

    /// Whether `next` directly follows `self`
    ///
    /// The happy path is strictly linear; `Failed` is reachable from any
    /// state that is not already terminal.
    #[must_use]
    pub fn can_advance_to(&self, next: &CeremonyState) -> bool {
        use CeremonyState::{
            AwaitingAuthenticator, ChallengeReceived, ChallengeRequested, Completed, Failed, Idle,
            ResponseSubmitted,
        };

        match (self, next) {
            (current, Failed(_)) => !current.is_terminal(),
            (Idle, ChallengeRequested)
            | (ChallengeRequested, ChallengeReceived)
            | (ChallengeReceived, AwaitingAuthenticator)
            | (AwaitingAuthenticator, ResponseSubmitted)
            | (ResponseSubmitted, Completed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CeremonyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CeremonyState::Idle => write!(f, "idle"),
            CeremonyState::ChallengeRequested => write!(f, "challenge requested"),
            CeremonyState::ChallengeReceived => write!(f, "challenge received"),
            CeremonyState::AwaitingAuthenticator => write!(f, "awaiting authenticator"),
            CeremonyState::ResponseSubmitted => write!(f, "response submitted"),
            CeremonyState::Completed => write!(f, "completed"),
            CeremonyState::Failed(kind) => write!(f, "failed ({kind:?})"),
        }
    }
}
