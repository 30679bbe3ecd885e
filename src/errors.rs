//! Ceremony error taxonomy
//!
//! `CeremonyError` carries the detail of a failed attempt. `FailureKind` is its
//! copyable summary, stored in `CeremonyState::Failed`.

use serde::{Deserialize, Serialize};

use crate::api::ApiFailure;
use crate::authenticator::AuthenticatorError;
use crate::transport::TransportError;
use crate::webauthn::DecodeError;

/// Why a ceremony ended in `Failed`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Decode,
    Transport,
    Api,
    Cancelled,
    Authenticator,
    Rejected,
    Unconfirmed,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum CeremonyError {
    #[error("Malformed server payload: {0}")]
    Decode(#[from] DecodeError),

    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    Api(#[from] ApiFailure),

    #[error("{0}")]
    Authenticator(#[from] AuthenticatorError),

    /// The server answered the submission with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The server answered 2xx but did not confirm the ceremony
    #[error("{0}")]
    Unconfirmed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CeremonyError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            CeremonyError::Decode(_) => FailureKind::Decode,
            CeremonyError::Transport(_) => FailureKind::Transport,
            CeremonyError::Api(_) => FailureKind::Api,
            CeremonyError::Authenticator(AuthenticatorError::Cancelled) => FailureKind::Cancelled,
            CeremonyError::Authenticator(_) => FailureKind::Authenticator,
            CeremonyError::Rejected { .. } => FailureKind::Rejected,
            CeremonyError::Unconfirmed(_) => FailureKind::Unconfirmed,
            CeremonyError::Internal(_) => FailureKind::Internal,
        }
    }
}
