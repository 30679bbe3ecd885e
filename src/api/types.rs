//! Relying-party result types
//!
//! Typed views of what the server answers once a ceremony response has been
//! submitted, plus the structured failure built from any non-success reply.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reason reported when a login reply lacks a user identity
pub const INVALID_LOGIN_RESPONSE: &str = "Invalid login response";

/// Server-confirmed stored credential
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: String, // Credential ID as the server stores it
}

impl CredentialRecord {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Result of a login or user lookup
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoginOutcome {
    Success {
        user_id: i64,
        username: Option<String>,
    },
    Failure {
        reason: String,
    },
}

impl LoginOutcome {
    pub(crate) fn failure(reason: &str) -> Self {
        LoginOutcome::Failure {
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success { .. })
    }

    /// The confirmed user id, if the server supplied one
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        match self {
            LoginOutcome::Success { user_id, .. } => Some(*user_id),
            LoginOutcome::Failure { .. } => None,
        }
    }
}

/// A relying-party call that did not report success
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiFailure {
    pub message: String,
    pub server_error: Option<String>, // Best-effort "error" field of the body
    pub status: Option<u16>,
}

impl ApiFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            server_error: None,
            status: None,
        }
    }

    /// Build a failure from an HTTP reply, mining the body for a server error
    ///
    /// An empty body leaves `server_error` unset; any other body is run through
    /// [`crate::api::decode_server_error`], which never fails.
    #[must_use]
    pub fn from_response(message: impl Into<String>, status: u16, body: &[u8]) -> Self {
        let server_error = if body.is_empty() {
            None
        } else {
            Some(crate::api::decode_server_error(body))
        };
        Self {
            message: message.into(),
            server_error,
            status: Some(status),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.server_error {
            Some(server_error) => write!(f, "{}; {server_error}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ApiFailure {}
