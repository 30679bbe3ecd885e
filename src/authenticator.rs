//! Platform authenticator seam
//!
//! The device authenticator is an external party. A ceremony awaits it exactly
//! once per attempt and treats its answer as opaque bytes.

use std::fmt;

use async_trait::async_trait;

use crate::webauthn::{AssertionResult, AttestationResult, CreationOptions, RequestOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticatorError {
    /// The user dismissed or aborted the prompt
    Cancelled,
    Failed(String),
}

impl fmt::Display for AuthenticatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticatorError::Cancelled => write!(f, "Authenticator prompt was cancelled"),
            AuthenticatorError::Failed(msg) => write!(f, "Authenticator failed: {msg}"),
        }
    }
}

impl std::error::Error for AuthenticatorError {}

#[async_trait]
pub trait PlatformAuthenticator: Send + Sync {
    /// Create a new credential for the given creation options
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Cancelled` when the user aborts, or
    /// `AuthenticatorError::Failed` for any other device failure.
    async fn make_credential(
        &self,
        options: &CreationOptions,
    ) -> Result<AttestationResult, AuthenticatorError>;

    /// Sign the challenge in the given request options
    ///
    /// # Errors
    ///
    /// Returns `AuthenticatorError::Cancelled` when the user aborts, or
    /// `AuthenticatorError::Failed` for any other device failure.
    async fn get_assertion(
        &self,
        options: &RequestOptions,
    ) -> Result<AssertionResult, AuthenticatorError>;
}
