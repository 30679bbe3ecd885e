//! Per-ceremony behavior plugged into the generic driver

use async_trait::async_trait;

use crate::authenticator::{AuthenticatorError, PlatformAuthenticator};
use crate::errors::CeremonyError;
use crate::transport::{HttpRequest, HttpResponse};
use crate::webauthn::DecodeError;

/// What differs between registration and authentication
///
/// The sequencer owns ordering, state and logging; a kind only knows how to
/// build its two requests, talk to the authenticator and read the verdict.
#[async_trait]
pub trait CeremonyKind: Send + Sync {
    /// Decoded challenge options handed to the authenticator
    type Options: Send + Sync;
    /// Raw authenticator output
    type Output: Send + Sync;
    /// Server verdict on success
    type Outcome: Send;

    /// Short name used in log lines
    const NAME: &'static str;

    /// Message of the `ApiFailure` raised when the challenge call is refused
    const CHALLENGE_FAILURE: &'static str;

    fn challenge_request(&self) -> HttpRequest;

    /// # Errors
    ///
    /// Returns `DecodeError` when the body is not a valid options document.
    fn decode_options(&self, body: &[u8]) -> Result<Self::Options, DecodeError>;

    /// # Errors
    ///
    /// Passes through whatever the authenticator reports.
    async fn invoke_authenticator(
        &self,
        authenticator: &dyn PlatformAuthenticator,
        options: &Self::Options,
    ) -> Result<Self::Output, AuthenticatorError>;

    /// Serialize the authenticator output into the submission body
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    fn encode_submission(&self, output: &Self::Output) -> Result<Vec<u8>, serde_json::Error>;

    fn submission_request(&self, body: Vec<u8>) -> HttpRequest;

    /// Turn the submission reply into an outcome
    ///
    /// # Errors
    ///
    /// Returns the `CeremonyError` the reply amounts to.
    fn interpret(&self, response: &HttpResponse) -> Result<Self::Outcome, CeremonyError>;
}
