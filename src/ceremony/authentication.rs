//! Authentication (assertion) ceremony

use async_trait::async_trait;
use url::Url;

use crate::api::{decode_login_result, ApiFailure, LoginOutcome};
use crate::authenticator::{AuthenticatorError, PlatformAuthenticator};
use crate::ceremony::kind::CeremonyKind;
use crate::errors::CeremonyError;
use crate::transport::{headers, HttpRequest, HttpResponse};
use crate::webauthn::{
    decode_request_options, encode_assertion, AssertionResult, DecodeError, RequestOptions,
};

/// Message reported when the server refuses a login submission
pub const LOGIN_REJECTED: &str = "Error calling updateLoginResponse";

/// Sign in with an existing credential
#[derive(Debug, Clone)]
pub struct Authentication {
    options_url: Url,
    submit_url: Url,
    user_id: i64,
}

impl Authentication {
    /// `credential_id` narrows the challenge to one credential and is sent as
    /// the `credId` query parameter
    #[must_use]
    pub fn new(
        mut options_url: Url,
        submit_url: Url,
        user_id: i64,
        credential_id: Option<&str>,
    ) -> Self {
        if let Some(credential_id) = credential_id {
            options_url
                .query_pairs_mut()
                .append_pair("credId", credential_id);
        }
        Self {
            options_url,
            submit_url,
            user_id,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}

#[async_trait]
impl CeremonyKind for Authentication {
    type Options = RequestOptions;
    type Output = AssertionResult;
    type Outcome = LoginOutcome;

    const NAME: &'static str = "authentication";
    const CHALLENGE_FAILURE: &'static str = "Error calling loginRequest";

    fn challenge_request(&self) -> HttpRequest {
        HttpRequest::get(self.options_url.clone())
            .header(headers::USER_ID, self.user_id.to_string())
    }

    fn decode_options(&self, body: &[u8]) -> Result<RequestOptions, DecodeError> {
        decode_request_options(body)
    }

    async fn invoke_authenticator(
        &self,
        authenticator: &dyn PlatformAuthenticator,
        options: &RequestOptions,
    ) -> Result<AssertionResult, AuthenticatorError> {
        authenticator.get_assertion(options).await
    }

    fn encode_submission(&self, output: &AssertionResult) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&encode_assertion(output))
    }

    fn submission_request(&self, body: Vec<u8>) -> HttpRequest {
        HttpRequest::post_json(self.submit_url.clone(), body)
    }

    fn interpret(&self, response: &HttpResponse) -> Result<LoginOutcome, CeremonyError> {
        if !response.is_success() {
            return Err(CeremonyError::Rejected {
                status: response.status,
                message: LOGIN_REJECTED.to_string(),
            });
        }
        if response.body.is_empty() {
            return Err(ApiFailure::new("Empty response from updateLoginResponse").into());
        }

        match decode_login_result(&response.body)? {
            LoginOutcome::Failure { reason } => Err(CeremonyError::Unconfirmed(reason)),
            success @ LoginOutcome::Success { .. } => Ok(success),
        }
    }
}
