//! Registration (attestation) ceremony

use async_trait::async_trait;
use url::Url;

use crate::api::{decode_credential_list, ApiFailure, CredentialRecord};
use crate::authenticator::{AuthenticatorError, PlatformAuthenticator};
use crate::ceremony::kind::CeremonyKind;
use crate::errors::CeremonyError;
use crate::transport::{headers, HttpRequest, HttpResponse};
use crate::webauthn::{
    decode_creation_options, encode_attestation, AttestationResult, CreationOptions, DecodeError,
};

/// Enroll a new credential for an already signed-in user
#[derive(Debug, Clone)]
pub struct Registration {
    options_url: Url,
    submit_url: Url,
    user_id: i64,
}

impl Registration {
    #[must_use]
    pub fn new(options_url: Url, submit_url: Url, user_id: i64) -> Self {
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
impl CeremonyKind for Registration {
    type Options = CreationOptions;
    type Output = AttestationResult;
    type Outcome = Vec<CredentialRecord>;

    const NAME: &'static str = "registration";
    const CHALLENGE_FAILURE: &'static str = "Error calling registerRequest";

    fn challenge_request(&self) -> HttpRequest {
        HttpRequest::get(self.options_url.clone())
            .header(headers::USER_TOKEN, self.user_id.to_string())
    }

    fn decode_options(&self, body: &[u8]) -> Result<CreationOptions, DecodeError> {
        decode_creation_options(body)
    }

    async fn invoke_authenticator(
        &self,
        authenticator: &dyn PlatformAuthenticator,
        options: &CreationOptions,
    ) -> Result<AttestationResult, AuthenticatorError> {
        authenticator.make_credential(options).await
    }

    fn encode_submission(&self, output: &AttestationResult) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&encode_attestation(output))
    }

    fn submission_request(&self, body: Vec<u8>) -> HttpRequest {
        HttpRequest::post_json(self.submit_url.clone(), body)
            .header(headers::USER_TOKEN, self.user_id.to_string())
    }

    fn interpret(&self, response: &HttpResponse) -> Result<Vec<CredentialRecord>, CeremonyError> {
        if !response.is_success() {
            return Err(ApiFailure::from_response(
                "Error calling registerResponse",
                response.status,
                &response.body,
            )
            .into());
        }
        if response.body.is_empty() {
            return Err(ApiFailure::new("Empty response from registerResponse").into());
        }

        let credentials = decode_credential_list(&response.body)?;
        if credentials.is_empty() {
            return Err(CeremonyError::Unconfirmed(
                "Server stored no credentials".to_string(),
            ));
        }
        Ok(credentials)
    }
}
