//! Response encoders
//!
//! Shape the authenticator's raw output into the JSON the relying party's
//! `register` and `login` endpoints expect. Field order is fixed by the struct
//! declarations below and every byte field is unpadded base64url.

use serde::Serialize;

use crate::webauthn::base64url;
use crate::webauthn::types::{AssertionResult, AttestationResult, PublicKeyCredentialType};

/// Body posted to the registration endpoint
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RegistrationSubmission {
    pub id: String,
    #[serde(rename = "type")]
    pub credential_type: PublicKeyCredentialType,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    pub response: AttestationResponseJson,
}

/// Attestation half of a [`RegistrationSubmission`]
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AttestationResponseJson {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "attestationObject")]
    pub attestation_object: String,
}

/// Body posted to the login endpoint
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AuthenticationSubmission {
    pub id: String,
    #[serde(rename = "type")]
    pub credential_type: PublicKeyCredentialType,
    #[serde(rename = "rawId")]
    pub raw_id: String,
    pub response: AssertionResponseJson,
}

/// Assertion half of an [`AuthenticationSubmission`]
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct AssertionResponseJson {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "authenticatorData")]
    pub authenticator_data: String,
    pub signature: String,
    #[serde(rename = "userHandle")]
    pub user_handle: String, // Empty when the authenticator returned none
}

/// Encode a registration result for submission
#[must_use]
pub fn encode_attestation(result: &AttestationResult) -> RegistrationSubmission {
    let id = base64url::encode(&result.credential_id);
    RegistrationSubmission {
        raw_id: id.clone(),
        id,
        credential_type: PublicKeyCredentialType::PublicKey,
        response: AttestationResponseJson {
            client_data_json: base64url::encode(&result.client_data_json),
            attestation_object: base64url::encode(&result.attestation_object),
        },
    }
}

/// Encode a login result for submission
#[must_use]
pub fn encode_assertion(result: &AssertionResult) -> AuthenticationSubmission {
    let id = base64url::encode(&result.credential_id);
    AuthenticationSubmission {
        raw_id: id.clone(),
        id,
        credential_type: PublicKeyCredentialType::PublicKey,
        response: AssertionResponseJson {
            client_data_json: base64url::encode(&result.client_data_json),
            authenticator_data: base64url::encode(&result.authenticator_data),
            signature: base64url::encode(&result.signature),
            user_handle: result
                .user_handle
                .as_deref()
                .map(base64url::encode)
                .unwrap_or_default(),
        },
    }
}
