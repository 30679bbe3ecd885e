//! Recorded relying-party payloads and authenticator outputs

use url::Url;

use super::constants::TEST_BASE_URL;
use crate::client::Endpoints;
use crate::settings::ClientSettings;
use crate::webauthn::{AssertionResult, AttestationResult};

/// Credential id of [`attestation`], base64url encoded
pub const CREDENTIAL_ID: &str = "AQID";

pub const CREATION_OPTIONS_JSON: &str = r#"{
    "rp": {"id": "rp.example", "name": "Example RP"},
    "user": {"id": "dXNlci0x", "name": "alice", "displayName": "Alice"},
    "challenge": {"value": "Y2hhbGxlbmdl"},
    "pubKeyCredParams": [{"type": "public-key", "alg": -7}, {"type": "public-key", "alg": -257}],
    "timeout": 60,
    "excludeCredentials": [],
    "authenticatorSelection": {
        "authenticatorAttachment": "platform",
        "userVerification": "required"
    },
    "attestation": "none"
}"#;

pub const REQUEST_OPTIONS_JSON: &str = r#"{
    "challenge": {"value": "bm9uY2U"},
    "rpId": "rp.example",
    "allowCredentials": [{"type": "public-key", "id": "AQID", "transports": ["internal"]}],
    "userVerification": "required"
}"#;

pub const CREDENTIAL_LIST_JSON: &str =
    r#"{"username":"alice","credentials":[{"credId":"AQID","publicKey":"pQECAyYg"}]}"#;

pub const LOGIN_SUCCESS_JSON: &str = r#"{"userId":7,"username":"alice"}"#;

/// Absolute URL on the test origin
///
/// # Panics
///
/// Panics if `path_and_query` does not form a valid URL.
#[must_use]
pub fn url(path_and_query: &str) -> Url {
    Url::parse(&format!("{TEST_BASE_URL}{path_and_query}")).unwrap()
}

/// Default endpoint layout rooted at the test origin
///
/// # Panics
///
/// Panics if the default paths stop resolving.
#[must_use]
pub fn endpoints() -> Endpoints {
    let mut settings = ClientSettings::default();
    settings.server.base_url = TEST_BASE_URL.to_string();
    Endpoints::from_settings(&settings).unwrap()
}

#[must_use]
pub fn attestation() -> AttestationResult {
    AttestationResult {
        credential_id: vec![1, 2, 3],
        client_data_json: b"{}".to_vec(),
        attestation_object: vec![0xa0],
    }
}

#[must_use]
pub fn assertion() -> AssertionResult {
    AssertionResult {
        credential_id: vec![1, 2, 3],
        client_data_json: b"{}".to_vec(),
        authenticator_data: vec![4, 5, 6],
        signature: vec![7, 8],
        user_handle: Some(b"u1".to_vec()),
    }
}
