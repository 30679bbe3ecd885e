//! `WebAuthn` core types
//!
//! Strongly-typed ceremony parameters decoded from relying-party JSON, and the
//! raw authenticator outputs that get encoded back onto the wire.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Credential type tag; `WebAuthn` defines exactly one
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PublicKeyCredentialType {
    #[default]
    #[serde(rename = "public-key")]
    PublicKey,
}

impl PublicKeyCredentialType {
    /// Wire representation of the tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PublicKeyCredentialType::PublicKey => "public-key",
        }
    }
}

impl fmt::Display for PublicKeyCredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-issued anti-replay nonce
///
/// The bytes are handed to the authenticator untouched. `Debug` only reveals the
/// length so the value never leaks into logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Challenge(Vec<u8>);

impl Challenge {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Challenge(<{} bytes redacted>)", self.0.len())
    }
}

/// Relying party information
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelyingPartyEntity {
    pub id: String,   // Domain name (e.g., "example.com")
    pub name: String, // Display name
}

/// Account being registered
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserEntity {
    pub id: Vec<u8>,          // Opaque user handle
    pub name: String,         // Account name
    pub display_name: String, // Empty when the server sends none
}

/// Accepted public key algorithm
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialParameter {
    pub credential_type: String, // Normally "public-key"
    pub alg: i32,                // COSE algorithm identifier (-7 for ES256, -257 for RS256)
}

/// Reference to an existing credential
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CredentialDescriptor {
    pub credential_type: PublicKeyCredentialType,
    pub id: Vec<u8>,
    pub transports: Vec<String>, // "usb", "nfc", "ble", "internal", ...
}

/// Authenticator attachment modality
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attachment {
    Platform,
    CrossPlatform,
}

impl Attachment {
    /// Parse the wire value, `None` when unrecognized
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "platform" => Some(Attachment::Platform),
            "cross-platform" => Some(Attachment::CrossPlatform),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Attachment::Platform => "platform",
            Attachment::CrossPlatform => "cross-platform",
        }
    }
}

/// Authenticator selection criteria
///
/// Absent fields leave the authenticator's own defaults in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthenticatorSelectionCriteria {
    pub attachment: Option<Attachment>,
    pub require_resident_key: Option<bool>,
    pub user_verification: Option<String>, // "required", "preferred", "discouraged"
}

/// Registration ceremony parameters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreationOptions {
    pub rp: RelyingPartyEntity,
    pub user: UserEntity,
    pub challenge: Challenge,
    pub parameters: Vec<CredentialParameter>, // Server preference order
    pub timeout: Option<Duration>,
    pub exclude_credentials: Vec<CredentialDescriptor>,
    pub authenticator_selection: Option<AuthenticatorSelectionCriteria>,
    pub attestation: Option<String>, // "none", "indirect", "direct"
}

/// Authentication ceremony parameters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    pub challenge: Challenge,
    pub rp_id: Option<String>,
    pub allow_credentials: Vec<CredentialDescriptor>,
    pub timeout: Option<Duration>,
    pub user_verification: Option<String>,
}

/// Authenticator output for a registration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttestationResult {
    pub credential_id: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub attestation_object: Vec<u8>,
}

/// Authenticator output for a login
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssertionResult {
    pub credential_id: Vec<u8>,
    pub client_data_json: Vec<u8>,
    pub authenticator_data: Vec<u8>,
    pub signature: Vec<u8>,
    pub user_handle: Option<Vec<u8>>,
}
