//! `WebAuthn` wire format
//!
//! This module owns everything that crosses the network boundary as JSON:
//! the base64url codec, the option decoders for both ceremonies, and the
//! encoders for authenticator output. It performs no I/O.

pub mod base64url;
mod errors;
pub(crate) mod fields;
mod options;
mod responses;
mod types;

// Re-exports for public use
pub use errors::DecodeError;
pub use options::{
    decode_creation_options, decode_creation_options_value, decode_request_options,
    decode_request_options_value,
};
pub use responses::{
    encode_assertion, encode_attestation, AssertionResponseJson, AttestationResponseJson,
    AuthenticationSubmission, RegistrationSubmission,
};
pub use types::*;
