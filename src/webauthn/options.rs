//! Option decoders
//!
//! Turn the relying party's `attestation/options` and `assertion/options`
//! payloads into [`CreationOptions`] and [`RequestOptions`]. Every structure
//! has its own dispatch table; see [`crate::webauthn::fields`] for the walking
//! rules.

use serde_json::Value;

use crate::webauthn::errors::DecodeError;
use crate::webauthn::fields::{self, decode_object, Field};
use crate::webauthn::types::{
    Attachment, AuthenticatorSelectionCriteria, Challenge, CreationOptions, CredentialDescriptor,
    CredentialParameter, PublicKeyCredentialType, RelyingPartyEntity, RequestOptions, UserEntity,
};

type FieldResult = Result<(), DecodeError>;

// Registration options

const CREATION_FIELDS: &[Field<CreationOptions>] = &[
    Field::required("rp", set_creation_rp),
    Field::required("user", set_creation_user),
    Field::required("challenge", set_creation_challenge),
    Field::optional("pubKeyCredParams", set_creation_parameters),
    Field::optional("timeout", set_creation_timeout),
    Field::optional("excludeCredentials", set_creation_exclude),
    Field::optional("authenticatorSelection", set_creation_selection),
    Field::optional("attestation", set_creation_attestation),
];

fn set_creation_rp(options: &mut CreationOptions, value: &Value, path: &str) -> FieldResult {
    options.rp = decode_object(value, path, RP_FIELDS)?;
    Ok(())
}

fn set_creation_user(options: &mut CreationOptions, value: &Value, path: &str) -> FieldResult {
    options.user = decode_object(value, path, USER_FIELDS)?;
    Ok(())
}

fn set_creation_challenge(options: &mut CreationOptions, value: &Value, path: &str) -> FieldResult {
    options.challenge = decode_challenge(value, path)?;
    Ok(())
}

fn set_creation_parameters(
    options: &mut CreationOptions,
    value: &Value,
    path: &str,
) -> FieldResult {
    options.parameters = fields::list(value, path, decode_parameter)?;
    Ok(())
}

fn set_creation_timeout(options: &mut CreationOptions, value: &Value, path: &str) -> FieldResult {
    options.timeout = Some(fields::seconds(value, path)?);
    Ok(())
}

fn set_creation_exclude(options: &mut CreationOptions, value: &Value, path: &str) -> FieldResult {
    options.exclude_credentials = fields::list(value, path, decode_descriptor)?;
    Ok(())
}

fn set_creation_selection(
    options: &mut CreationOptions,
    value: &Value,
    path: &str,
) -> FieldResult {
    options.authenticator_selection = Some(decode_object(value, path, SELECTION_FIELDS)?);
    Ok(())
}

fn set_creation_attestation(
    options: &mut CreationOptions,
    value: &Value,
    path: &str,
) -> FieldResult {
    options.attestation = Some(fields::string(value, path)?.to_string());
    Ok(())
}

// Authentication options

const REQUEST_FIELDS: &[Field<RequestOptions>] = &[
    Field::required("challenge", set_request_challenge),
    Field::optional("rpId", set_request_rp_id),
    Field::optional("allowCredentials", set_request_allow),
    Field::optional("timeout", set_request_timeout),
    Field::optional("userVerification", set_request_user_verification),
];

fn set_request_challenge(options: &mut RequestOptions, value: &Value, path: &str) -> FieldResult {
    options.challenge = decode_challenge(value, path)?;
    Ok(())
}

fn set_request_rp_id(options: &mut RequestOptions, value: &Value, path: &str) -> FieldResult {
    options.rp_id = Some(fields::non_empty_string(value, path)?);
    Ok(())
}

fn set_request_allow(options: &mut RequestOptions, value: &Value, path: &str) -> FieldResult {
    options.allow_credentials = fields::list(value, path, decode_descriptor)?;
    Ok(())
}

fn set_request_timeout(options: &mut RequestOptions, value: &Value, path: &str) -> FieldResult {
    options.timeout = Some(fields::seconds(value, path)?);
    Ok(())
}

fn set_request_user_verification(
    options: &mut RequestOptions,
    value: &Value,
    path: &str,
) -> FieldResult {
    options.user_verification = Some(fields::string(value, path)?.to_string());
    Ok(())
}

// Nested structures

const RP_FIELDS: &[Field<RelyingPartyEntity>] = &[
    Field::required("id", set_rp_id),
    Field::required("name", set_rp_name),
];

fn set_rp_id(rp: &mut RelyingPartyEntity, value: &Value, path: &str) -> FieldResult {
    rp.id = fields::non_empty_string(value, path)?;
    Ok(())
}

fn set_rp_name(rp: &mut RelyingPartyEntity, value: &Value, path: &str) -> FieldResult {
    rp.name = fields::non_empty_string(value, path)?;
    Ok(())
}

const USER_FIELDS: &[Field<UserEntity>] = &[
    Field::required("id", set_user_id),
    Field::required("name", set_user_name),
    Field::optional("displayName", set_user_display_name),
];

fn set_user_id(user: &mut UserEntity, value: &Value, path: &str) -> FieldResult {
    user.id = fields::non_empty_bytes(value, path)?;
    Ok(())
}

fn set_user_name(user: &mut UserEntity, value: &Value, path: &str) -> FieldResult {
    user.name = fields::non_empty_string(value, path)?;
    Ok(())
}

fn set_user_display_name(user: &mut UserEntity, value: &Value, path: &str) -> FieldResult {
    user.display_name = fields::string(value, path)?.to_string();
    Ok(())
}

/// The challenge arrives wrapped: `{"value": "<base64url>"}`
const CHALLENGE_FIELDS: &[Field<Challenge>] = &[Field::required("value", set_challenge_value)];

fn set_challenge_value(challenge: &mut Challenge, value: &Value, path: &str) -> FieldResult {
    *challenge = Challenge::new(fields::non_empty_bytes(value, path)?);
    Ok(())
}

const PARAMETER_FIELDS: &[Field<CredentialParameter>] = &[
    Field::required("type", set_parameter_type),
    Field::required("alg", set_parameter_alg),
];

fn set_parameter_type(
    parameter: &mut CredentialParameter,
    value: &Value,
    path: &str,
) -> FieldResult {
    parameter.credential_type = fields::non_empty_string(value, path)?;
    Ok(())
}

fn set_parameter_alg(
    parameter: &mut CredentialParameter,
    value: &Value,
    path: &str,
) -> FieldResult {
    parameter.alg = fields::integer_i32(value, path)?;
    Ok(())
}

const DESCRIPTOR_FIELDS: &[Field<CredentialDescriptor>] = &[
    Field::required("id", set_descriptor_id),
    Field::optional("type", set_descriptor_type),
    Field::optional("transports", set_descriptor_transports),
];

fn set_descriptor_id(
    descriptor: &mut CredentialDescriptor,
    value: &Value,
    path: &str,
) -> FieldResult {
    descriptor.id = fields::non_empty_bytes(value, path)?;
    Ok(())
}

fn set_descriptor_type(
    descriptor: &mut CredentialDescriptor,
    value: &Value,
    path: &str,
) -> FieldResult {
    descriptor.credential_type = credential_type(fields::string(value, path)?, path)?;
    Ok(())
}

fn set_descriptor_transports(
    descriptor: &mut CredentialDescriptor,
    value: &Value,
    path: &str,
) -> FieldResult {
    descriptor.transports = fields::string_list(value, path)?;
    Ok(())
}

const SELECTION_FIELDS: &[Field<AuthenticatorSelectionCriteria>] = &[
    Field::optional("authenticatorAttachment", set_selection_attachment),
    Field::optional("requireResidentKey", set_selection_resident_key),
    Field::optional("userVerification", set_selection_user_verification),
];

fn set_selection_attachment(
    selection: &mut AuthenticatorSelectionCriteria,
    value: &Value,
    path: &str,
) -> FieldResult {
    let raw = fields::string(value, path)?;
    let attachment = Attachment::from_wire(raw)
        .ok_or_else(|| DecodeError::invalid_value(path, format!("unknown attachment {raw:?}")))?;
    selection.attachment = Some(attachment);
    Ok(())
}

fn set_selection_resident_key(
    selection: &mut AuthenticatorSelectionCriteria,
    value: &Value,
    path: &str,
) -> FieldResult {
    selection.require_resident_key = Some(fields::boolean(value, path)?);
    Ok(())
}

fn set_selection_user_verification(
    selection: &mut AuthenticatorSelectionCriteria,
    value: &Value,
    path: &str,
) -> FieldResult {
    selection.user_verification = Some(fields::string(value, path)?.to_string());
    Ok(())
}

fn decode_challenge(value: &Value, path: &str) -> Result<Challenge, DecodeError> {
    decode_object(value, path, CHALLENGE_FIELDS)
}

fn decode_parameter(value: &Value, path: &str) -> Result<CredentialParameter, DecodeError> {
    decode_object(value, path, PARAMETER_FIELDS)
}

fn decode_descriptor(value: &Value, path: &str) -> Result<CredentialDescriptor, DecodeError> {
    decode_object(value, path, DESCRIPTOR_FIELDS)
}

fn credential_type(raw: &str, path: &str) -> Result<PublicKeyCredentialType, DecodeError> {
    if raw == PublicKeyCredentialType::PublicKey.as_str() {
        Ok(PublicKeyCredentialType::PublicKey)
    } else {
        Err(DecodeError::invalid_value(
            path,
            format!("unsupported credential type {raw:?}"),
        ))
    }
}

/// Decode registration options from a parsed JSON value
///
/// # Errors
///
/// Returns `DecodeError` when `rp`, `user` or `challenge` (or any of their
/// mandatory members) is missing or empty, or when a recognized field is
/// malformed. Unknown fields are ignored.
pub fn decode_creation_options_value(value: &Value) -> Result<CreationOptions, DecodeError> {
    decode_object(value, "", CREATION_FIELDS)
}

/// Decode registration options from a raw response body
///
/// # Errors
///
/// Returns `DecodeError::Json` when the body is not JSON, otherwise as
/// [`decode_creation_options_value`].
pub fn decode_creation_options(body: &[u8]) -> Result<CreationOptions, DecodeError> {
    let value: Value = serde_json::from_slice(body)?;
    decode_creation_options_value(&value)
}

/// Decode authentication options from a parsed JSON value
///
/// # Errors
///
/// Returns `DecodeError` when `challenge` is missing or empty, or when a
/// recognized field is malformed. Unknown fields are ignored.
pub fn decode_request_options_value(value: &Value) -> Result<RequestOptions, DecodeError> {
    decode_object(value, "", REQUEST_FIELDS)
}

/// Decode authentication options from a raw response body
///
/// # Errors
///
/// Returns `DecodeError::Json` when the body is not JSON, otherwise as
/// [`decode_request_options_value`].
pub fn decode_request_options(body: &[u8]) -> Result<RequestOptions, DecodeError> {
    let value: Value = serde_json::from_slice(body)?;
    decode_request_options_value(&value)
}
