//! Result decoders
//!
//! Parse what the relying party sends back after a submission. The credential
//! list and login decoders follow the same field-driven rules as the option
//! decoders. The error decoder is different: it runs while a failure is
//! already being reported, so it degrades to an empty string instead of
//! failing.

use serde_json::Value;

use crate::api::types::{CredentialRecord, LoginOutcome, INVALID_LOGIN_RESPONSE};
use crate::webauthn::fields::{self, decode_object, Field};
use crate::webauthn::DecodeError;

type FieldResult = Result<(), DecodeError>;

#[derive(Default)]
struct CredentialListReply {
    credentials: Vec<CredentialRecord>,
}

#[derive(Default)]
struct CredentialEntry {
    cred_id: Option<String>,
}

#[derive(Default)]
struct LoginReply {
    user_id: Option<i64>,
    username: Option<String>,
}

const CREDENTIAL_LIST_FIELDS: &[Field<CredentialListReply>] =
    &[Field::required("credentials", set_credentials)];

const CREDENTIAL_ENTRY_FIELDS: &[Field<CredentialEntry>] =
    &[Field::optional("credId", set_cred_id)];

const LOGIN_FIELDS: &[Field<LoginReply>] = &[
    Field::optional("userId", set_user_id),
    Field::optional("username", set_username),
];

fn set_credentials(reply: &mut CredentialListReply, value: &Value, path: &str) -> FieldResult {
    // Entries without a credId are dropped rather than failing the whole list
    reply.credentials = fields::list(value, path, |entry, entry_path| {
        decode_object(entry, entry_path, CREDENTIAL_ENTRY_FIELDS)
    })?
    .into_iter()
    .filter_map(|entry| entry.cred_id.map(CredentialRecord::new))
    .collect();
    Ok(())
}

fn set_cred_id(entry: &mut CredentialEntry, value: &Value, path: &str) -> FieldResult {
    entry.cred_id = Some(fields::string(value, path)?.to_string());
    Ok(())
}

fn set_user_id(reply: &mut LoginReply, value: &Value, path: &str) -> FieldResult {
    reply.user_id = Some(fields::integer(value, path)?);
    Ok(())
}

fn set_username(reply: &mut LoginReply, value: &Value, path: &str) -> FieldResult {
    reply.username = Some(fields::string(value, path)?.to_string());
    Ok(())
}

/// Decode the credential list returned after a registration
///
/// # Errors
///
/// Returns `DecodeError` if the body is not a JSON object, if it has no
/// `credentials` field, or if that field is not an array of objects.
pub fn decode_credential_list(body: &[u8]) -> Result<Vec<CredentialRecord>, DecodeError> {
    let value: Value = serde_json::from_slice(body)?;
    let reply = decode_object(&value, "", CREDENTIAL_LIST_FIELDS)?;
    Ok(reply.credentials)
}

/// Decode a login or user-lookup reply
///
/// A reply without `userId` is not an error: it is a [`LoginOutcome::Failure`]
/// with a fixed reason.
///
/// # Errors
///
/// Returns `DecodeError` if the body is not a JSON object or if `userId` or
/// `username` has the wrong type.
pub fn decode_login_result(body: &[u8]) -> Result<LoginOutcome, DecodeError> {
    let value: Value = serde_json::from_slice(body)?;
    let reply = decode_object(&value, "", LOGIN_FIELDS)?;
    Ok(match reply.user_id {
        Some(user_id) => LoginOutcome::Success {
            user_id,
            username: reply.username,
        },
        None => LoginOutcome::failure(INVALID_LOGIN_RESPONSE),
    })
}

/// Extract the server's `"error"` string from a failure body
///
/// Returns `"Unknown"` when `error` is present but not a string, and an empty
/// string when the body cannot be read at all.
#[must_use]
pub fn decode_server_error(body: &[u8]) -> String {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            log::warn!(
                "Cannot parse the error body ({e}): {}",
                String::from_utf8_lossy(body)
            );
            return String::new();
        }
    };

    let Some(object) = value.as_object() else {
        log::warn!("Error body is not a JSON object: {value}");
        return String::new();
    };

    match object.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(_) => "Unknown".to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_list_skips_entries_without_id() {
        let records =
            decode_credential_list(br#"{"credentials":[{"credId":"abc"},{"other":"x"}]}"#)
                .unwrap();
        assert_eq!(records, vec![CredentialRecord::new("abc")]);
    }

    #[test]
    fn test_credential_list_keeps_order_and_ignores_extras() {
        let records = decode_credential_list(
            br#"{"user":"bob","credentials":[{"credId":"b","publicKey":"x"},{"credId":"a"}]}"#,
        )
        .unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_credential_list_requires_field() {
        let err = decode_credential_list(br#"{"creds":[]}"#).unwrap_err();
        assert_eq!(err.to_string(), "missing credentials field");
    }

    #[test]
    fn test_credential_list_wrong_shape() {
        assert!(decode_credential_list(br#"{"credentials":"abc"}"#).is_err());
        assert!(decode_credential_list(br#"{"credentials":["abc"]}"#).is_err());
        assert!(decode_credential_list(b"").is_err());
    }

    #[test]
    fn test_login_result_success() {
        let outcome = decode_login_result(br#"{"userId":42,"username":"bob"}"#).unwrap();
        assert_eq!(
            outcome,
            LoginOutcome::Success {
                user_id: 42,
                username: Some("bob".to_string())
            }
        );
    }

    #[test]
    fn test_login_result_failure_has_reason() {
        let outcome = decode_login_result(b"{}").unwrap();
        match outcome {
            LoginOutcome::Failure { reason } => assert!(!reason.is_empty()),
            LoginOutcome::Success { .. } => panic!("empty reply must not succeed"),
        }
    }

    #[test]
    fn test_login_result_wrong_type() {
        assert!(decode_login_result(br#"{"userId":"42"}"#).is_err());
    }

    #[test]
    fn test_server_error_extraction() {
        assert_eq!(decode_server_error(br#"{"error":"bad token"}"#), "bad token");
        assert_eq!(decode_server_error(br#"{"code":1,"error":{"x":1}}"#), "Unknown");
        assert_eq!(decode_server_error(br#"{"message":"x"}"#), "");
    }

    #[test]
    fn test_server_error_never_fails() {
        assert_eq!(decode_server_error(b"<html>502 Bad Gateway</html>"), "");
        assert_eq!(decode_server_error(b"[1,2]"), "");
        assert_eq!(decode_server_error(&[0xff, 0xfe]), "");
    }
}
