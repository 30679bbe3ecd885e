//! Decoding errors for `WebAuthn` wire payloads
//!
//! Every failure to turn server JSON into typed ceremony data ends up here.
//! Field paths are dotted (`user.id`, `pubKeyCredParams[1].alg`) so a caller can
//! tell exactly which part of the payload was rejected.

use std::fmt;

/// Errors raised while decoding relying-party JSON or base64url text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A mandatory field was absent
    MissingField(String),

    /// A mandatory field was present but empty
    EmptyField(String),

    /// A recognized field carried the wrong JSON type
    WrongType {
        field: String,
        expected: &'static str,
    },

    /// A field or input was not valid base64url
    InvalidBase64 { field: String, reason: String },

    /// A field had the right type but an unusable value
    InvalidValue { field: String, reason: String },

    /// The body was not JSON at all
    Json(String),
}

impl DecodeError {
    pub(crate) fn missing(field: &str) -> Self {
        DecodeError::MissingField(field.to_string())
    }

    pub(crate) fn wrong_type(field: &str, expected: &'static str) -> Self {
        DecodeError::WrongType {
            field: field.to_string(),
            expected,
        }
    }

    pub(crate) fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        DecodeError::InvalidValue {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach a field path to a codec error raised without one
    #[must_use]
    pub(crate) fn at(self, field: &str) -> Self {
        match self {
            DecodeError::InvalidBase64 { reason, .. } => DecodeError::InvalidBase64 {
                field: field.to_string(),
                reason,
            },
            other => other,
        }
    }

    /// The field the error refers to, if any
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            DecodeError::MissingField(field) | DecodeError::EmptyField(field) => Some(field),
            DecodeError::WrongType { field, .. }
            | DecodeError::InvalidBase64 { field, .. }
            | DecodeError::InvalidValue { field, .. } => {
                if field.is_empty() {
                    None
                } else {
                    Some(field)
                }
            }
            DecodeError::Json(_) => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingField(field) => write!(f, "missing {field} field"),
            DecodeError::EmptyField(field) => write!(f, "empty {field} field"),
            DecodeError::WrongType { field, expected } => {
                write!(f, "field {field} must be {expected}")
            }
            DecodeError::InvalidBase64 { field, reason } if field.is_empty() => {
                write!(f, "invalid base64url: {reason}")
            }
            DecodeError::InvalidBase64 { field, reason } => {
                write!(f, "field {field} is not valid base64url: {reason}")
            }
            DecodeError::InvalidValue { field, reason } => {
                write!(f, "field {field} has an invalid value: {reason}")
            }
            DecodeError::Json(msg) => write!(f, "malformed JSON body: {msg}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err.to_string())
    }
}
