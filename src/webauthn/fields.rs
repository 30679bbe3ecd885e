//! Field-dispatch tables for order-agnostic JSON decoding
//!
//! Each wire structure is described by a static table mapping a field name to a
//! typed setter and a required flag. [`decode_object`] walks whatever fields the
//! server sent, dispatches the ones it knows, skips the rest, and checks the table
//! for completeness once the walk is over.
//!
//! A recognized field with the wrong shape is an error, never a skip. `null` is
//! treated as "not sent": fine for optional fields, a missing-field error for
//! required ones.

use std::time::Duration;

use serde_json::Value;

use crate::webauthn::base64url;
use crate::webauthn::errors::DecodeError;

/// Writes one decoded field into the structure under construction
pub(crate) type Setter<T> = fn(&mut T, &Value, &str) -> Result<(), DecodeError>;

/// One row of a dispatch table
pub(crate) struct Field<T> {
    pub name: &'static str,
    pub required: bool,
    pub set: Setter<T>,
}

impl<T> Field<T> {
    pub(crate) const fn required(name: &'static str, set: Setter<T>) -> Self {
        Self {
            name,
            required: true,
            set,
        }
    }

    pub(crate) const fn optional(name: &'static str, set: Setter<T>) -> Self {
        Self {
            name,
            required: false,
            set,
        }
    }
}

/// Build the dotted path of a child field
pub(crate) fn child_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn describe(path: &str) -> &str {
    if path.is_empty() {
        "body"
    } else {
        path
    }
}

/// Decode a JSON object through its dispatch table
///
/// # Errors
///
/// Returns an error if `value` is not an object, if a known field fails its
/// setter, or if a required field never showed up.
pub(crate) fn decode_object<T: Default>(
    value: &Value,
    path: &str,
    table: &[Field<T>],
) -> Result<T, DecodeError> {
    let object = value
        .as_object()
        .ok_or_else(|| DecodeError::wrong_type(describe(path), "an object"))?;

    let mut target = T::default();
    let mut seen = vec![false; table.len()];

    for (name, field_value) in object {
        let Some(index) = table.iter().position(|field| field.name == name) else {
            continue;
        };
        if field_value.is_null() {
            continue;
        }
        (table[index].set)(&mut target, field_value, &child_path(path, name))?;
        seen[index] = true;
    }

    if let Some((field, _)) = table
        .iter()
        .zip(&seen)
        .find(|(field, seen)| field.required && !**seen)
    {
        return Err(DecodeError::missing(&child_path(path, field.name)));
    }

    Ok(target)
}

/// Decode every element of a JSON array with `item`, preserving order
pub(crate) fn list<U>(
    value: &Value,
    path: &str,
    item: fn(&Value, &str) -> Result<U, DecodeError>,
) -> Result<Vec<U>, DecodeError> {
    let elements = value
        .as_array()
        .ok_or_else(|| DecodeError::wrong_type(path, "an array"))?;

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| item(element, &format!("{path}[{index}]")))
        .collect()
}

pub(crate) fn string<'a>(value: &'a Value, path: &str) -> Result<&'a str, DecodeError> {
    value
        .as_str()
        .ok_or_else(|| DecodeError::wrong_type(path, "a string"))
}

/// A string that must carry at least one character
pub(crate) fn non_empty_string(value: &Value, path: &str) -> Result<String, DecodeError> {
    let text = string(value, path)?;
    if text.is_empty() {
        return Err(DecodeError::EmptyField(path.to_string()));
    }
    Ok(text.to_string())
}

pub(crate) fn string_list(value: &Value, path: &str) -> Result<Vec<String>, DecodeError> {
    list(value, path, |element, element_path| {
        string(element, element_path).map(ToString::to_string)
    })
}

/// A base64url string decoded to bytes
pub(crate) fn bytes(value: &Value, path: &str) -> Result<Vec<u8>, DecodeError> {
    base64url::decode(string(value, path)?).map_err(|e| e.at(path))
}

/// Base64url bytes that must decode to at least one byte
pub(crate) fn non_empty_bytes(value: &Value, path: &str) -> Result<Vec<u8>, DecodeError> {
    let decoded = bytes(value, path)?;
    if decoded.is_empty() {
        return Err(DecodeError::EmptyField(path.to_string()));
    }
    Ok(decoded)
}

pub(crate) fn boolean(value: &Value, path: &str) -> Result<bool, DecodeError> {
    value
        .as_bool()
        .ok_or_else(|| DecodeError::wrong_type(path, "a boolean"))
}

pub(crate) fn integer(value: &Value, path: &str) -> Result<i64, DecodeError> {
    value
        .as_i64()
        .ok_or_else(|| DecodeError::wrong_type(path, "an integer"))
}

pub(crate) fn integer_i32(value: &Value, path: &str) -> Result<i32, DecodeError> {
    let wide = integer(value, path)?;
    i32::try_from(wide)
        .map_err(|_| DecodeError::invalid_value(path, format!("{wide} is out of range")))
}

/// A non-negative number of seconds, fractions allowed
pub(crate) fn seconds(value: &Value, path: &str) -> Result<Duration, DecodeError> {
    let secs = value
        .as_f64()
        .ok_or_else(|| DecodeError::wrong_type(path, "a number"))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| DecodeError::invalid_value(path, format!("{secs} is not a usable timeout")))
}
