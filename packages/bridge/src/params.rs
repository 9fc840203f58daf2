//! Parameter extraction. Every failure here is request-level.

use classbridge_core::{Error, Value};
use classbridge_serde::TypedValue;

fn invalid(name: &str, message: impl Into<String>) -> Error {
    Error::InvalidParameter {
        name: name.to_string(),
        message: message.into(),
    }
}

fn missing(name: &str) -> Error {
    Error::MissingRequiredParameter {
        name: name.to_string(),
    }
}

/// A non-empty string. Absent, null and `""` all count as missing.
pub(crate) fn required_str<'p>(params: &'p Value, name: &str) -> Result<&'p str, Error> {
    match optional_str(params, name)? {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(missing(name)),
    }
}

/// A string that may be absent or null. Empty strings are passed through.
pub(crate) fn optional_str<'p>(params: &'p Value, name: &str) -> Result<Option<&'p str>, Error> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(invalid(
            name,
            format!("expected string, found {}", other.type_name()),
        )),
    }
}

pub(crate) fn optional_bool(params: &Value, name: &str, default: bool) -> Result<bool, Error> {
    params
        .field_as::<bool>(name)
        .map(|b| b.unwrap_or(default))
        .map_err(|e| invalid(name, e.to_string()))
}

/// A present key. `null` is a value here, not an absence.
pub(crate) fn required_key<'p>(params: &'p Value, name: &str) -> Result<&'p Value, Error> {
    params.get(name).ok_or_else(|| missing(name))
}

/// An array, possibly empty. An empty array replaces a property with nothing.
pub(crate) fn required_array<'p>(params: &'p Value, name: &str) -> Result<&'p [Value], Error> {
    match params.get(name) {
        None | Some(Value::Null) => Err(missing(name)),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(invalid(
            name,
            format!("expected array, found {}", other.type_name()),
        )),
    }
}
