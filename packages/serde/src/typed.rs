//! Typed access to `Value` trees.

use classbridge_core::Value;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Extension trait moving typed data in and out of a `Value`.
///
/// Implemented for `Value`. Both directions pass through a
/// `serde_json::Value` and never through text. Absent keys and explicit
/// `null` both read as `None`; a present key of the wrong shape is an error.
pub trait TypedValue: Sized {
    /// Deserialize the value under `key`.
    fn field_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error>;

    /// Serialize any serde type into a `Value`.
    fn from_typed<T: Serialize + ?Sized>(data: &T) -> Result<Self, Error>;

    /// Render as a `serde_json::Value`.
    fn to_json(&self) -> Result<serde_json::Value, Error>;
}

impl TypedValue for Value {
    fn field_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        let field_error = |e: String| Error::decode(format!("field '{}': {}", key, e));
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let json = value.to_json().map_err(|e| field_error(e.to_string()))?;
                T::deserialize(json)
                    .map(Some)
                    .map_err(|e| field_error(e.to_string()))
            }
        }
    }

    fn from_typed<T: Serialize + ?Sized>(data: &T) -> Result<Self, Error> {
        let json = serde_json::to_value(data).map_err(|e| Error::encode(e.to_string()))?;
        Value::deserialize(json).map_err(|e| Error::encode(e.to_string()))
    }

    fn to_json(&self) -> Result<serde_json::Value, Error> {
        serde_json::to_value(self).map_err(|e| Error::encode(e.to_string()))
    }
}
