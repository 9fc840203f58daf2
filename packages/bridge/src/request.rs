//! Incoming requests.

use classbridge_core::Value;
use classbridge_serde::JsonCodec;

use crate::error::BridgeError;

/// `{ operation, parameters }`. Parameters are always a map.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub operation: String,
    pub parameters: Value,
}

impl Request {
    pub fn new(operation: impl Into<String>, parameters: Value) -> Self {
        Self {
            operation: operation.into(),
            parameters: if parameters.is_null() {
                Value::map()
            } else {
                parameters
            },
        }
    }

    /// Build a request from a decoded body.
    ///
    /// `parameters` may be absent or null; anything else must be an object.
    pub fn from_value(body: Value) -> Result<Self, BridgeError> {
        let Value::Map(mut body) = body else {
            return Err(BridgeError::MalformedRequest(format!(
                "expected an object, found {}",
                body.type_name()
            )));
        };
        let operation = match body.remove("operation") {
            Some(Value::String(op)) if !op.is_empty() => op,
            Some(Value::String(_)) | None => {
                return Err(BridgeError::MalformedRequest(
                    "missing 'operation'".to_string(),
                ))
            }
            Some(other) => {
                return Err(BridgeError::MalformedRequest(format!(
                    "'operation' must be a string, found {}",
                    other.type_name()
                )))
            }
        };
        let parameters = body.remove("parameters").unwrap_or_default();
        if !(parameters.is_null() || parameters.is_map()) {
            return Err(BridgeError::MalformedRequest(format!(
                "'parameters' must be an object, found {}",
                parameters.type_name()
            )));
        }
        Ok(Self::new(operation, parameters))
    }

    /// Parse one JSON request.
    pub fn parse(text: &str) -> Result<Self, BridgeError> {
        let body = JsonCodec
            .decode_str(text)
            .map_err(|e| BridgeError::MalformedRequest(e.to_string()))?;
        Self::from_value(body)
    }
}
