//! JSON codec implementation.

use classbridge_core::Value;

use crate::error::Error;

/// A codec between `Value` and JSON bytes or text.
///
/// # Example
///
/// ```rust
/// use classbridge_serde::{JsonCodec, Value};
///
/// let codec = JsonCodec;
/// let value = Value::from("hello");
///
/// let bytes = codec.encode(&value).unwrap();
/// let decoded = codec.decode(&bytes).unwrap();
///
/// assert_eq!(decoded, value);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn decode(&self, bytes: &[u8]) -> Result<Value, Error> {
        serde_json::from_slice(bytes).map_err(|e| Error::decode(e.to_string()))
    }

    pub fn decode_str(&self, text: &str) -> Result<Value, Error> {
        self.decode(text.as_bytes())
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(value).map_err(|e| Error::encode(e.to_string()))
    }

    /// Encode on a single line.
    pub fn encode_string(&self, value: &Value) -> Result<String, Error> {
        serde_json::to_string(value).map_err(|e| Error::encode(e.to_string()))
    }
}
