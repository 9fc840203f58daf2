//! Conversion errors.

use thiserror::Error;

/// Errors raised while moving data between serde and `Value`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input could not be parsed or did not fit the target type.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// A value could not be serialized.
    #[error("encode error: {message}")]
    Encode { message: String },
}

impl Error {
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode {
            message: message.into(),
        }
    }
}
