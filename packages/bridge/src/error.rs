use classbridge_core::Error as CoreError;
use classbridge_serde::Error as SerdeError;
use thiserror::Error;

/// Everything that can turn a request into an error response.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The request text is not a JSON object with an `operation`.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Operation output could not be converted into a response body.
    #[error("failed to encode response: {0}")]
    Encode(#[source] SerdeError),
}

impl BridgeError {
    /// Stable taxonomy name reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            BridgeError::Core(e) => e.kind(),
            BridgeError::MalformedRequest(_) => "MalformedRequest",
            BridgeError::Encode(_) => "EncodeError",
        }
    }
}
