//! Response bodies and numeric error codes.

use std::fmt;

use classbridge_core::{Error, Value};
use classbridge_serde::TypedValue;

use crate::error::BridgeError;

/// Numeric codes carried in `errorCode`.
///
/// The values are part of the wire contract; callers switch on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    Unknown = 1000,
    UnknownCommand = 1001,
    MissingRequiredParam = 1003,
    InvalidParamValue = 1005,
    InvalidParameter = 1006,
    CompositeNotFound = 1200,
    CompileFailed = 1201,
    ClassNotFound = 1211,
    PropertyNotFound = 1403,
    PropertySetFailed = 1404,
}

impl ErrorCode {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn for_error(error: &BridgeError) -> Self {
        match error {
            BridgeError::Core(e) => Self::for_core(e),
            BridgeError::MalformedRequest(_) => ErrorCode::InvalidParamValue,
            BridgeError::Encode(_) => ErrorCode::Unknown,
        }
    }

    fn for_core(error: &Error) -> Self {
        match error {
            Error::MissingRequiredParameter { .. } => ErrorCode::MissingRequiredParam,
            Error::InvalidParameter { .. }
            | Error::NotArrayProperty { .. }
            | Error::WrongElementKind { .. }
            | Error::UnsupportedElementKind { .. }
            | Error::KindMismatch { .. } => ErrorCode::InvalidParameter,
            Error::Path(_) => ErrorCode::InvalidParamValue,
            Error::TargetNotFound { .. } => ErrorCode::CompositeNotFound,
            Error::PropertyNotFound { .. } => ErrorCode::PropertyNotFound,
            Error::PropertySetFailed { .. } => ErrorCode::PropertySetFailed,
            Error::ClassNotFound { .. } => ErrorCode::ClassNotFound,
            Error::UnknownOperation(_) => ErrorCode::UnknownCommand,
            Error::Compile(_) => ErrorCode::CompileFailed,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// `{ success, ...fields }` as returned for one request.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    body: Value,
}

impl Response {
    /// A successful response with no fields yet.
    pub fn ok() -> Self {
        let mut body = Value::map();
        body.insert("success", true);
        Self { body }
    }

    /// A failed response describing `error`.
    pub fn from_error(error: &BridgeError) -> Self {
        let mut response = Self::ok();
        response.fail(error);
        response
    }

    /// Add or overwrite a field.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key, value);
        self
    }

    /// Set `success` without touching other fields.
    #[must_use]
    pub fn with_success(self, success: bool) -> Self {
        self.with("success", success)
    }

    /// Turn this response into a failure, keeping fields already set.
    pub fn fail(&mut self, error: &BridgeError) {
        let code = ErrorCode::for_error(error);
        self.body.insert("success", false);
        self.body.insert("error", error.to_string());
        self.body.insert("errorCode", i64::from(code.code()));
        self.body.insert("errorKind", error.kind());
    }

    pub fn success(&self) -> bool {
        self.body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.body
    }

    pub fn to_json(&self) -> Result<serde_json::Value, BridgeError> {
        self.body.to_json().map_err(BridgeError::Encode)
    }
}

impl From<BridgeError> for Response {
    fn from(error: BridgeError) -> Self {
        Response::from_error(&error)
    }
}
