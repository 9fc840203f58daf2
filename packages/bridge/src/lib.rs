//! ClassBridge request surface.
//!
//! A [`Bridge`] owns a host (anything implementing the core collaborator
//! traits) and turns `{ operation, parameters }` requests into
//! `{ success, ... }` responses. Requests run one at a time, to completion.
//!
//! Operations:
//! - `ping`
//! - `scan_classes`
//! - `replace_class_array_property`
//! - `replace_record_array_property`
//! - `set_class_property`
//! - `get_properties`
//!
//! Request-level failures come back as a response with `success: false`,
//! a message, a numeric `errorCode` and a taxonomy `errorKind`. Nothing is
//! written to the host in that case.
//!
//! # Example
//!
//! ```rust,ignore
//! use classbridge::{Bridge, BridgeConfig, Request};
//!
//! let mut bridge = Bridge::new(host, BridgeConfig::default());
//! let response = bridge.execute(&Request::parse(r#"{"operation": "ping"}"#)?);
//! assert!(response.success());
//! ```

mod commands;
mod config;
mod error;
mod params;
mod request;
mod response;

pub use config::{BridgeConfig, ConfigError, DEFAULT_TARGET_PATH};
pub use error::BridgeError;
pub use request::Request;
pub use response::{ErrorCode, Response};

use classbridge_core::{AssetCatalog, ClassRegistry, ClassResolver, CompositeStore};
use tracing::debug;

/// Everything a bridge needs from its host.
pub trait Host: ClassRegistry + ClassResolver + AssetCatalog + CompositeStore {}

impl<T: ClassRegistry + ClassResolver + AssetCatalog + CompositeStore + ?Sized> Host for T {}

/// Executes requests against a host.
pub struct Bridge<H> {
    host: H,
    config: BridgeConfig,
}

impl<H: Host> Bridge<H> {
    pub fn new(host: H, config: BridgeConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Run one request to completion.
    pub fn execute(&mut self, request: &Request) -> Response {
        debug!(operation = %request.operation, "executing request");
        match commands::dispatch(&mut self.host, &self.config, request) {
            Ok(response) => response,
            Err(error) => {
                debug!(operation = %request.operation, %error, "request failed");
                Response::from_error(&error)
            }
        }
    }

    /// Parse and run one JSON request. Malformed text yields an error response.
    pub fn execute_str(&mut self, text: &str) -> Response {
        match Request::parse(text) {
            Ok(request) => self.execute(&request),
            Err(error) => Response::from_error(&error),
        }
    }
}
