//! Serde integration for ClassBridge.
//!
//! `Value` carries its own serde impls in the core crate. This layer adds:
//! - `TypedValue`: typed reads out of a map value, any serde type into a
//!   `Value`, and rendering as `serde_json::Value`
//! - `JsonCodec`: bytes and text <-> `Value`
//!
//! # Example
//!
//! ```rust
//! use classbridge_serde::{JsonCodec, TypedValue};
//!
//! let request = JsonCodec.decode_str(r#"{"classPaths": ["/Game/Sword"]}"#).unwrap();
//! let paths: Option<Vec<String>> = request.field_as("classPaths").unwrap();
//! assert_eq!(paths, Some(vec!["/Game/Sword".to_string()]));
//! ```

mod codec;
mod error;
mod typed;

pub use codec::JsonCodec;
pub use error::Error;
pub use typed::TypedValue;

// Re-export core types for convenience
pub use classbridge_core::Value;
