//! Fixture loading errors.

use std::io;
use std::path::PathBuf;

use classbridge_core::PathError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to read fixture {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("fixture is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid path in fixture: {0}")]
    Path(#[from] PathError),

    #[error("class {path} is declared twice")]
    DuplicateClass { path: String },

    #[error("{referenced_by} refers to unknown class {path}")]
    UnknownClass { path: String, referenced_by: String },

    #[error("unknown record type {name}")]
    UnknownRecord { name: String },

    #[error("record type {name} contains itself")]
    RecordCycle { name: String },

    #[error("default for {composite}.{property} rejected: {message}")]
    InvalidDefault {
        composite: String,
        property: String,
        message: String,
    },
}
