//! Error types for the core engine.
//!
//! Two tiers:
//! - `Error`: request-level. Raised before any mutation and aborts the request.
//! - `FieldError`: element-level. Accumulated per field or element, never aborts.

use std::fmt;

use thiserror::Error;

use crate::object_path::PathError;

/// Which array element kind an operation expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKindTag {
    ClassReference,
    Record,
}

impl fmt::Display for ElementKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKindTag::ClassReference => write!(f, "class-reference"),
            ElementKindTag::Record => write!(f, "record"),
        }
    }
}

/// Request-level errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required request parameter is absent or empty.
    #[error("missing required parameter: {name}")]
    MissingRequiredParameter { name: String },

    /// A request parameter is present but has the wrong shape or value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// The composite definition addressed by the request does not exist.
    #[error("target not found: {name}")]
    TargetNotFound { name: String },

    /// No property with this name on the target type or its ancestors.
    #[error("property not found: {property} on {owner}")]
    PropertyNotFound { owner: String, property: String },

    /// The property exists but is not an array.
    #[error("property {property} is not an array (kind is {actual})")]
    NotArrayProperty { property: String, actual: String },

    /// The array's element kind is not the one the operation works on.
    #[error("property {property} is not a {expected} array (element kind is {actual})")]
    WrongElementKind {
        property: String,
        expected: ElementKindTag,
        actual: String,
    },

    /// The array's element kind is outside what the engine can marshal.
    #[error("property {property} has unsupported element kind {kind}")]
    UnsupportedElementKind { property: String, kind: String },

    /// A scalar property has a different kind than the operation requires.
    #[error("property {property} is not a {expected} property (kind is {actual})")]
    KindMismatch {
        property: String,
        expected: &'static str,
        actual: String,
    },

    /// Writing a single property failed.
    #[error("failed to set {property}: {source}")]
    PropertySetFailed {
        property: String,
        #[source]
        source: FieldError,
    },

    /// A class named by the request could not be resolved.
    #[error("class not found: {path}")]
    ClassNotFound { path: String },

    /// The operation name is not known to the dispatcher.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// Object path validation error.
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// The composite store refused to recompile.
    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl Error {
    /// Stable taxonomy name reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingRequiredParameter { .. } => "MissingRequiredParameter",
            Error::InvalidParameter { .. } => "InvalidParameter",
            Error::TargetNotFound { .. } => "TargetNotFound",
            Error::PropertyNotFound { .. } => "PropertyNotFound",
            Error::NotArrayProperty { .. } => "NotArrayProperty",
            Error::WrongElementKind {
                expected: ElementKindTag::ClassReference,
                ..
            } => "NotClassReferenceArray",
            Error::WrongElementKind {
                expected: ElementKindTag::Record,
                ..
            } => "NotRecordArray",
            Error::UnsupportedElementKind { .. } => "UnsupportedElementKind",
            Error::KindMismatch { .. } => "KindMismatch",
            Error::PropertySetFailed { .. } => "PropertySetFailed",
            Error::ClassNotFound { .. } => "ClassNotFound",
            Error::UnknownOperation(_) => "UnknownOperation",
            Error::Path(_) => "InvalidPath",
            Error::Compile(_) => "CompileError",
        }
    }
}

/// Per-field and per-element failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// The untyped value has the wrong shape for the field kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A number does not fit the field's storage.
    #[error("value {value} is out of range for {kind}")]
    OutOfRange { kind: &'static str, value: String },

    /// Symbolic names must not be empty.
    #[error("invalid identifier: name must not be empty")]
    InvalidIdentifier,

    /// The class resolver returned nothing for this path.
    #[error("class not found: {path}")]
    ClassNotFound { path: String },

    /// The class resolved but violates the field's meta-class.
    #[error("class {class} is not a subclass of {expected}")]
    ClassMismatch { class: String, expected: String },
}

impl FieldError {
    /// Stable taxonomy name reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldError::TypeMismatch { .. } => "TypeMismatch",
            FieldError::OutOfRange { .. } => "OutOfRange",
            FieldError::InvalidIdentifier => "InvalidIdentifier",
            FieldError::ClassNotFound { .. } => "ClassNotFound",
            FieldError::ClassMismatch { .. } => "ClassMismatch",
        }
    }

    pub(crate) fn mismatch(expected: &'static str, found: &crate::Value) -> Self {
        FieldError::TypeMismatch {
            expected,
            found: found.type_name(),
        }
    }
}

/// Failure reported by a composite store while recompiling.
///
/// The message is the store's own and is surfaced verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    pub target: String,
    pub message: String,
}

impl CompileError {
    pub fn new(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    #[test]
    fn wrong_element_kind_reports_both_faces() {
        let class_side = Error::WrongElementKind {
            property: "Slots".to_string(),
            expected: ElementKindTag::ClassReference,
            actual: "WeaponSlot".to_string(),
        };
        assert_eq!(class_side.kind(), "NotClassReferenceArray");
        assert!(class_side
            .to_string()
            .contains("not a class-reference array"));

        let record_side = Error::WrongElementKind {
            property: "AllowedWeapons".to_string(),
            expected: ElementKindTag::Record,
            actual: "TSubclassOf<Actor>".to_string(),
        };
        assert_eq!(record_side.kind(), "NotRecordArray");
    }

    #[test]
    fn property_not_found_display() {
        let e = Error::PropertyNotFound {
            owner: "Loadout_C".to_string(),
            property: "Missing".to_string(),
        };
        let display = e.to_string();
        assert!(display.contains("property not found"));
        assert!(display.contains("Missing"));
        assert!(display.contains("Loadout_C"));
    }

    #[test]
    fn compile_error_is_verbatim() {
        let e: Error = CompileError::new("Loadout", "graph has a cycle").into();
        assert_eq!(e.to_string(), "graph has a cycle");
        assert_eq!(e.kind(), "CompileError");
    }

    #[test]
    fn property_set_failed_keeps_source() {
        let e = Error::PropertySetFailed {
            property: "Weapon".to_string(),
            source: FieldError::ClassNotFound {
                path: "/Game/Nope".to_string(),
            },
        };
        assert!(StdError::source(&e).is_some());
        assert!(e.to_string().contains("/Game/Nope"));
    }

    #[test]
    fn field_error_kinds() {
        assert_eq!(FieldError::InvalidIdentifier.kind(), "InvalidIdentifier");
        let e = FieldError::mismatch("number", &crate::Value::from("ten"));
        assert_eq!(e.kind(), "TypeMismatch");
        assert_eq!(e.to_string(), "type mismatch: expected number, found string");
    }
}
