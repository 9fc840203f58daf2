//! Outcome of one marshal call.

use std::fmt;

use crate::error::FieldError;

/// One accumulated element-level failure.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementError {
    /// Position in the input list, when marshalling an array.
    pub index: Option<usize>,
    /// Field path inside a record (`Stats.Speed` for nested records).
    pub field: Option<String>,
    pub error: FieldError,
}

impl ElementError {
    pub fn element(index: usize, error: FieldError) -> Self {
        Self {
            index: Some(index),
            field: None,
            error,
        }
    }

    pub fn field(field: impl Into<String>, error: FieldError) -> Self {
        Self {
            index: None,
            field: Some(field.into()),
            error,
        }
    }

    /// Tag with the element index the record occupied.
    #[must_use]
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Prefix the field path with the name of the enclosing record field.
    #[must_use]
    pub fn nested_in(mut self, parent: &str) -> Self {
        self.field = Some(match self.field.take() {
            Some(inner) => format!("{}.{}", parent, inner),
            None => parent.to_string(),
        });
        self
    }
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.index, &self.field) {
            (Some(i), Some(field)) => write!(f, "element {}: field '{}': {}", i, field, self.error),
            (Some(i), None) => write!(f, "element {}: {}", i, self.error),
            (None, Some(field)) => write!(f, "field '{}': {}", field, self.error),
            (None, None) => write!(f, "{}", self.error),
        }
    }
}

/// Accepted count plus every element-level failure, in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarshalResult {
    pub accepted: usize,
    pub errors: Vec<ElementError>,
}

impl MarshalResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// False iff at least one element or field failed.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, error: ElementError) {
        self.errors.push(error);
    }

    /// Error strings as reported to callers.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_index_and_field() {
        let e = ElementError::field(
            "Damage",
            FieldError::TypeMismatch {
                expected: "number",
                found: "string",
            },
        )
        .at(1);
        assert_eq!(
            e.to_string(),
            "element 1: field 'Damage': type mismatch: expected number, found string"
        );
    }

    #[test]
    fn nested_fields_build_dotted_paths() {
        let e = ElementError::field("Speed", FieldError::InvalidIdentifier).nested_in("Stats");
        assert_eq!(e.field.as_deref(), Some("Stats.Speed"));
    }

    #[test]
    fn success_tracks_errors_only() {
        let mut result = MarshalResult::new();
        assert!(result.success());
        result.push_error(ElementError::element(
            0,
            FieldError::ClassNotFound {
                path: "/Game/Nope".to_string(),
            },
        ));
        assert!(!result.success());
        assert_eq!(
            result.error_messages(),
            vec!["element 0: class not found: /Game/Nope".to_string()]
        );
    }
}
