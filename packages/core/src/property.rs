//! Property kinds and descriptors.
//!
//! `PropertyKind` is a closed tagged union resolved once at lookup time.
//! Marshalling dispatches on the variant and never re-probes the kind.

use std::sync::Arc;

/// Declared kind of a property or record field.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyKind {
    /// 32-bit signed integer.
    Int,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    Bool,
    /// Free text.
    Str,
    /// Symbolic name; never empty.
    Name,
    /// Reference to a class, optionally constrained to descendants of `meta_class`.
    Class { meta_class: Option<String> },
    /// Fixed-shape record.
    Record(Arc<RecordType>),
    /// Dynamically sized homogeneous array.
    Array(Box<PropertyKind>),
    /// A kind the engine does not marshal (maps, sets, delegates, ...).
    Unsupported(String),
}

impl PropertyKind {
    pub fn class(meta_class: Option<&str>) -> Self {
        PropertyKind::Class {
            meta_class: meta_class.map(str::to_string),
        }
    }

    pub fn array_of(inner: PropertyKind) -> Self {
        PropertyKind::Array(Box::new(inner))
    }

    /// True for the kinds `FieldCodec` converts directly.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            PropertyKind::Int
                | PropertyKind::Float
                | PropertyKind::Double
                | PropertyKind::Bool
                | PropertyKind::Str
                | PropertyKind::Name
                | PropertyKind::Class { .. }
        )
    }

    /// Human-readable type name, in the host's notation.
    pub fn type_name(&self) -> String {
        match self {
            PropertyKind::Int => "Int32".to_string(),
            PropertyKind::Float => "Float".to_string(),
            PropertyKind::Double => "Double".to_string(),
            PropertyKind::Bool => "Bool".to_string(),
            PropertyKind::Str => "String".to_string(),
            PropertyKind::Name => "Name".to_string(),
            PropertyKind::Class { meta_class } => format!(
                "TSubclassOf<{}>",
                meta_class.as_deref().map(short_name).unwrap_or("Object")
            ),
            PropertyKind::Record(record) => record.name.clone(),
            PropertyKind::Array(inner) => format!("TArray<{}>", inner.type_name()),
            PropertyKind::Unsupported(name) => name.clone(),
        }
    }
}

/// Last component of a class path, or the input when it is already a name.
fn short_name(path: &str) -> &str {
    let tail = path.rsplit('/').next().unwrap_or(path);
    tail.rsplit('.').next().unwrap_or(tail)
}

/// Element kinds an array property can be marshalled with.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    Class { meta_class: Option<String> },
    Record(Arc<RecordType>),
}

impl ElementKind {
    pub fn type_name(&self) -> String {
        match self {
            ElementKind::Class { meta_class } => PropertyKind::Class {
                meta_class: meta_class.clone(),
            }
            .type_name(),
            ElementKind::Record(record) => record.name.clone(),
        }
    }
}

/// Shape of a record (struct) type.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordType {
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl RecordType {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// One declared field of a record type.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: PropertyKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Editor-facing visibility flags of a class property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyFlags {
    pub editable: bool,
    pub blueprint_visible: bool,
    pub read_only: bool,
}

impl Default for PropertyFlags {
    fn default() -> Self {
        Self {
            editable: true,
            blueprint_visible: true,
            read_only: false,
        }
    }
}

/// A property declared on a class.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    pub category: String,
    pub flags: PropertyFlags,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            category: String::new(),
            flags: PropertyFlags::default(),
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names() {
        assert_eq!(PropertyKind::Int.type_name(), "Int32");
        assert_eq!(PropertyKind::class(None).type_name(), "TSubclassOf<Object>");
        assert_eq!(
            PropertyKind::class(Some("/Script/Engine.Actor")).type_name(),
            "TSubclassOf<Actor>"
        );
        let slot = Arc::new(RecordType::new("WeaponSlot", vec![]));
        assert_eq!(
            PropertyKind::array_of(PropertyKind::Record(slot)).type_name(),
            "TArray<WeaponSlot>"
        );
        assert_eq!(
            PropertyKind::Unsupported("TMap<Name, Int32>".to_string()).type_name(),
            "TMap<Name, Int32>"
        );
    }

    #[test]
    fn scalars_exclude_composites() {
        assert!(PropertyKind::Name.is_scalar());
        assert!(PropertyKind::class(None).is_scalar());
        assert!(!PropertyKind::array_of(PropertyKind::Int).is_scalar());
        assert!(!PropertyKind::Unsupported("Delegate".to_string()).is_scalar());
    }
}
