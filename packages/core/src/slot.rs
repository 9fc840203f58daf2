//! Typed in-memory storage: the raw field slots marshalling writes into.

use std::collections::BTreeMap;
use std::fmt;

use crate::class::{ClassDescriptor, ClassRef, ClassRegistry, RegistryExt};
use crate::property::{PropertyKind, RecordType};

/// A symbolic name. The empty name is spelled `None`, as hosts print it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Option<String>);

impl Name {
    pub fn none() -> Self {
        Name(None)
    }

    /// Returns `None` for the empty string; names are never empty.
    pub fn new(s: &str) -> Option<Self> {
        if s.is_empty() {
            None
        } else {
            Some(Name(Some(s.to_string())))
        }
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("None")
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage for one field of one kind.
#[derive(Clone, Debug, PartialEq)]
pub enum SlotValue {
    Int(i32),
    Float(f32),
    Double(f64),
    Bool(bool),
    Str(String),
    Name(Name),
    Class(Option<ClassRef>),
    Record(RecordValue),
    Array(Vec<SlotValue>),
    /// Storage of an unsupported kind. Never written by the engine.
    Opaque(String),
}

impl SlotValue {
    /// The zero value of a kind, as a freshly constructed object holds it.
    pub fn zeroed(kind: &PropertyKind) -> Self {
        match kind {
            PropertyKind::Int => SlotValue::Int(0),
            PropertyKind::Float => SlotValue::Float(0.0),
            PropertyKind::Double => SlotValue::Double(0.0),
            PropertyKind::Bool => SlotValue::Bool(false),
            PropertyKind::Str => SlotValue::Str(String::new()),
            PropertyKind::Name => SlotValue::Name(Name::none()),
            PropertyKind::Class { .. } => SlotValue::Class(None),
            PropertyKind::Record(record) => SlotValue::Record(RecordValue::zeroed(record)),
            PropertyKind::Array(_) => SlotValue::Array(Vec::new()),
            PropertyKind::Unsupported(name) => SlotValue::Opaque(name.clone()),
        }
    }

    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            SlotValue::Class(class) => class.as_ref(),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            SlotValue::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SlotValue]> {
        match self {
            SlotValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// The field storage of one record value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordValue {
    pub fields: BTreeMap<String, SlotValue>,
}

impl RecordValue {
    pub fn zeroed(record: &RecordType) -> Self {
        RecordValue {
            fields: record
                .fields
                .iter()
                .map(|f| (f.name.clone(), SlotValue::zeroed(&f.kind)))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&SlotValue> {
        self.fields.get(field)
    }
}

/// A live object: one slot per property of its class and all ancestors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Instance {
    fields: BTreeMap<String, SlotValue>,
}

impl Instance {
    /// Zero-initialise every property declared on `class` or its ancestors.
    ///
    /// A property redeclared on a subclass shadows the inherited one.
    pub fn for_class<R: ClassRegistry + ?Sized>(registry: &R, class: &ClassDescriptor) -> Self {
        let mut chain: Vec<&ClassDescriptor> = registry.ancestors(class).collect();
        chain.reverse();
        chain.push(class);

        let mut fields = BTreeMap::new();
        for owner in chain {
            for property in &owner.properties {
                fields.insert(property.name.clone(), SlotValue::zeroed(&property.kind));
            }
        }
        Instance { fields }
    }

    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.fields.get(name)
    }

    /// The slot for `name`, created zeroed on first access.
    pub fn slot_mut(&mut self, name: &str, kind: &PropertyKind) -> &mut SlotValue {
        self.fields
            .entry(name.to_string())
            .or_insert_with(|| SlotValue::zeroed(kind))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
