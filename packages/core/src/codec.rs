//! FieldCodec: one primitive field kind <-> one untyped value.
//!
//! Every write is all-or-nothing. The value is converted first and the slot
//! is only assigned once conversion succeeded.

use crate::class::{ClassRef, ClassResolver};
use crate::error::FieldError;
use crate::property::PropertyKind;
use crate::slot::{Name, SlotValue};
use crate::value::Value;

/// Converts between untyped values and typed slots.
///
/// Class references are resolved through the injected resolver, once per
/// value, without retries.
#[derive(Clone, Copy)]
pub struct FieldCodec<'r> {
    resolver: &'r dyn ClassResolver,
}

impl<'r> FieldCodec<'r> {
    pub fn new(resolver: &'r dyn ClassResolver) -> Self {
        Self { resolver }
    }

    /// Whether this codec writes `kind` directly.
    pub fn supports(kind: &PropertyKind) -> bool {
        kind.is_scalar()
    }

    /// Write `value` into `slot` as `kind`. On error `slot` is untouched.
    pub fn write(
        &self,
        kind: &PropertyKind,
        slot: &mut SlotValue,
        value: &Value,
    ) -> Result<(), FieldError> {
        *slot = self.convert(kind, value)?;
        Ok(())
    }

    /// Convert `value` to a slot of `kind` without writing it anywhere.
    pub fn convert(&self, kind: &PropertyKind, value: &Value) -> Result<SlotValue, FieldError> {
        match kind {
            PropertyKind::Int => to_int(value).map(SlotValue::Int),
            PropertyKind::Float => to_float(value).map(SlotValue::Float),
            PropertyKind::Double => value
                .as_f64()
                .map(SlotValue::Double)
                .ok_or_else(|| FieldError::mismatch("number", value)),
            PropertyKind::Bool => value
                .as_bool()
                .map(SlotValue::Bool)
                .ok_or_else(|| FieldError::mismatch("boolean", value)),
            PropertyKind::Str => value
                .as_str()
                .map(|s| SlotValue::Str(s.to_string()))
                .ok_or_else(|| FieldError::mismatch("string", value)),
            PropertyKind::Name => {
                let s = value
                    .as_str()
                    .ok_or_else(|| FieldError::mismatch("string", value))?;
                Name::new(s)
                    .map(SlotValue::Name)
                    .ok_or(FieldError::InvalidIdentifier)
            }
            PropertyKind::Class { meta_class } => match value {
                Value::Null => Ok(SlotValue::Class(None)),
                Value::String(path) => self
                    .resolve_class(meta_class.as_deref(), path)
                    .map(|class| SlotValue::Class(Some(class))),
                other => Err(FieldError::mismatch("string", other)),
            },
            PropertyKind::Record(_) | PropertyKind::Array(_) | PropertyKind::Unsupported(_) => {
                Err(FieldError::mismatch("primitive value", value))
            }
        }
    }

    /// Resolve a class path and check it against an optional meta-class.
    pub fn resolve_class(
        &self,
        meta_class: Option<&str>,
        path: &str,
    ) -> Result<ClassRef, FieldError> {
        let class = self
            .resolver
            .resolve(path)
            .ok_or_else(|| FieldError::ClassNotFound {
                path: path.to_string(),
            })?;
        if let Some(meta) = meta_class {
            if !self.resolver.is_subclass_of(&class, meta) {
                return Err(FieldError::ClassMismatch {
                    class: class.path.to_string(),
                    expected: meta.to_string(),
                });
            }
        }
        Ok(class)
    }

    /// Read a slot back out as an untyped value.
    pub fn read(&self, kind: &PropertyKind, slot: &SlotValue) -> Value {
        match (kind, slot) {
            (PropertyKind::Record(record), SlotValue::Record(stored)) => {
                let mut out = Value::map();
                for field in &record.fields {
                    let value = stored
                        .get(&field.name)
                        .map(|s| self.read(&field.kind, s))
                        .unwrap_or_default();
                    out.insert(field.name.clone(), value);
                }
                out
            }
            (PropertyKind::Array(inner), SlotValue::Array(items)) => {
                Value::Array(items.iter().map(|item| self.read(inner, item)).collect())
            }
            _ => read_slot(slot),
        }
    }
}

fn read_slot(slot: &SlotValue) -> Value {
    match slot {
        SlotValue::Int(i) => Value::from(*i),
        SlotValue::Float(f) => Value::from(*f),
        SlotValue::Double(d) => Value::Float(*d),
        SlotValue::Bool(b) => Value::Bool(*b),
        SlotValue::Str(s) => Value::from(s.as_str()),
        SlotValue::Name(name) => Value::from(name.as_str()),
        SlotValue::Class(class) => class
            .as_ref()
            .map(|c| Value::from(c.path.as_str()))
            .unwrap_or_default(),
        SlotValue::Record(record) => Value::Map(
            record
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), read_slot(v)))
                .collect(),
        ),
        SlotValue::Array(items) => Value::Array(items.iter().map(read_slot).collect()),
        SlotValue::Opaque(_) => Value::Null,
    }
}

fn to_int(value: &Value) -> Result<i32, FieldError> {
    match value {
        Value::Integer(i) => i32::try_from(*i).map_err(|_| FieldError::OutOfRange {
            kind: "Int32",
            value: i.to_string(),
        }),
        Value::Float(f) => {
            let truncated = f.trunc();
            if truncated.is_finite()
                && truncated >= i32::MIN as f64
                && truncated <= i32::MAX as f64
            {
                Ok(truncated as i32)
            } else {
                Err(FieldError::OutOfRange {
                    kind: "Int32",
                    value: f.to_string(),
                })
            }
        }
        other => Err(FieldError::mismatch("number", other)),
    }
}

fn to_float(value: &Value) -> Result<f32, FieldError> {
    let f = value
        .as_f64()
        .ok_or_else(|| FieldError::mismatch("number", value))?;
    if f.is_finite() && f.abs() > f32::MAX as f64 {
        return Err(FieldError::OutOfRange {
            kind: "Float",
            value: f.to_string(),
        });
    }
    Ok(f as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{FieldDescriptor, RecordType};
    use crate::slot::RecordValue;
    use crate::test_support::TestRegistry;
    use std::sync::Arc;

    fn registry() -> TestRegistry {
        let mut registry = TestRegistry::new();
        registry.class("/Script/Engine.Actor", None);
        registry.class("/Game/Sword.Sword_C", Some("/Script/Engine.Actor"));
        registry.class("/Script/Engine.Texture", None);
        registry
    }

    #[test]
    fn numbers_coerce_without_strings() {
        let registry = registry();
        let codec = FieldCodec::new(&registry);
        assert_eq!(
            codec.convert(&PropertyKind::Int, &Value::Integer(7)),
            Ok(SlotValue::Int(7))
        );
        assert_eq!(
            codec.convert(&PropertyKind::Int, &Value::Float(7.9)),
            Ok(SlotValue::Int(7))
        );
        assert_eq!(
            codec.convert(&PropertyKind::Double, &Value::Integer(2)),
            Ok(SlotValue::Double(2.0))
        );
        let err = codec
            .convert(&PropertyKind::Int, &Value::from("7"))
            .unwrap_err();
        assert_eq!(err.kind(), "TypeMismatch");
    }

    #[test]
    fn overflow_is_reported() {
        let registry = registry();
        let codec = FieldCodec::new(&registry);
        let err = codec
            .convert(&PropertyKind::Int, &Value::Integer(i64::from(i32::MAX) + 1))
            .unwrap_err();
        assert_eq!(err.kind(), "OutOfRange");
        let err = codec
            .convert(&PropertyKind::Float, &Value::Float(1e300))
            .unwrap_err();
        assert_eq!(err.kind(), "OutOfRange");
    }

    #[test]
    fn booleans_are_not_numbers() {
        let registry = registry();
        let codec = FieldCodec::new(&registry);
        assert!(codec.convert(&PropertyKind::Bool, &Value::Integer(1)).is_err());
        assert!(codec.convert(&PropertyKind::Float, &Value::Bool(true)).is_err());
    }

    #[test]
    fn empty_names_are_invalid() {
        let registry = registry();
        let codec = FieldCodec::new(&registry);
        assert_eq!(
            codec.convert(&PropertyKind::Name, &Value::from("")),
            Err(FieldError::InvalidIdentifier)
        );
        // Free text may be empty.
        assert_eq!(
            codec.convert(&PropertyKind::Str, &Value::from("")),
            Ok(SlotValue::Str(String::new()))
        );
    }

    #[test]
    fn failed_write_leaves_slot_untouched() {
        let registry = registry();
        let codec = FieldCodec::new(&registry);
        let mut slot = SlotValue::Int(3);
        assert!(codec
            .write(&PropertyKind::Int, &mut slot, &Value::from("x"))
            .is_err());
        assert_eq!(slot, SlotValue::Int(3));
    }

    #[test]
    fn class_references_resolve_once_and_respect_meta_class() {
        let registry = registry();
        let codec = FieldCodec::new(&registry);
        let actor_kind = PropertyKind::class(Some("/Script/Engine.Actor"));

        let slot = codec
            .convert(&actor_kind, &Value::from("/Game/Sword.Sword_C"))
            .unwrap();
        assert_eq!(slot.as_class().unwrap().name, "Sword_C");

        let missing = codec
            .convert(&actor_kind, &Value::from("/Game/Nope"))
            .unwrap_err();
        assert_eq!(
            missing,
            FieldError::ClassNotFound {
                path: "/Game/Nope".to_string()
            }
        );

        let mismatch = codec
            .convert(&actor_kind, &Value::from("/Script/Engine.Texture"))
            .unwrap_err();
        assert_eq!(mismatch.kind(), "ClassMismatch");

        assert_eq!(
            codec.convert(&actor_kind, &Value::Null),
            Ok(SlotValue::Class(None))
        );
    }

    #[test]
    fn read_follows_declared_record_order() {
        let registry = registry();
        let codec = FieldCodec::new(&registry);
        let record = Arc::new(RecordType::new(
            "Stats",
            vec![
                FieldDescriptor::new("Speed", PropertyKind::Float),
                FieldDescriptor::new("Tag", PropertyKind::Name),
            ],
        ));
        let mut stored = RecordValue::zeroed(&record);
        stored
            .fields
            .insert("Speed".to_string(), SlotValue::Float(1.5));

        let kind = PropertyKind::array_of(PropertyKind::Record(record));
        let value = codec.read(&kind, &SlotValue::Array(vec![SlotValue::Record(stored)]));
        let first = &value.as_array().unwrap()[0];
        assert_eq!(first.get("Speed"), Some(&Value::Float(1.5)));
        assert_eq!(first.get("Tag"), Some(&Value::from("None")));
    }

    #[test]
    fn read_unset_class_is_null() {
        let registry = registry();
        let codec = FieldCodec::new(&registry);
        assert_eq!(
            codec.read(&PropertyKind::class(None), &SlotValue::Class(None)),
            Value::Null
        );
    }
}
