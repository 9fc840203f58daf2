//! RecordMarshaller: apply a keyed bag to one record, field by field.

use tracing::debug;

use crate::codec::FieldCodec;
use crate::property::{PropertyKind, RecordType};
use crate::result::{ElementError, MarshalResult};
use crate::slot::{RecordValue, SlotValue};
use crate::value::Value;

/// Applies untyped bags to record slots.
///
/// Absent keys are skipped (partial payloads are updates). Fields of kinds
/// outside the closed set are skipped. Field failures are collected and
/// never stop the remaining fields.
#[derive(Clone, Copy)]
pub struct RecordMarshaller<'r> {
    codec: FieldCodec<'r>,
}

impl<'r> RecordMarshaller<'r> {
    pub fn new(codec: FieldCodec<'r>) -> Self {
        Self { codec }
    }

    /// Apply `bag` to `target`. `accepted` counts fields written.
    pub fn apply_record(
        &self,
        record: &RecordType,
        target: &mut RecordValue,
        bag: &Value,
    ) -> MarshalResult {
        let mut result = MarshalResult::new();
        let Some(bag) = bag.as_map() else {
            result.push_error(ElementError {
                index: None,
                field: None,
                error: crate::FieldError::mismatch("object", bag),
            });
            return result;
        };

        for field in &record.fields {
            let Some(value) = bag.get(&field.name) else {
                continue;
            };
            match &field.kind {
                PropertyKind::Record(nested) => {
                    let nested_result = match target.fields.get_mut(&field.name) {
                        Some(SlotValue::Record(inner)) => self.apply_record(nested, inner, value),
                        _ => {
                            let mut inner = RecordValue::zeroed(nested);
                            let nested_result = self.apply_record(nested, &mut inner, value);
                            if nested_result.accepted > 0 {
                                target
                                    .fields
                                    .insert(field.name.clone(), SlotValue::Record(inner));
                            }
                            nested_result
                        }
                    };
                    result.accepted += nested_result.accepted;
                    result.errors.extend(
                        nested_result
                            .errors
                            .into_iter()
                            .map(|e| e.nested_in(&field.name)),
                    );
                }
                kind if FieldCodec::supports(kind) => match self.codec.convert(kind, value) {
                    Ok(slot) => {
                        target.fields.insert(field.name.clone(), slot);
                        result.accepted += 1;
                    }
                    Err(error) => result.push_error(ElementError::field(&field.name, error)),
                },
                other => {
                    debug!(
                        record = %record.name,
                        field = %field.name,
                        kind = %other.type_name(),
                        "skipping field of unsupported kind"
                    );
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::FieldDescriptor;
    use crate::test_support::TestRegistry;
    use collection_literals::btree;
    use std::sync::Arc;

    fn weapon_slot() -> RecordType {
        RecordType::new(
            "WeaponSlot",
            vec![
                FieldDescriptor::new("Label", PropertyKind::Str),
                FieldDescriptor::new("Damage", PropertyKind::Int),
                FieldDescriptor::new("Scale", PropertyKind::Float),
                FieldDescriptor::new(
                    "Tags",
                    PropertyKind::Unsupported("TSet<Name>".to_string()),
                ),
            ],
        )
    }

    fn bag(entries: std::collections::BTreeMap<String, Value>) -> Value {
        Value::Map(entries)
    }

    #[test]
    fn partial_payloads_leave_other_fields_alone() {
        let registry = TestRegistry::new();
        let marshaller = RecordMarshaller::new(FieldCodec::new(&registry));
        let record = weapon_slot();
        let mut target = RecordValue::zeroed(&record);
        target
            .fields
            .insert("Damage".to_string(), SlotValue::Int(4));

        let result = marshaller.apply_record(
            &record,
            &mut target,
            &bag(btree! { "Label".to_string() => Value::from("Axe") }),
        );
        assert!(result.success());
        assert_eq!(result.accepted, 1);
        assert_eq!(target.get("Label"), Some(&SlotValue::Str("Axe".to_string())));
        assert_eq!(target.get("Damage"), Some(&SlotValue::Int(4)));
    }

    #[test]
    fn field_failures_do_not_stop_the_record() {
        let registry = TestRegistry::new();
        let marshaller = RecordMarshaller::new(FieldCodec::new(&registry));
        let record = weapon_slot();
        let mut target = RecordValue::zeroed(&record);

        let result = marshaller.apply_record(
            &record,
            &mut target,
            &bag(btree! {
                "Label".to_string() => Value::Integer(3),
                "Damage".to_string() => Value::from("high"),
                "Scale".to_string() => Value::Float(2.0),
                "Unknown".to_string() => Value::Bool(true),
            }),
        );
        assert_eq!(result.accepted, 1);
        let fields: Vec<_> = result.errors.iter().map(|e| e.field.clone()).collect();
        // Declaration order, not key order.
        assert_eq!(
            fields,
            vec![Some("Label".to_string()), Some("Damage".to_string())]
        );
        assert_eq!(target.get("Scale"), Some(&SlotValue::Float(2.0)));
    }

    #[test]
    fn unsupported_fields_are_skipped_silently() {
        let registry = TestRegistry::new();
        let marshaller = RecordMarshaller::new(FieldCodec::new(&registry));
        let record = weapon_slot();
        let mut target = RecordValue::zeroed(&record);

        let result = marshaller.apply_record(
            &record,
            &mut target,
            &bag(btree! { "Tags".to_string() => Value::from(vec!["a"]) }),
        );
        assert!(result.success());
        assert_eq!(result.accepted, 0);
    }

    #[test]
    fn nested_records_report_dotted_paths() {
        let registry = TestRegistry::new();
        let marshaller = RecordMarshaller::new(FieldCodec::new(&registry));
        let stats = Arc::new(RecordType::new(
            "Stats",
            vec![
                FieldDescriptor::new("Speed", PropertyKind::Float),
                FieldDescriptor::new("Tag", PropertyKind::Name),
            ],
        ));
        let record = RecordType::new(
            "Unit",
            vec![FieldDescriptor::new("Stats", PropertyKind::Record(stats))],
        );
        let mut target = RecordValue::zeroed(&record);

        let result = marshaller.apply_record(
            &record,
            &mut target,
            &bag(btree! {
                "Stats".to_string() => bag(btree! {
                    "Speed".to_string() => Value::Float(3.5),
                    "Tag".to_string() => Value::from(""),
                }),
            }),
        );
        assert_eq!(result.accepted, 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field.as_deref(), Some("Stats.Tag"));
        let stats = target.get("Stats").and_then(SlotValue::as_record).unwrap();
        assert_eq!(stats.get("Speed"), Some(&SlotValue::Float(3.5)));
    }

    #[test]
    fn failed_writes_do_not_create_slots() {
        let registry = TestRegistry::new();
        let marshaller = RecordMarshaller::new(FieldCodec::new(&registry));
        let stats = Arc::new(RecordType::new(
            "Stats",
            vec![FieldDescriptor::new("Tag", PropertyKind::Name)],
        ));
        let mut record = weapon_slot();
        record
            .fields
            .push(FieldDescriptor::new("Stats", PropertyKind::Record(stats)));
        let mut target = RecordValue::default();

        let result = marshaller.apply_record(
            &record,
            &mut target,
            &bag(btree! {
                "Damage".to_string() => Value::from("high"),
                "Stats".to_string() => bag(btree! { "Tag".to_string() => Value::from("") }),
                "Scale".to_string() => Value::Float(0.5),
            }),
        );
        assert_eq!(result.accepted, 1);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(target.get("Damage"), None);
        assert_eq!(target.get("Stats"), None);
        assert_eq!(target.get("Scale"), Some(&SlotValue::Float(0.5)));
    }

    #[test]
    fn non_object_bag_is_one_error() {
        let registry = TestRegistry::new();
        let marshaller = RecordMarshaller::new(FieldCodec::new(&registry));
        let record = weapon_slot();
        let mut target = RecordValue::zeroed(&record);
        let result = marshaller.apply_record(&record, &mut target, &Value::from("x"));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].error.kind(), "TypeMismatch");
    }
}
