//! ArrayPropertyMarshaller: replace the contents of an array property.
//!
//! Replace, never merge: the array is cleared before anything is written.
//! The two element kinds fail differently:
//! - class references: a failed element is dropped, so the array can end up
//!   shorter than the input
//! - records: the array is pre-sized to the input length, so a record whose
//!   fields all fail still occupies its (zeroed) slot

use tracing::debug;

use crate::codec::FieldCodec;
use crate::error::FieldError;
use crate::lookup::ArrayProperty;
use crate::property::{ElementKind, RecordType};
use crate::record::RecordMarshaller;
use crate::result::{ElementError, MarshalResult};
use crate::slot::{Instance, RecordValue, SlotValue};
use crate::value::Value;

/// Writes whole arrays of class references or records.
#[derive(Clone, Copy)]
pub struct ArrayPropertyMarshaller<'r> {
    codec: FieldCodec<'r>,
}

impl<'r> ArrayPropertyMarshaller<'r> {
    pub fn new(codec: FieldCodec<'r>) -> Self {
        Self { codec }
    }

    /// Replace `property` on `target` with `items`.
    ///
    /// Persistence is the caller's business: dirtying and recompiling the
    /// owning definition happens outside the marshaller.
    pub fn replace_array(
        &self,
        property: &ArrayProperty,
        target: &mut Instance,
        items: &[Value],
    ) -> MarshalResult {
        let slot = target.slot_mut(&property.name, &property.kind());
        *slot = SlotValue::Array(Vec::with_capacity(items.len()));
        let SlotValue::Array(array) = slot else {
            return MarshalResult::new();
        };

        match &property.element {
            ElementKind::Class { meta_class } => {
                self.fill_classes(&property.name, meta_class.as_deref(), array, items)
            }
            ElementKind::Record(record) => self.fill_records(record, array, items),
        }
    }

    fn fill_classes(
        &self,
        property: &str,
        meta_class: Option<&str>,
        array: &mut Vec<SlotValue>,
        items: &[Value],
    ) -> MarshalResult {
        let mut result = MarshalResult::new();
        for (index, item) in items.iter().enumerate() {
            let resolved = match item.as_str() {
                Some(path) => self.codec.resolve_class(meta_class, path),
                None => Err(FieldError::mismatch("string", item)),
            };
            match resolved {
                Ok(class) => {
                    array.push(SlotValue::Class(Some(class)));
                    result.accepted += 1;
                }
                Err(error) => {
                    debug!(property, index, %error, "dropping class reference element");
                    result.push_error(ElementError::element(index, error));
                }
            }
        }
        result
    }

    fn fill_records(
        &self,
        record: &RecordType,
        array: &mut Vec<SlotValue>,
        items: &[Value],
    ) -> MarshalResult {
        array.resize(items.len(), SlotValue::Record(RecordValue::zeroed(record)));

        let marshaller = RecordMarshaller::new(self.codec);
        let mut result = MarshalResult::new();
        for (index, (item, slot)) in items.iter().zip(array.iter_mut()).enumerate() {
            if !item.is_map() {
                // The slot stays allocated but the element is not counted.
                debug!(record = %record.name, index, "record element is not an object");
                let error = FieldError::mismatch("object", item);
                result.push_error(ElementError::element(index, error));
                continue;
            }
            let SlotValue::Record(target) = slot else {
                continue;
            };
            let applied = marshaller.apply_record(record, target, item);
            result
                .errors
                .extend(applied.errors.into_iter().map(|e| e.at(index)));
            result.accepted += 1;
        }
        result
    }
}
