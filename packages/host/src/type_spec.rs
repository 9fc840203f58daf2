//! Property type grammar used by fixtures.
//!
//! ```text
//! int | int32 | float | double | bool | string | name
//! class | class<MetaClassPath>
//! record<RecordName>
//! array<Inner>
//! ```
//!
//! Anything else becomes `PropertyKind::Unsupported` carrying the spelling.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use classbridge_core::{FieldDescriptor, PropertyKind, RecordType};

use crate::error::HostError;
use crate::fixture::RecordSpec;

/// Parse a type spelling, with `record<...>` resolved through `records`.
pub fn parse_kind(
    spec: &str,
    records: &BTreeMap<String, Arc<RecordType>>,
) -> Result<PropertyKind, HostError> {
    let spec = spec.trim();
    if let Some(inner) = generic_arg(spec, "array") {
        return Ok(PropertyKind::array_of(parse_kind(inner, records)?));
    }
    if let Some(name) = generic_arg(spec, "record") {
        return records
            .get(name)
            .cloned()
            .map(PropertyKind::Record)
            .ok_or_else(|| HostError::UnknownRecord {
                name: name.to_string(),
            });
    }
    if let Some(meta) = generic_arg(spec, "class") {
        return Ok(PropertyKind::class(Some(meta)));
    }
    Ok(match spec.to_ascii_lowercase().as_str() {
        "int" | "int32" => PropertyKind::Int,
        "float" => PropertyKind::Float,
        "double" => PropertyKind::Double,
        "bool" => PropertyKind::Bool,
        "string" => PropertyKind::Str,
        "name" => PropertyKind::Name,
        "class" => PropertyKind::class(None),
        _ => PropertyKind::Unsupported(spec.to_string()),
    })
}

/// `array<int>` with head `array` yields `int`.
fn generic_arg<'s>(spec: &'s str, head: &str) -> Option<&'s str> {
    let rest = spec.strip_prefix(head)?.strip_prefix('<')?;
    let inner = rest.strip_suffix('>')?.trim();
    (!inner.is_empty()).then_some(inner)
}

/// Build every record type, resolving references between records.
pub(crate) fn build_records(
    specs: &[RecordSpec],
) -> Result<BTreeMap<String, Arc<RecordType>>, HostError> {
    let by_name: BTreeMap<&str, &RecordSpec> =
        specs.iter().map(|s| (s.name.as_str(), s)).collect();
    let mut built = BTreeMap::new();
    let mut in_progress = BTreeSet::new();
    for spec in specs {
        build_record(&spec.name, &by_name, &mut built, &mut in_progress)?;
    }
    Ok(built)
}

fn build_record(
    name: &str,
    by_name: &BTreeMap<&str, &RecordSpec>,
    built: &mut BTreeMap<String, Arc<RecordType>>,
    in_progress: &mut BTreeSet<String>,
) -> Result<Arc<RecordType>, HostError> {
    if let Some(done) = built.get(name) {
        return Ok(done.clone());
    }
    let spec = by_name.get(name).ok_or_else(|| HostError::UnknownRecord {
        name: name.to_string(),
    })?;
    if !in_progress.insert(name.to_string()) {
        return Err(HostError::RecordCycle {
            name: name.to_string(),
        });
    }

    // Dependencies first, so parse_kind finds them in `built`.
    for field in &spec.fields {
        if let Some(dependency) = record_dependency(&field.type_name) {
            build_record(dependency, by_name, built, in_progress)?;
        }
    }
    let fields = spec
        .fields
        .iter()
        .map(|f| Ok(FieldDescriptor::new(&f.name, parse_kind(&f.type_name, built)?)))
        .collect::<Result<Vec<_>, HostError>>()?;

    in_progress.remove(name);
    let record = Arc::new(RecordType::new(name, fields));
    built.insert(name.to_string(), record.clone());
    Ok(record)
}

/// Name of the record a type spelling refers to, looking through arrays.
fn record_dependency(spec: &str) -> Option<&str> {
    let spec = spec.trim();
    generic_arg(spec, "array")
        .and_then(record_dependency)
        .or_else(|| generic_arg(spec, "record"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::PropertySpec;

    fn field(name: &str, type_name: &str) -> PropertySpec {
        PropertySpec {
            name: name.to_string(),
            type_name: type_name.to_string(),
            category: String::new(),
            editable: true,
            blueprint_visible: true,
            read_only: false,
        }
    }

    #[test]
    fn scalars_and_generics() {
        let records = BTreeMap::new();
        assert_eq!(parse_kind("int32", &records).unwrap(), PropertyKind::Int);
        assert_eq!(parse_kind(" Bool ", &records).unwrap(), PropertyKind::Bool);
        assert_eq!(
            parse_kind("class</Script/Engine.Actor>", &records).unwrap(),
            PropertyKind::class(Some("/Script/Engine.Actor"))
        );
        assert_eq!(
            parse_kind("array<class>", &records).unwrap(),
            PropertyKind::array_of(PropertyKind::class(None))
        );
        assert_eq!(
            parse_kind("map<name,int>", &records).unwrap(),
            PropertyKind::Unsupported("map<name,int>".to_string())
        );
    }

    #[test]
    fn unknown_record_is_an_error() {
        let err = parse_kind("record<Nope>", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, HostError::UnknownRecord { .. }));
    }

    #[test]
    fn records_resolve_out_of_order() {
        let specs = vec![
            RecordSpec {
                name: "Unit".to_string(),
                fields: vec![field("Stats", "record<Stats>"), field("Log", "array<record<Stats>>")],
            },
            RecordSpec {
                name: "Stats".to_string(),
                fields: vec![field("Speed", "float")],
            },
        ];
        let records = build_records(&specs).unwrap();
        let unit = &records["Unit"];
        assert_eq!(unit.fields[0].kind.type_name(), "Stats");
        assert_eq!(unit.fields[1].kind.type_name(), "TArray<Stats>");
    }

    #[test]
    fn record_cycles_are_rejected() {
        let specs = vec![
            RecordSpec {
                name: "A".to_string(),
                fields: vec![field("B", "record<B>")],
            },
            RecordSpec {
                name: "B".to_string(),
                fields: vec![field("A", "record<A>")],
            },
        ];
        assert!(matches!(
            build_records(&specs),
            Err(HostError::RecordCycle { .. })
        ));
    }
}
