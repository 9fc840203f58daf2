use classbridge_core::{Error, FieldCodec, FieldError, PropertyLookup, Value};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::params::{optional_bool, optional_str, required_key, required_str};
use crate::response::Response;
use crate::Host;

use super::{commit, load_target, target_class};

/// `set_class_property(targetName, propertyName, classPath, path?)`
///
/// `classPath: null` clears the reference. A path the resolver cannot find
/// is reported as `ClassNotFound` rather than a failed write.
pub(super) fn set_class_property<H: Host>(
    host: &mut H,
    config: &BridgeConfig,
    params: &Value,
) -> Result<Response, BridgeError> {
    let property_name = required_str(params, "propertyName")?;
    let class_path = required_key(params, "classPath")?;
    let mut target = load_target(&*host, config, params)?;

    let property = {
        let class = target_class(&*host, &target)?;
        PropertyLookup::new(&*host).expect_class_property(class, property_name)?
    };
    let codec = FieldCodec::new(&*host);
    let slot = target.template.slot_mut(property_name, property.kind());
    codec
        .write(property.kind(), slot, class_path)
        .map_err(|source| match source {
            FieldError::ClassNotFound { path } => Error::ClassNotFound { path },
            source => Error::PropertySetFailed {
                property: property_name.to_string(),
                source,
            },
        })?;
    let stored = codec.read(property.kind(), slot);

    let mut response = Response::ok()
        .with("targetName", target.name.as_str())
        .with("propertyName", property_name)
        .with("classPath", stored);
    commit(host, &target, &mut response);
    Ok(response)
}

/// `get_properties(targetName, path?, includeInherited?, categoryFilter?)`
///
/// Lists editable or blueprint-visible properties with their template values.
pub(super) fn get_properties<H: Host>(
    host: &H,
    config: &BridgeConfig,
    params: &Value,
) -> Result<Response, BridgeError> {
    let include_inherited = optional_bool(params, "includeInherited", true)?;
    let category_filter = optional_str(params, "categoryFilter")?.unwrap_or_default();
    let target = load_target(host, config, params)?;
    let class = target_class(host, &target)?;
    let codec = FieldCodec::new(host);

    let properties: Vec<Value> = PropertyLookup::new(host)
        .properties(class, include_inherited)
        .into_iter()
        .filter(|p| p.descriptor.flags.editable || p.descriptor.flags.blueprint_visible)
        .filter(|p| p.descriptor.category.contains(category_filter))
        .map(|p| {
            let default_value = target
                .template
                .get(p.name())
                .map(|slot| codec.read(p.kind(), slot))
                .unwrap_or_default();
            let flags = p.descriptor.flags;
            let mut entry = Value::map();
            entry.insert("name", p.name());
            entry.insert("type", p.kind().type_name());
            entry.insert("category", p.descriptor.category.as_str());
            entry.insert("ownerClass", p.owner.as_str());
            entry.insert("isEditable", flags.editable);
            entry.insert("isBlueprintVisible", flags.blueprint_visible);
            entry.insert("isReadOnly", flags.read_only);
            entry.insert("defaultValue", default_value);
            entry
        })
        .collect();

    Ok(Response::ok()
        .with("targetName", target.name.as_str())
        .with("total", properties.len())
        .with("properties", properties))
}
