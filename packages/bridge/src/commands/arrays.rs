use classbridge_core::{ArrayPropertyMarshaller, FieldCodec, PropertyLookup, Value};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::params::{required_array, required_str};
use crate::response::Response;
use crate::Host;

use super::{commit, load_target, target_class};

/// `replace_class_array_property(targetName, propertyName, classPaths, path?)`
pub(super) fn replace_class_array<H: Host>(
    host: &mut H,
    config: &BridgeConfig,
    params: &Value,
) -> Result<Response, BridgeError> {
    let property_name = required_str(params, "propertyName")?;
    let class_paths = required_array(params, "classPaths")?;
    let mut target = load_target(&*host, config, params)?;

    let property = {
        let class = target_class(&*host, &target)?;
        PropertyLookup::new(&*host).expect_class_array(class, property_name)?
    };
    let result = ArrayPropertyMarshaller::new(FieldCodec::new(&*host)).replace_array(
        &property,
        &mut target.template,
        class_paths,
    );

    let mut response = Response::ok()
        .with_success(result.success())
        .with("targetName", target.name.as_str())
        .with("propertyName", property_name)
        .with("accepted", result.accepted)
        .with("errors", result.error_messages());
    commit(host, &target, &mut response);
    Ok(response)
}

/// `replace_record_array_property(targetName, propertyName, records, path?)`
pub(super) fn replace_record_array<H: Host>(
    host: &mut H,
    config: &BridgeConfig,
    params: &Value,
) -> Result<Response, BridgeError> {
    let property_name = required_str(params, "propertyName")?;
    let records = required_array(params, "records")?;
    let mut target = load_target(&*host, config, params)?;

    let property = {
        let class = target_class(&*host, &target)?;
        PropertyLookup::new(&*host).expect_record_array(class, property_name)?
    };
    let record_type_name = property.element.type_name();
    let result = ArrayPropertyMarshaller::new(FieldCodec::new(&*host)).replace_array(
        &property,
        &mut target.template,
        records,
    );

    let mut response = Response::ok()
        .with_success(result.success())
        .with("targetName", target.name.as_str())
        .with("propertyName", property_name)
        .with("recordTypeName", record_type_name)
        .with("accepted", result.accepted)
        .with("errors", result.error_messages());
    commit(host, &target, &mut response);
    Ok(response)
}
