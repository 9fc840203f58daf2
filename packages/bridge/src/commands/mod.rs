//! Operation handlers.
//!
//! Each handler validates its parameters and resolves its property before
//! touching the target, so a request-level error never leaves a partial
//! write behind. Mutating handlers hand the template back to the store
//! through [`commit`] once the marshal is done.

mod arrays;
mod properties;
mod scan;

use classbridge_core::{ClassDescriptor, CompositeDefinition, Error, Value};
use tracing::warn;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::params::{optional_str, required_str};
use crate::request::Request;
use crate::response::Response;
use crate::Host;

pub(crate) fn dispatch<H: Host>(
    host: &mut H,
    config: &BridgeConfig,
    request: &Request,
) -> Result<Response, BridgeError> {
    let params = &request.parameters;
    match request.operation.as_str() {
        "ping" => Ok(Response::ok().with("message", "pong")),
        "scan_classes" => scan::scan_classes(&*host, &config.scan, params),
        "replace_class_array_property" => arrays::replace_class_array(host, config, params),
        "replace_record_array_property" => arrays::replace_record_array(host, config, params),
        "set_class_property" => properties::set_class_property(host, config, params),
        "get_properties" => properties::get_properties(&*host, config, params),
        other => Err(Error::UnknownOperation(other.to_string()).into()),
    }
}

/// Load the composite named by `targetName` (and optional `path`).
fn load_target<H: Host>(
    host: &H,
    config: &BridgeConfig,
    params: &Value,
) -> Result<CompositeDefinition, Error> {
    let name = required_str(params, "targetName")?;
    let package = optional_str(params, "path")?
        .filter(|p| !p.is_empty())
        .unwrap_or(&config.default_target_path);
    host.load(name, package).ok_or_else(|| Error::TargetNotFound {
        name: format!("{}/{}", package.trim_end_matches('/'), name),
    })
}

/// Class generated from `definition`, where properties are looked up.
fn target_class<'h, H: Host>(
    host: &'h H,
    definition: &CompositeDefinition,
) -> Result<&'h ClassDescriptor, Error> {
    definition
        .generated_class
        .and_then(|id| host.get(id))
        .ok_or_else(|| Error::TargetNotFound {
            name: definition.path.to_string(),
        })
}

/// Store the mutated template and recompile. A compile failure fails the
/// response but keeps the fields already reported.
fn commit<H: Host>(host: &mut H, definition: &CompositeDefinition, response: &mut Response) {
    host.mark_dirty(definition);
    if let Err(error) = host.recompile(definition) {
        warn!(target = %definition.name, %error, "recompile failed after marshal");
        response.fail(&BridgeError::Core(error.into()));
    }
}
