use classbridge_core::{ClassRegistryScanner, Error, ScanConfig, ScanFilters, Taxonomy, Value};
use classbridge_serde::TypedValue;

use crate::error::BridgeError;
use crate::params::{optional_bool, optional_str};
use crate::response::Response;
use crate::Host;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ClassKind {
    Native,
    Composite,
    All,
}

impl ClassKind {
    fn parse(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(ClassKind::Native),
            "composite" => Ok(ClassKind::Composite),
            "all" | "" => Ok(ClassKind::All),
            _ => Err(Error::InvalidParameter {
                name: "classKind".to_string(),
                message: format!("expected native, composite or all, found '{}'", s),
            }),
        }
    }

    fn native(self) -> bool {
        matches!(self, ClassKind::Native | ClassKind::All)
    }

    fn composite(self) -> bool {
        matches!(self, ClassKind::Composite | ClassKind::All)
    }
}

fn filters(params: &Value) -> Result<ScanFilters, Error> {
    let mut filters = ScanFilters::default()
        .ancestry(optional_str(params, "ancestryFilter")?.unwrap_or_default())
        .module(optional_str(params, "moduleFilter")?.unwrap_or_default())
        .path(optional_str(params, "pathFilter")?.unwrap_or_default())
        .include_engine_origin(optional_bool(params, "includeEngineOrigin", false)?)
        .exclude_stale(optional_bool(params, "excludeStaleInstances", true)?);

    if let Some(name) = optional_str(params, "taxonomyFilter")?.filter(|s| !s.is_empty()) {
        let taxonomy: Taxonomy = name.parse().map_err(|e| Error::InvalidParameter {
            name: "taxonomyFilter".to_string(),
            message: format!("{}", e),
        })?;
        filters = filters.taxonomy(taxonomy);
    }
    Ok(filters)
}

/// `scan_classes(classKind?, ancestryFilter?, moduleFilter?, pathFilter?,
/// taxonomyFilter?, includeEngineOrigin?, excludeStaleInstances?)`
pub(super) fn scan_classes<H: Host>(
    host: &H,
    config: &ScanConfig,
    params: &Value,
) -> Result<Response, BridgeError> {
    let kind = ClassKind::parse(optional_str(params, "classKind")?.unwrap_or("all"))?;
    let filters = filters(params)?;
    let scanner = ClassRegistryScanner::new(host, config);

    let native: Vec<_> = if kind.native() {
        scanner.scan_native(&filters).collect()
    } else {
        Vec::new()
    };
    let composite: Vec<_> = if kind.composite() {
        scanner.scan_composite(host, &filters).collect()
    } else {
        Vec::new()
    };

    Ok(Response::ok()
        .with("nativeCount", native.len())
        .with("compositeCount", composite.len())
        .with("native", Value::from_typed(&native).map_err(BridgeError::Encode)?)
        .with("composite", Value::from_typed(&composite).map_err(BridgeError::Encode)?))
}
