//! Fixture file schema.
//!
//! ```json
//! {
//!   "records": [{"name": "WeaponSlot", "fields": [{"name": "Damage", "type": "int"}]}],
//!   "classes": [{"path": "/Script/Engine.Actor", "parent": null}],
//!   "composites": [{
//!     "name": "Loadout",
//!     "package": "/Game/Blueprints",
//!     "parent": "/Script/Engine.Actor",
//!     "variables": [{"name": "Slots", "type": "array<record<WeaponSlot>>"}],
//!     "defaults": {"Slots": [{"Damage": 3}]}
//!   }]
//! }
//! ```

use std::collections::BTreeMap;

use classbridge_core::Value;
use serde::Deserialize;

/// Package used when a composite does not name one.
pub const DEFAULT_PACKAGE: &str = "/Game/Blueprints";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub records: Vec<RecordSpec>,
    pub classes: Vec<ClassSpec>,
    pub composites: Vec<CompositeSpec>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RecordSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<PropertySpec>,
}

/// One property or record field. `type` follows the grammar of `parse_kind`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "yes")]
    pub editable: bool,
    #[serde(default = "yes")]
    pub blueprint_visible: bool,
    #[serde(default)]
    pub read_only: bool,
}

fn yes() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClassSpec {
    pub path: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub transient: bool,
    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSpec {
    pub name: String,
    #[serde(default = "default_package")]
    pub package: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub variables: Vec<PropertySpec>,
    /// Initial template values, written through the field codecs.
    #[serde(default)]
    pub defaults: BTreeMap<String, Value>,
    /// When set, every recompile fails with this message.
    #[serde(default)]
    pub compile_error: Option<String>,
}

fn default_package() -> String {
    DEFAULT_PACKAGE.to_string()
}
