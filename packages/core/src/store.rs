//! Persistence collaborators: the asset catalog and the composite store.
//!
//! Both are owned by the host. The engine reads identities through the
//! catalog and mutates template instances it loaded from the store, then
//! hands them back for dirtying and recompilation.

use crate::class::ClassId;
use crate::error::CompileError;
use crate::object_path::ObjectPath;
use crate::slot::Instance;

/// Which persisted assets to list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetQuery {
    /// Package root, e.g. `/Game`.
    pub package_path: String,
    /// Include assets in sub-packages.
    pub recursive: bool,
}

impl AssetQuery {
    pub fn recursive(package_path: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            recursive: true,
        }
    }
}

/// One catalog row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetEntry {
    pub name: String,
    pub path: ObjectPath,
    /// Path of the declared parent class, if the asset records one.
    pub parent_class: Option<String>,
}

/// Lists composite definitions without loading them.
pub trait AssetCatalog {
    fn query(&self, query: &AssetQuery) -> Box<dyn Iterator<Item = AssetEntry> + '_>;
}

impl<T: AssetCatalog + ?Sized> AssetCatalog for &T {
    fn query(&self, query: &AssetQuery) -> Box<dyn Iterator<Item = AssetEntry> + '_> {
        (**self).query(query)
    }
}

/// A loaded composite definition.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeDefinition {
    pub name: String,
    pub package_path: String,
    pub path: ObjectPath,
    /// Declared parent class.
    pub parent: Option<ClassId>,
    /// Class generated from this definition by the last compile.
    pub generated_class: Option<ClassId>,
    /// Default-value object; the only thing the engine mutates.
    pub template: Instance,
}

/// Load, dirty and recompile composite definitions.
///
/// The marshallers never call this; the request layer does, after a
/// marshal has been applied to the loaded template.
pub trait CompositeStore {
    /// Load the definition named `name` inside `package_path`.
    fn load(&self, name: &str, package_path: &str) -> Option<CompositeDefinition>;

    /// Record that `definition`'s template changed.
    fn mark_dirty(&mut self, definition: &CompositeDefinition);

    /// Regenerate the class from the (dirty) definition.
    fn recompile(&mut self, definition: &CompositeDefinition) -> Result<(), CompileError>;
}
