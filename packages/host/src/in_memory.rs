//! In-memory host built from a fixture.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use classbridge_core::{
    ArrayProperty, ArrayPropertyMarshaller, AssetCatalog, AssetEntry, AssetQuery, ClassDescriptor,
    ClassId, ClassOrigin, ClassRef, ClassRegistry, ClassResolver, CompileError,
    CompositeDefinition, CompositeStore, FieldCodec, Instance, ObjectPath, PropertyDescriptor,
    PropertyFlags, PropertyKind, PropertyLookup, RecordMarshaller, RegistryExt, SlotValue, Value,
};
use tracing::{debug, warn};

use crate::error::HostError;
use crate::fixture::{Fixture, PropertySpec};
use crate::type_spec::{build_records, parse_kind};

struct CompositeEntry {
    definition: CompositeDefinition,
    parent_path: Option<String>,
    compile_error: Option<String>,
    dirty: bool,
    revision: u32,
}

/// Class registry, resolver, asset catalog and composite store in one.
///
/// Every composite gets a generated class `{Name}_C` at
/// `{package}/{Name}.{Name}_C` whose parent is the composite's parent.
pub struct InMemoryHost {
    classes: Vec<ClassDescriptor>,
    by_path: HashMap<String, ClassId>,
    /// Keyed by composite object path.
    composites: BTreeMap<String, CompositeEntry>,
}

impl InMemoryHost {
    /// Load a fixture file.
    pub fn load_fixture(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        debug!("Reading fixture {}...", path.display());
        let text = fs::read_to_string(path).map_err(|source| HostError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, HostError> {
        let fixture: Fixture = serde_json::from_str(text)?;
        Self::from_fixture(&fixture)
    }

    pub fn from_fixture(fixture: &Fixture) -> Result<Self, HostError> {
        let records = build_records(&fixture.records)?;
        let properties = |specs: &[PropertySpec]| -> Result<Vec<PropertyDescriptor>, HostError> {
            specs
                .iter()
                .map(|spec| {
                    let kind = parse_kind(&spec.type_name, &records)?;
                    Ok(PropertyDescriptor::new(&spec.name, kind)
                        .with_category(&spec.category)
                        .with_flags(PropertyFlags {
                            editable: spec.editable,
                            blueprint_visible: spec.blueprint_visible,
                            read_only: spec.read_only,
                        }))
                })
                .collect()
        };

        let mut host = InMemoryHost {
            classes: Vec::new(),
            by_path: HashMap::new(),
            composites: BTreeMap::new(),
        };

        // Pass 1: allocate every class so parents may be declared in any order.
        let mut parents: Vec<(ClassId, String)> = Vec::new();
        for spec in &fixture.classes {
            let path = ObjectPath::parse(&spec.path)?;
            let id = host.register(
                path,
                ClassOrigin::Native,
                spec.transient,
                properties(&spec.properties)?,
            )?;
            if let Some(parent) = &spec.parent {
                parents.push((id, parent.clone()));
            }
        }
        let mut generated = Vec::new();
        for spec in &fixture.composites {
            let package = spec.package.trim_end_matches('/');
            let class_path =
                ObjectPath::parse(&format!("{}/{}.{}_C", package, spec.name, spec.name))?;
            let id = host.register(
                class_path,
                ClassOrigin::Composite,
                false,
                properties(&spec.variables)?,
            )?;
            match &spec.parent {
                Some(parent) => parents.push((id, parent.clone())),
                None => warn!(composite = %spec.name, "composite has no parent class"),
            }
            generated.push(id);
        }

        // Pass 2: link parents.
        for (id, parent) in parents {
            let parent_id = host.by_path.get(&parent).copied().ok_or_else(|| {
                HostError::UnknownClass {
                    path: parent.clone(),
                    referenced_by: host.classes[id.0].path.to_string(),
                }
            })?;
            host.classes[id.0].parent = Some(parent_id);
        }

        // Pass 3: build templates now that the registry is complete.
        let mut entries = Vec::new();
        for (spec, class_id) in fixture.composites.iter().zip(generated) {
            let package = spec.package.trim_end_matches('/').to_string();
            let path = ObjectPath::parse(&format!("{}/{}.{}", package, spec.name, spec.name))?;
            let template = host.seed_template(class_id, &spec.name, &spec.defaults)?;
            entries.push(CompositeEntry {
                definition: CompositeDefinition {
                    name: spec.name.clone(),
                    package_path: package,
                    path,
                    parent: host.classes[class_id.0].parent,
                    generated_class: Some(class_id),
                    template,
                },
                parent_path: spec.parent.clone(),
                compile_error: spec.compile_error.clone(),
                dirty: false,
                revision: 0,
            });
        }
        for entry in entries {
            host.composites
                .insert(entry.definition.path.to_string(), entry);
        }

        debug!(
            classes = host.classes.len(),
            composites = host.composites.len(),
            "loaded fixture"
        );
        Ok(host)
    }

    fn register(
        &mut self,
        path: ObjectPath,
        origin: ClassOrigin,
        transient: bool,
        properties: Vec<PropertyDescriptor>,
    ) -> Result<ClassId, HostError> {
        if self.by_path.contains_key(path.as_str()) {
            return Err(HostError::DuplicateClass {
                path: path.to_string(),
            });
        }
        let id = ClassId(self.classes.len());
        self.by_path.insert(path.to_string(), id);
        self.classes.push(ClassDescriptor {
            id,
            name: path.object_name().to_string(),
            path,
            parent: None,
            origin,
            transient,
            properties,
        });
        Ok(id)
    }

    /// Zero the template across the ancestry, then apply fixture defaults.
    fn seed_template(
        &self,
        class_id: ClassId,
        composite: &str,
        defaults: &BTreeMap<String, Value>,
    ) -> Result<Instance, HostError> {
        let class = &self.classes[class_id.0];
        let mut template = Instance::for_class(self, class);
        let lookup = PropertyLookup::new(self);
        let codec = FieldCodec::new(self);
        let invalid = |property: &str, message: String| HostError::InvalidDefault {
            composite: composite.to_string(),
            property: property.to_string(),
            message,
        };

        for (name, value) in defaults {
            let name = name.as_str();
            let property = lookup
                .resolve(class, name)
                .map_err(|e| invalid(name, e.to_string()))?;
            let kind = property.kind().clone();

            let errors = match &kind {
                PropertyKind::Array(_) => {
                    let element = lookup
                        .resolve_array_element_kind(&property)
                        .map_err(|e| invalid(name, e.to_string()))?;
                    let items = value.as_array().ok_or_else(|| {
                        invalid(name, format!("expected array, found {}", value.type_name()))
                    })?;
                    let array = ArrayProperty {
                        name: name.to_string(),
                        element,
                    };
                    ArrayPropertyMarshaller::new(codec)
                        .replace_array(&array, &mut template, items)
                        .error_messages()
                }
                PropertyKind::Record(record) => {
                    let slot = template.slot_mut(name, &kind);
                    match slot {
                        SlotValue::Record(target) => RecordMarshaller::new(codec)
                            .apply_record(record, target, value)
                            .error_messages(),
                        _ => vec![format!("slot of {} is not a record", name)],
                    }
                }
                scalar => {
                    let slot = template.slot_mut(name, scalar);
                    codec
                        .write(scalar, slot, value)
                        .err()
                        .map(|e| e.to_string())
                        .into_iter()
                        .collect()
                }
            };
            if !errors.is_empty() {
                return Err(invalid(name, errors.join("; ")));
            }
        }
        Ok(template)
    }

    fn composite_key(name: &str, package_path: &str) -> String {
        format!("{}/{}.{}", package_path.trim_end_matches('/'), name, name)
    }

    /// Whether the composite has template changes not yet recompiled.
    pub fn is_dirty(&self, name: &str, package_path: &str) -> bool {
        self.composites
            .get(&Self::composite_key(name, package_path))
            .is_some_and(|c| c.dirty)
    }

    /// Number of successful recompiles.
    pub fn revision(&self, name: &str, package_path: &str) -> Option<u32> {
        self.composites
            .get(&Self::composite_key(name, package_path))
            .map(|c| c.revision)
    }

    /// Read one template slot back as an untyped value.
    pub fn template_value(&self, name: &str, package_path: &str, property: &str) -> Option<Value> {
        let entry = self.composites.get(&Self::composite_key(name, package_path))?;
        let class = self.get(entry.definition.generated_class?)?;
        let owned = PropertyLookup::new(self).resolve(class, property).ok()?;
        let slot = entry.definition.template.get(property)?;
        Some(FieldCodec::new(self).read(owned.kind(), slot))
    }

    fn lookup_class(&self, path_or_name: &str) -> Option<&ClassDescriptor> {
        if let Some(id) = self.by_path.get(path_or_name) {
            return self.get(*id);
        }
        if path_or_name.starts_with('/') {
            // A package path without object part names the asset's class.
            let path = ObjectPath::parse(path_or_name).ok()?;
            if path.has_object() {
                return None;
            }
            let last = path.object_name();
            let generated = format!("{}.{}_C", path.package(), last);
            let plain = format!("{}.{}", path.package(), last);
            return [generated, plain]
                .iter()
                .find_map(|p| self.by_path.get(p))
                .and_then(|id| self.get(*id));
        }
        self.find_by_name(path_or_name)
    }
}

impl ClassRegistry for InMemoryHost {
    fn get(&self, id: ClassId) -> Option<&ClassDescriptor> {
        self.classes.get(id.0)
    }

    fn classes(&self) -> Box<dyn Iterator<Item = &ClassDescriptor> + '_> {
        Box::new(self.classes.iter())
    }

    fn find_by_path(&self, path: &str) -> Option<&ClassDescriptor> {
        self.by_path.get(path).and_then(|id| self.get(*id))
    }
}

impl ClassResolver for InMemoryHost {
    fn resolve(&self, path_or_name: &str) -> Option<ClassRef> {
        let class = self.lookup_class(path_or_name);
        if class.is_none() {
            debug!(path = path_or_name, "class did not resolve");
        }
        class.map(ClassRef::from)
    }

    fn is_subclass_of(&self, class: &ClassRef, ancestor: &str) -> bool {
        match (self.get(class.id), self.lookup_class(ancestor)) {
            (Some(class), Some(ancestor)) => self.is_child_of(class, ancestor.id),
            _ => false,
        }
    }
}

impl AssetCatalog for InMemoryHost {
    fn query(&self, query: &AssetQuery) -> Box<dyn Iterator<Item = AssetEntry> + '_> {
        let root = query.package_path.trim_end_matches('/').to_string();
        let recursive = query.recursive;
        Box::new(
            self.composites
                .values()
                .filter(move |c| {
                    if recursive {
                        c.definition.path.is_under(&root)
                    } else {
                        c.definition.package_path == root
                    }
                })
                .map(|c| AssetEntry {
                    name: c.definition.name.clone(),
                    path: c.definition.path.clone(),
                    parent_class: c.parent_path.clone(),
                }),
        )
    }
}

impl CompositeStore for InMemoryHost {
    fn load(&self, name: &str, package_path: &str) -> Option<CompositeDefinition> {
        self.composites
            .get(&Self::composite_key(name, package_path))
            .map(|c| c.definition.clone())
    }

    fn mark_dirty(&mut self, definition: &CompositeDefinition) {
        if let Some(entry) = self.composites.get_mut(definition.path.as_str()) {
            entry.definition.template = definition.template.clone();
            entry.dirty = true;
        }
    }

    fn recompile(&mut self, definition: &CompositeDefinition) -> Result<(), CompileError> {
        let Some(entry) = self.composites.get_mut(definition.path.as_str()) else {
            return Err(CompileError::new(
                &definition.name,
                format!("{} is not a known composite", definition.path),
            ));
        };
        if let Some(message) = &entry.compile_error {
            warn!(composite = %definition.name, %message, "compile failed");
            return Err(CompileError::new(&definition.name, message));
        }
        entry.dirty = false;
        entry.revision += 1;
        debug!(composite = %definition.name, revision = entry.revision, "recompiled");
        Ok(())
    }
}
