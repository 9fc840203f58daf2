//! In-crate fixture host for unit tests.

use crate::class::{
    ClassDescriptor, ClassId, ClassOrigin, ClassRef, ClassRegistry, ClassResolver, RegistryExt,
};
use crate::object_path::ObjectPath;
use crate::property::PropertyDescriptor;
use crate::store::{AssetCatalog, AssetEntry, AssetQuery};

#[derive(Default)]
pub(crate) struct TestRegistry {
    classes: Vec<ClassDescriptor>,
    assets: Vec<AssetEntry>,
}

impl TestRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a class under `path`. The parent must already be registered.
    pub(crate) fn class(&mut self, path: &str, parent: Option<&str>) -> ClassId {
        let path = ObjectPath::parse(path).expect("valid class path");
        let parent = parent.map(|p| self.find_by_path(p).expect("parent registered").id);
        let id = ClassId(self.classes.len());
        let name = path.object_name().to_string();
        let origin = if name.ends_with("_C") {
            ClassOrigin::Composite
        } else {
            ClassOrigin::Native
        };
        self.classes.push(ClassDescriptor {
            id,
            name,
            path,
            parent,
            origin,
            transient: false,
            properties: Vec::new(),
        });
        id
    }

    pub(crate) fn set_parent(&mut self, class: ClassId, parent: ClassId) {
        self.classes[class.0].parent = Some(parent);
    }

    pub(crate) fn property(&mut self, class: ClassId, property: PropertyDescriptor) {
        self.classes[class.0].properties.push(property);
    }

    pub(crate) fn asset(&mut self, name: &str, path: &str, parent: Option<&str>) {
        self.assets.push(AssetEntry {
            name: name.to_string(),
            path: ObjectPath::parse(path).expect("valid asset path"),
            parent_class: parent.map(str::to_string),
        });
    }

    fn lookup(&self, path_or_name: &str) -> Option<&ClassDescriptor> {
        self.find_by_path(path_or_name)
            .or_else(|| self.find_by_name(path_or_name))
    }
}

impl ClassRegistry for TestRegistry {
    fn get(&self, id: ClassId) -> Option<&ClassDescriptor> {
        self.classes.get(id.0)
    }

    fn classes(&self) -> Box<dyn Iterator<Item = &ClassDescriptor> + '_> {
        Box::new(self.classes.iter())
    }
}

impl ClassResolver for TestRegistry {
    fn resolve(&self, path_or_name: &str) -> Option<ClassRef> {
        self.lookup(path_or_name).map(ClassRef::from)
    }

    fn is_subclass_of(&self, class: &ClassRef, ancestor: &str) -> bool {
        match (self.get(class.id), self.lookup(ancestor)) {
            (Some(class), Some(ancestor)) => self.is_child_of(class, ancestor.id),
            _ => false,
        }
    }
}

impl AssetCatalog for TestRegistry {
    fn query(&self, query: &AssetQuery) -> Box<dyn Iterator<Item = AssetEntry> + '_> {
        let root = query.package_path.clone();
        let recursive = query.recursive;
        Box::new(
            self.assets
                .iter()
                .filter(move |a| {
                    if recursive {
                        a.path.is_under(&root)
                    } else {
                        a.path
                            .package()
                            .rsplit_once('/')
                            .is_some_and(|(dir, _)| dir == root.trim_end_matches('/'))
                    }
                })
                .cloned(),
        )
    }
}
