//! Class descriptors and the read-only registry seams.

use crate::object_path::ObjectPath;
use crate::property::PropertyDescriptor;

/// Upper bound on parent links followed from one class.
///
/// Registries are host-owned; a corrupt parent chain must not hang a scan.
const MAX_ANCESTRY_DEPTH: usize = 256;

/// Handle of a class inside one registry.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClassId(pub usize);

/// How a class came to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassOrigin {
    /// Defined natively by a module.
    Native,
    /// Generated from a composite definition.
    Composite,
}

/// Static definition of a class: identity, ancestry link and declared properties.
///
/// Descriptors are created by the host; the engine only ever reads them.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassDescriptor {
    pub id: ClassId,
    pub name: String,
    pub path: ObjectPath,
    /// Single-parent link into the owning registry.
    pub parent: Option<ClassId>,
    pub origin: ClassOrigin,
    /// Marks stale or regenerated duplicates of a canonical class.
    pub transient: bool,
    /// Properties declared on this class (not including inherited ones).
    pub properties: Vec<PropertyDescriptor>,
}

impl ClassDescriptor {
    pub fn module(&self) -> Option<&str> {
        self.path.module()
    }

    pub fn is_composite(&self) -> bool {
        self.origin == ClassOrigin::Composite
    }

    /// Find a property declared directly on this class.
    pub fn declared_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A resolved class, as stored in class-reference slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRef {
    pub id: ClassId,
    pub name: String,
    pub path: ObjectPath,
}

impl From<&ClassDescriptor> for ClassRef {
    fn from(class: &ClassDescriptor) -> Self {
        ClassRef {
            id: class.id,
            name: class.name.clone(),
            path: class.path.clone(),
        }
    }
}

/// Read-only view of every class the host knows about.
///
/// Iteration order is whatever the host provides; callers must not rely on it.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `&dyn ClassRegistry`.
pub trait ClassRegistry {
    /// Look up a class by handle.
    fn get(&self, id: ClassId) -> Option<&ClassDescriptor>;

    /// Walk every registered class once.
    fn classes(&self) -> Box<dyn Iterator<Item = &ClassDescriptor> + '_>;

    /// Find a class by its full object path.
    fn find_by_path(&self, path: &str) -> Option<&ClassDescriptor> {
        self.classes().find(|c| c.path.as_str() == path)
    }

    /// Find a class by its short name.
    fn find_by_name(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes().find(|c| c.name == name)
    }
}

/// Turns a path or name into a class reference.
///
/// Resolution may load assets on the host side. The engine calls it at most
/// once per element and never retries.
pub trait ClassResolver {
    fn resolve(&self, path_or_name: &str) -> Option<ClassRef>;

    /// Check `class` against an ancestor given by path or name.
    ///
    /// A class counts as its own subclass.
    fn is_subclass_of(&self, class: &ClassRef, ancestor: &str) -> bool;
}

/// Ancestry helpers available on every registry.
pub trait RegistryExt: ClassRegistry {
    /// Iterate the parent chain of `class`, nearest parent first.
    fn ancestors<'a>(&'a self, class: &'a ClassDescriptor) -> Ancestors<'a, Self> {
        Ancestors {
            registry: self,
            next: class.parent,
            remaining: MAX_ANCESTRY_DEPTH,
        }
    }

    fn parent_of(&self, class: &ClassDescriptor) -> Option<&ClassDescriptor> {
        class.parent.and_then(|id| self.get(id))
    }

    /// True if `class` is `ancestor` or descends from it.
    fn is_child_of(&self, class: &ClassDescriptor, ancestor: ClassId) -> bool {
        class.id == ancestor || self.ancestors(class).any(|c| c.id == ancestor)
    }

    /// Like `is_child_of`, with the ancestor given by object path.
    ///
    /// An ancestor that is not registered matches nothing.
    fn is_child_of_path(&self, class: &ClassDescriptor, ancestor: &str) -> bool {
        match self.find_by_path(ancestor) {
            Some(anchor) => self.is_child_of(class, anchor.id),
            None => false,
        }
    }
}

impl<R: ClassRegistry + ?Sized> RegistryExt for R {}

/// Iterator over a class's ancestry chain.
pub struct Ancestors<'a, R: ?Sized> {
    registry: &'a R,
    next: Option<ClassId>,
    remaining: usize,
}

impl<'a, R: ClassRegistry + ?Sized> Iterator for Ancestors<'a, R> {
    type Item = &'a ClassDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let class = self.registry.get(self.next?)?;
        self.next = class.parent;
        Some(class)
    }
}

// Blanket implementations for references and boxes

impl<T: ClassRegistry + ?Sized> ClassRegistry for &T {
    fn get(&self, id: ClassId) -> Option<&ClassDescriptor> {
        (**self).get(id)
    }

    fn classes(&self) -> Box<dyn Iterator<Item = &ClassDescriptor> + '_> {
        (**self).classes()
    }

    fn find_by_path(&self, path: &str) -> Option<&ClassDescriptor> {
        (**self).find_by_path(path)
    }

    fn find_by_name(&self, name: &str) -> Option<&ClassDescriptor> {
        (**self).find_by_name(name)
    }
}

impl<T: ClassRegistry + ?Sized> ClassRegistry for Box<T> {
    fn get(&self, id: ClassId) -> Option<&ClassDescriptor> {
        self.as_ref().get(id)
    }

    fn classes(&self) -> Box<dyn Iterator<Item = &ClassDescriptor> + '_> {
        self.as_ref().classes()
    }

    fn find_by_path(&self, path: &str) -> Option<&ClassDescriptor> {
        self.as_ref().find_by_path(path)
    }

    fn find_by_name(&self, name: &str) -> Option<&ClassDescriptor> {
        self.as_ref().find_by_name(name)
    }
}

impl<T: ClassResolver + ?Sized> ClassResolver for &T {
    fn resolve(&self, path_or_name: &str) -> Option<ClassRef> {
        (**self).resolve(path_or_name)
    }

    fn is_subclass_of(&self, class: &ClassRef, ancestor: &str) -> bool {
        (**self).is_subclass_of(class, ancestor)
    }
}

impl<T: ClassResolver + ?Sized> ClassResolver for Box<T> {
    fn resolve(&self, path_or_name: &str) -> Option<ClassRef> {
        self.as_ref().resolve(path_or_name)
    }

    fn is_subclass_of(&self, class: &ClassRef, ancestor: &str) -> bool {
        self.as_ref().is_subclass_of(class, ancestor)
    }
}
