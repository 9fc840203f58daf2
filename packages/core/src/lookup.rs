//! PropertyLookup: name -> typed descriptor, validated before any mutation.

use std::collections::BTreeSet;

use crate::class::{ClassDescriptor, ClassRegistry, RegistryExt};
use crate::error::{ElementKindTag, Error};
use crate::property::{ElementKind, PropertyDescriptor, PropertyKind};

/// A property together with the class that declares it.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedProperty {
    /// Name of the declaring class.
    pub owner: String,
    pub descriptor: PropertyDescriptor,
}

impl OwnedProperty {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.descriptor.kind
    }
}

/// An array property whose element kind has been checked.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayProperty {
    pub name: String,
    pub element: ElementKind,
}

impl ArrayProperty {
    /// The full declared kind, as stored on the instance.
    pub fn kind(&self) -> PropertyKind {
        let inner = match &self.element {
            ElementKind::Class { meta_class } => PropertyKind::Class {
                meta_class: meta_class.clone(),
            },
            ElementKind::Record(record) => PropertyKind::Record(record.clone()),
        };
        PropertyKind::array_of(inner)
    }
}

/// Resolves property names against a class and its ancestry.
pub struct PropertyLookup<'r, R: ?Sized> {
    registry: &'r R,
}

impl<'r, R: ClassRegistry + ?Sized> PropertyLookup<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Find `name` on `class`, walking up the ancestry. Nearest declaration wins.
    pub fn resolve(&self, class: &ClassDescriptor, name: &str) -> Result<OwnedProperty, Error> {
        std::iter::once(class)
            .chain(self.registry.ancestors(class))
            .find_map(|owner| {
                owner.declared_property(name).map(|descriptor| OwnedProperty {
                    owner: owner.name.clone(),
                    descriptor: descriptor.clone(),
                })
            })
            .ok_or_else(|| Error::PropertyNotFound {
                owner: class.name.clone(),
                property: name.to_string(),
            })
    }

    /// Element kind of an array property.
    pub fn resolve_array_element_kind(
        &self,
        property: &OwnedProperty,
    ) -> Result<ElementKind, Error> {
        let PropertyKind::Array(inner) = property.kind() else {
            return Err(Error::NotArrayProperty {
                property: property.name().to_string(),
                actual: property.kind().type_name(),
            });
        };
        match inner.as_ref() {
            PropertyKind::Class { meta_class } => Ok(ElementKind::Class {
                meta_class: meta_class.clone(),
            }),
            PropertyKind::Record(record) => Ok(ElementKind::Record(record.clone())),
            other => Err(Error::UnsupportedElementKind {
                property: property.name().to_string(),
                kind: other.type_name(),
            }),
        }
    }

    /// Resolve `name` and require an array of class references.
    pub fn expect_class_array(
        &self,
        class: &ClassDescriptor,
        name: &str,
    ) -> Result<ArrayProperty, Error> {
        self.expect_array(class, name, ElementKindTag::ClassReference)
    }

    /// Resolve `name` and require an array of records.
    pub fn expect_record_array(
        &self,
        class: &ClassDescriptor,
        name: &str,
    ) -> Result<ArrayProperty, Error> {
        self.expect_array(class, name, ElementKindTag::Record)
    }

    fn expect_array(
        &self,
        class: &ClassDescriptor,
        name: &str,
        expected: ElementKindTag,
    ) -> Result<ArrayProperty, Error> {
        let property = self.resolve(class, name)?;
        let element = self.resolve_array_element_kind(&property)?;
        let actual = match &element {
            ElementKind::Class { .. } => ElementKindTag::ClassReference,
            ElementKind::Record(_) => ElementKindTag::Record,
        };
        if actual != expected {
            return Err(Error::WrongElementKind {
                property: name.to_string(),
                expected,
                actual: element.type_name(),
            });
        }
        Ok(ArrayProperty {
            name: name.to_string(),
            element,
        })
    }

    /// Resolve `name` and require a single class-reference property.
    pub fn expect_class_property(
        &self,
        class: &ClassDescriptor,
        name: &str,
    ) -> Result<OwnedProperty, Error> {
        let property = self.resolve(class, name)?;
        match property.kind() {
            PropertyKind::Class { .. } => Ok(property),
            other => Err(Error::KindMismatch {
                property: name.to_string(),
                expected: "class-reference",
                actual: other.type_name(),
            }),
        }
    }

    /// Every property visible on `class`, own declarations first.
    pub fn properties(
        &self,
        class: &ClassDescriptor,
        include_inherited: bool,
    ) -> Vec<OwnedProperty> {
        let mut seen = BTreeSet::new();
        let owners: Box<dyn Iterator<Item = &ClassDescriptor> + '_> = if include_inherited {
            Box::new(std::iter::once(class).chain(self.registry.ancestors(class)))
        } else {
            Box::new(std::iter::once(class))
        };

        let mut out = Vec::new();
        for owner in owners {
            for descriptor in &owner.properties {
                if seen.insert(descriptor.name.clone()) {
                    out.push(OwnedProperty {
                        owner: owner.name.clone(),
                        descriptor: descriptor.clone(),
                    });
                }
            }
        }
        out
    }
}
