//! Core ClassBridge: reflection marshalling and class discovery.
//!
//! This layer knows nothing about transports or persistence. It works against
//! a host through a handful of traits:
//! - `ClassRegistry`: read-only view of every known class descriptor
//! - `ClassResolver`: turns a path or name into a class reference
//! - `AssetCatalog`: lists persisted composite definitions
//! - `CompositeStore`: loads, dirties and recompiles composite definitions
//!
//! On top of those it provides:
//! - `FieldCodec`: one primitive field kind <-> one untyped `Value`
//! - `RecordMarshaller`: a keyed `Value` bag applied field by field to a record
//! - `ArrayPropertyMarshaller`: replace-semantics writes of array properties
//! - `PropertyLookup`: name -> typed descriptor, kind-checked before mutation
//! - `ClassRegistryScanner`: filtered single-pass discovery of classes and composites
//!
//! # Example
//!
//! ```rust,ignore
//! use classbridge_core::{ArrayPropertyMarshaller, FieldCodec, PropertyLookup, Value};
//!
//! let lookup = PropertyLookup::new(&host);
//! let array = lookup.expect_class_array(class_id, "AllowedWeapons")?;
//! let marshaller = ArrayPropertyMarshaller::new(FieldCodec::new(&host));
//! let result = marshaller.replace_array(&array, &mut template, &paths);
//! assert!(result.success());
//! ```

mod array;
mod class;
mod codec;
mod error;
mod lookup;
pub mod naming;
mod object_path;
mod property;
mod record;
mod result;
mod scan;
mod slot;
mod store;
pub mod taxonomy;
mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use array::ArrayPropertyMarshaller;
pub use class::{
    Ancestors, ClassDescriptor, ClassId, ClassOrigin, ClassRef, ClassRegistry, ClassResolver,
    RegistryExt,
};
pub use codec::FieldCodec;
pub use error::{CompileError, ElementKindTag, Error, FieldError};
pub use lookup::{ArrayProperty, OwnedProperty, PropertyLookup};
pub use object_path::{ObjectPath, PathError, SCRIPT_ROOT};
pub use property::{
    ElementKind, FieldDescriptor, PropertyDescriptor, PropertyFlags, PropertyKind, RecordType,
};
pub use record::RecordMarshaller;
pub use result::{ElementError, MarshalResult};
pub use scan::{
    ClassMatch, ClassRegistryScanner, CompositeMatch, CompositeScan, NativeScan, ScanConfig,
    ScanFilters,
};
pub use slot::{Instance, Name, RecordValue, SlotValue};
pub use store::{AssetCatalog, AssetEntry, AssetQuery, CompositeDefinition, CompositeStore};
pub use taxonomy::{Taxonomy, UnknownTaxonomy};
pub use value::Value;
