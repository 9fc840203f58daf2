//! In-memory host for ClassBridge.
//!
//! Implements every collaborator seam of `classbridge-core` over plain data
//! loaded from a JSON fixture:
//! - `ClassRegistry` and `ClassResolver` over fixture classes plus one
//!   generated class per composite
//! - `AssetCatalog` listing the composites
//! - `CompositeStore` holding template instances, dirty flags and revisions
//!
//! # Example
//!
//! ```rust
//! use classbridge_core::{ClassRegistry, CompositeStore};
//! use classbridge_host::InMemoryHost;
//!
//! let host = InMemoryHost::from_json(r#"{
//!     "classes": [{"path": "/Script/Engine.Actor"}],
//!     "composites": [{"name": "Loadout", "parent": "/Script/Engine.Actor"}]
//! }"#).unwrap();
//!
//! assert!(host.find_by_path("/Game/Blueprints/Loadout.Loadout_C").is_some());
//! assert!(host.load("Loadout", "/Game/Blueprints").is_some());
//! ```

mod error;
mod fixture;
mod in_memory;
mod type_spec;

pub use error::HostError;
pub use fixture::{ClassSpec, CompositeSpec, Fixture, PropertySpec, RecordSpec};
pub use in_memory::InMemoryHost;
pub use type_spec::parse_kind;
