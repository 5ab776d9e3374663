//! Typed access to resource attributes stored as flat key-path maps.
//!
//! A resource provider sees three sources of attribute data while it
//! reconciles a resource: the [`ResourceState`] persisted after the previous
//! run, the [`ResourceDiff`] planned for this run, and its own writes.
//! [`ResourceData`] layers these per flat key, decodes them according to the
//! resource's [`Schema`]s and serializes the outcome into a new state.
//!
//! ```
//! use nixops4_resource_data::{ResourceData, ResourceState, Schema, SchemaMap, Value};
//!
//! let schema = SchemaMap::from([("ports".to_owned(), Schema::list(Schema::int()).required())]);
//! let state = ResourceState::from_attributes([("ports.#", "2"), ("ports.0", "80"), ("ports.1", "443")]);
//!
//! let mut data = ResourceData::new(&schema, Some(&state), None).unwrap();
//! data.set("ports.1", 8443).unwrap();
//! assert_eq!(data.get("ports").unwrap(), Value::from(vec![80, 8443]));
//! assert!(data.has_change("ports").unwrap());
//! ```

pub mod codec;
pub mod diff;
pub mod error;
pub mod key_path;
pub mod lookup;
pub mod resource_data;
pub mod schema;
pub mod state;
pub mod value;

pub use diff::{AttrDiff, ResourceDiff};
pub use error::{Error, Result};
pub use lookup::{LayeredReader, Overlay};
pub use resource_data::ResourceData;
pub use schema::{validate_schema_map, Elem, Resource, Schema, SchemaMap, ValueType};
pub use state::ResourceState;
pub use value::Value;
