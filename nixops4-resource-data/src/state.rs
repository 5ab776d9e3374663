//! Persisted resource state.
//!
//! The flat attribute map is the persistence format shared with the state
//! store; see [`crate::key_path`] for how nested values are addressed in it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The last-known state of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceState {
    /// Provider-assigned identifier; empty when the resource does not exist
    #[serde(default)]
    pub id: String,
    /// Flat key-path to value map
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ResourceState {
    pub fn new(
        id: impl Into<String>,
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        ResourceState {
            id: id.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// State with attributes but no identifier.
    pub fn from_attributes(
        attributes: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self::new("", attributes)
    }
}
