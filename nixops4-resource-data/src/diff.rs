//! Pending attribute changes, as computed by a provider.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::key_path;

/// The changes a provider plans to make to a resource. Only changed keys are
/// present; an absent key is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceDiff {
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrDiff>,
}

/// The change to a single flat key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttrDiff {
    #[serde(default)]
    pub old: String,
    #[serde(default)]
    pub new: String,
    /// Changing this key requires replacing the resource
    #[serde(default)]
    pub requires_new: bool,
    /// The key is removed; `new` is meaningless
    #[serde(default)]
    pub new_removed: bool,
}

impl AttrDiff {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        AttrDiff {
            old: old.into(),
            new: new.into(),
            requires_new: false,
            new_removed: false,
        }
    }

    pub fn requiring_new(mut self) -> Self {
        self.requires_new = true;
        self
    }

    pub fn removed(old: impl Into<String>) -> Self {
        AttrDiff {
            old: old.into(),
            new: String::new(),
            requires_new: false,
            new_removed: true,
        }
    }
}

impl ResourceDiff {
    pub fn new(attributes: impl IntoIterator<Item = (impl Into<String>, AttrDiff)>) -> Self {
        ResourceDiff {
            attributes: attributes.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Whether any change in the diff requires replacing the resource.
    pub fn requires_new(&self) -> bool {
        self.attributes.values().any(|a| a.requires_new)
    }

    /// Whether any change at or underneath `key` requires replacing the
    /// resource.
    pub fn requires_new_within(&self, key: &str) -> bool {
        self.attributes.get(key).is_some_and(|a| a.requires_new)
            || key_path::keys_under(&self.attributes, key)
                .any(|k| self.attributes[k].requires_new)
    }
}
