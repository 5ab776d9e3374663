//! Layered resolution of flat keys.
//!
//! Each source of attribute data (local writes, the provider's diff, the
//! persisted state) is a [`Layer`]. A [`LayeredReader`] asks its layers in
//! order and takes the first answer, per flat key.

use std::collections::{BTreeMap, BTreeSet};

use crate::{diff::ResourceDiff, key_path, state::ResourceState};

/// What a layer knows about a flat key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// The layer has a value for the key
    Value(&'a str),
    /// The layer has deliberately removed the key; lower layers are not asked
    Removed,
    /// The layer has nothing to say about the key
    Unknown,
}

/// A source of flat attribute data.
pub trait Layer {
    fn resolve(&self, key: &str) -> Resolved<'_>;

    /// All keys strictly underneath `prefix` that this layer may resolve.
    fn keys_under<'a>(&'a self, prefix: &str) -> Box<dyn Iterator<Item = &'a str> + 'a>;
}

impl Layer for ResourceState {
    fn resolve(&self, key: &str) -> Resolved<'_> {
        match self.attributes.get(key) {
            Some(v) => Resolved::Value(v),
            None => Resolved::Unknown,
        }
    }

    fn keys_under<'a>(&'a self, prefix: &str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        Box::new(key_path::keys_under(&self.attributes, prefix))
    }
}

impl Layer for ResourceDiff {
    fn resolve(&self, key: &str) -> Resolved<'_> {
        match self.attributes.get(key) {
            Some(a) if a.new_removed => Resolved::Removed,
            Some(a) => Resolved::Value(&a.new),
            None => Resolved::Unknown,
        }
    }

    fn keys_under<'a>(&'a self, prefix: &str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        Box::new(key_path::keys_under(&self.attributes, prefix))
    }
}

/// Pending local writes.
///
/// Every write replaces a whole subtree: the written key is remembered as a
/// replaced root, and keys under it that the write did not produce resolve as
/// removed, hiding whatever the diff or state had there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    values: BTreeMap<String, String>,
    replaced: BTreeSet<String>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the subtree at `root` with `entries`. All entries must lie at
    /// or under `root`.
    pub fn replace(&mut self, root: &str, entries: BTreeMap<String, String>) {
        debug_assert!(entries.keys().all(|k| key_path::is_within(k, root)));
        self.values.retain(|k, _| !key_path::is_within(k, root));
        // Roots under the new one are subsumed by it
        self.replaced.retain(|r| !key_path::is_within(r, root));
        if !self.covers(root) {
            self.replaced.insert(root.to_owned());
        }
        self.values.extend(entries);
    }

    /// Whether `key` lies in a subtree replaced by a write.
    fn covers(&self, key: &str) -> bool {
        self.replaced.iter().any(|r| key_path::is_within(key, r))
    }
}

impl Layer for Overlay {
    fn resolve(&self, key: &str) -> Resolved<'_> {
        match self.values.get(key) {
            Some(v) => Resolved::Value(v),
            None if self.covers(key) => Resolved::Removed,
            None => Resolved::Unknown,
        }
    }

    fn keys_under<'a>(&'a self, prefix: &str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        Box::new(key_path::keys_under(&self.values, prefix))
    }
}

/// First-match-wins resolution over a stack of layers, highest priority first.
#[derive(Clone, Default)]
pub struct LayeredReader<'a> {
    layers: Vec<&'a dyn Layer>,
}

impl<'a> LayeredReader<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer below the existing ones.
    pub fn with_layer(mut self, layer: &'a dyn Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add a layer below the existing ones, if present.
    pub fn with_optional_layer(self, layer: Option<&'a dyn Layer>) -> Self {
        match layer {
            Some(layer) => self.with_layer(layer),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        for layer in self.layers.iter().copied() {
            match layer.resolve(key) {
                Resolved::Value(v) => return Some(v),
                Resolved::Removed => return None,
                Resolved::Unknown => {}
            }
        }
        None
    }

    /// The keys strictly underneath `prefix` that resolve to a value in some
    /// layer, taking removals in higher layers into account.
    pub fn keys_under(&self, prefix: &str) -> BTreeSet<&'a str> {
        self.layers
            .iter()
            .copied()
            .flat_map(|layer| layer.keys_under(prefix))
            .filter(|k| self.get(k).is_some())
            .collect()
    }
}
