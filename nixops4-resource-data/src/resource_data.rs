use crate::{
    codec,
    diff::ResourceDiff,
    error::Result,
    lookup::{Layer, LayeredReader, Overlay},
    schema::{validate_schema_map, SchemaMap},
    state::ResourceState,
    value::Value,
};

/// A typed view of one resource's attributes, during one reconciliation pass.
///
/// Reads resolve each flat key from, in order of priority:
/// 1. values written with [`ResourceData::set`],
/// 2. the new values of the diff,
/// 3. the persisted state.
///
/// Writes are kept local until [`ResourceData::state`] serializes everything
/// into a new [`ResourceState`]. Neither the diff nor the state is modified.
#[derive(Debug, Clone)]
pub struct ResourceData<'a> {
    schema: &'a SchemaMap,
    state: Option<&'a ResourceState>,
    diff: Option<&'a ResourceDiff>,
    overlay: Overlay,
    new_id: Option<String>,
}

impl<'a> ResourceData<'a> {
    /// Fails if the schema is structurally invalid.
    pub fn new(
        schema: &'a SchemaMap,
        state: Option<&'a ResourceState>,
        diff: Option<&'a ResourceDiff>,
    ) -> Result<Self> {
        validate_schema_map(schema, "")?;
        Ok(ResourceData {
            schema,
            state,
            diff,
            overlay: Overlay::new(),
            new_id: None,
        })
    }

    fn state_layer(&self) -> Option<&'a dyn Layer> {
        self.state.map(|s| s as &dyn Layer)
    }

    fn diff_layer(&self) -> Option<&'a dyn Layer> {
        self.diff.map(|d| d as &dyn Layer)
    }

    /// Overlay, then diff, then state.
    fn reader(&self) -> LayeredReader<'_> {
        LayeredReader::new()
            .with_layer(&self.overlay)
            .with_optional_layer(self.diff_layer())
            .with_optional_layer(self.state_layer())
    }

    /// The persisted state only.
    fn old_reader(&self) -> LayeredReader<'_> {
        LayeredReader::new().with_optional_layer(self.state_layer())
    }

    /// The current value at `key`. The empty key reads the whole resource as a
    /// map of attribute values.
    ///
    /// Unset primitives read as [`Value::Null`], unset lists as an empty list
    /// and unset maps as an empty map.
    pub fn get(&self, key: &str) -> Result<Value> {
        codec::unflatten(self.schema, key, &self.reader())
    }

    /// Like [`ResourceData::get`], but `None` when the value is unset or
    /// empty.
    pub fn get_ok(&self, key: &str) -> Result<Option<Value>> {
        let v = self.get(key)?;
        Ok(if v.is_empty() { None } else { Some(v) })
    }

    /// The value at `key` in the persisted state, and the current value.
    pub fn get_change(&self, key: &str) -> Result<(Value, Value)> {
        let old = codec::unflatten(self.schema, key, &self.old_reader())?;
        let new = self.get(key)?;
        Ok((old, new))
    }

    /// Whether the current value at `key` differs from the persisted one.
    pub fn has_change(&self, key: &str) -> Result<bool> {
        let (old, new) = self.get_change(key)?;
        Ok(old != new)
    }

    /// Whether the diff marks any change at or under `key` as requiring
    /// replacement of the resource.
    pub fn requires_new(&self, key: &str) -> bool {
        self.diff.is_some_and(|d| d.requires_new_within(key))
    }

    /// Write `value` at `key`, replacing the whole subtree there.
    ///
    /// The value is checked against the schema first; if any part of it does
    /// not fit, nothing is written. List indices in `key` must address
    /// existing elements; to grow a list, set the whole list.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let entries = codec::flatten(self.schema, key, &value)?;
        codec::check_indices(self.schema, key, &self.reader())?;
        tracing::trace!(key, entries = entries.len(), "set attribute");
        self.overlay.replace(key, entries);
        Ok(())
    }

    /// The resource identifier: the one set with [`ResourceData::set_id`],
    /// or else the one from the persisted state.
    pub fn id(&self) -> &str {
        match (&self.new_id, self.state) {
            (Some(id), _) => id,
            (None, Some(state)) => &state.id,
            (None, None) => "",
        }
    }

    /// Set the resource identifier. The empty string marks the resource as
    /// gone.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.new_id = Some(id.into());
    }

    /// Serialize the current view into a fresh state.
    ///
    /// Every attribute is read through the usual priorities and flattened
    /// anew, so list counts and indices reflect the final contents.
    pub fn state(&self) -> Result<ResourceState> {
        let reader = self.reader();
        let mut attributes = std::collections::BTreeMap::new();
        for name in self.schema.keys() {
            let value = codec::unflatten(self.schema, name, &reader)?;
            attributes.extend(codec::flatten(self.schema, name, &value)?);
        }
        tracing::debug!(
            id = self.id(),
            attributes = attributes.len(),
            "serialized resource state"
        );
        Ok(ResourceState {
            id: self.id().to_owned(),
            attributes,
        })
    }
}
