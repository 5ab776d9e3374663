use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use anyhow::{bail, Context, Result};
use nixops4_resource_data::{ResourceData, ResourceDiff, ResourceState, SchemaMap, Value};
use serde::de::DeserializeOwned;

/// Where the attribute data of the resource comes from
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct Inputs {
    /// JSON file with the attribute schemas of the resource, keyed by attribute name
    #[arg(long)]
    pub schema: PathBuf,

    /// JSON file with the persisted state of the resource
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// JSON file with the planned diff for the resource
    #[arg(long)]
    pub diff: Option<PathBuf>,

    /// Write a JSON value at a key-path before running the command
    ///
    /// May be repeated; writes are applied in the order given. Values for
    /// float attributes need a decimal point, e.g. `2.0`.
    #[arg(long("set"), num_args = 2, value_names = ["KEY", "JSON"])]
    pub set: Vec<String>,

    /// Set the resource identifier before running the command
    #[arg(long)]
    pub id: Option<String>,
}

/// The parsed contents of [`Inputs`].
#[derive(Debug)]
pub(crate) struct Loaded {
    pub schema: SchemaMap,
    pub state: Option<ResourceState>,
    pub diff: Option<ResourceDiff>,
    pub writes: Vec<(String, Value)>,
    pub id: Option<String>,
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {} file {}", what, path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {} file {}", what, path.display()))
}

fn parse_writes(set: &[String]) -> Result<Vec<(String, Value)>> {
    let mut writes = Vec::new();
    for pair in set.chunks(2) {
        let [key, json] = pair else {
            bail!("--set requires a key and a JSON value");
        };
        let json: serde_json::Value = serde_json::from_str(json)
            .with_context(|| format!("failed to parse JSON value for --set {}", key))?;
        writes.push((key.clone(), Value::from(json)));
    }
    Ok(writes)
}

impl Inputs {
    pub(crate) fn load(&self) -> Result<Loaded> {
        Ok(Loaded {
            schema: read_json(&self.schema, "schema")?,
            state: self
                .state
                .as_deref()
                .map(|p| read_json(p, "state"))
                .transpose()?,
            diff: self
                .diff
                .as_deref()
                .map(|p| read_json(p, "diff"))
                .transpose()?,
            writes: parse_writes(&self.set)?,
            id: self.id.clone(),
        })
    }
}

impl Loaded {
    /// Run `f` on the resource data, after applying the requested writes.
    pub(crate) fn with_resource_data<T>(
        &self,
        f: impl FnOnce(&mut ResourceData<'_>) -> Result<T>,
    ) -> Result<T> {
        let mut data = ResourceData::new(&self.schema, self.state.as_ref(), self.diff.as_ref())
            .context("invalid schema")?;
        for (key, value) in &self.writes {
            tracing::debug!(key, "applying write");
            data.set(key, value.clone())
                .with_context(|| format!("failed to set {}", key))?;
        }
        if let Some(id) = &self.id {
            data.set_id(id.as_str());
        }
        f(&mut data)
    }
}
