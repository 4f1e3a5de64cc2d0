//! `package.json` editing
//!
//! The manifest is loaded once, edited in memory and written back once, so a
//! stage's edits form a single read-modify-write. Key order from the original
//! file is preserved (`serde_json` is built with `preserve_order`).

use crate::error::{Result, ScaffoldError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    root: Map<String, Value>,
}

impl PackageManifest {
    /// Read and parse the manifest; it must contain a JSON object
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| ScaffoldError::manifest("read", path, e))?;

        let value: Value = serde_json::from_str(&content)
            .map_err(|e| ScaffoldError::manifest("parse", path, e))?;

        match value {
            Value::Object(root) => Ok(Self {
                path: path.to_path_buf(),
                root,
            }),
            _ => Err(ScaffoldError::manifest(
                "parse",
                path,
                "top-level value is not an object",
            )),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Shallow-merge `values` into the object at `key`, creating it if needed.
    /// A non-object value at `key` is replaced.
    pub fn merge(&mut self, key: &str, values: Map<String, Value>) {
        let entry = self
            .root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }

        if let Value::Object(existing) = entry {
            for (name, value) in values {
                existing.insert(name, value);
            }
        }
    }

    /// Remove a script, keeping the order of the remaining ones
    pub fn remove_script(&mut self, name: &str) -> Option<Value> {
        self.root
            .get_mut("scripts")
            .and_then(Value::as_object_mut)
            .and_then(|scripts| scripts.shift_remove(name))
    }

    /// Pretty-print with a trailing newline
    pub fn to_json_string(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&self.root)
            .map_err(|e| ScaffoldError::manifest("serialize", &self.path, e))?;
        out.push('\n');
        Ok(out)
    }

    pub async fn save(&self) -> Result<()> {
        let content = self.to_json_string()?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| ScaffoldError::manifest("write", &self.path, e))?;
        debug!(path = %self.path.display(), "manifest written");
        Ok(())
    }
}

/// Convert an ordered string map into a JSON object
pub fn to_json_map<K, V, I>(entries: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
