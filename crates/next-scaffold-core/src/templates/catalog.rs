//! Catalog of optional dependencies offered during setup

use crate::options::OptionalDependency;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    dependencies: Vec<OptionalDependency>,
}

/// Parse and validate a catalog; module names must be unique
pub fn parse_catalog(content: &str) -> Result<Vec<OptionalDependency>> {
    let file: CatalogFile =
        serde_yaml::from_str(content).context("Failed to parse optional dependency catalog")?;

    let mut seen = HashSet::new();
    for dependency in &file.dependencies {
        dependency.validate()?;
        if !seen.insert(dependency.module.as_str()) {
            anyhow::bail!("Duplicate optional dependency '{}'", dependency.module);
        }
    }

    Ok(file.dependencies)
}

/// Load the catalog; a missing file means no optional dependencies are offered
pub fn load_catalog(path: &Path) -> Result<Vec<OptionalDependency>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_catalog(&content).with_context(|| format!("Invalid catalog {}", path.display()))
}
