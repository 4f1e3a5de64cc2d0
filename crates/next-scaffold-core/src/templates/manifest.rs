//! Template root layout and its `template.yaml` manifest

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the template root
pub const TEMPLATE_DIR_ENV: &str = "NEXT_SCAFFOLD_TEMPLATE_DIR";

const MANIFEST_FILE: &str = "template.yaml";

fn default_config_dir() -> String {
    "config".to_string()
}

fn default_markdown_dir() -> String {
    "markdown".to_string()
}

fn default_catalog() -> String {
    "optional-dependencies.yaml".to_string()
}

/// `template.yaml` at the template root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template set
    pub name: String,

    pub description: String,

    /// Semver version of the template set
    pub version: String,

    /// Oldest CLI version able to use these templates
    #[serde(default)]
    pub min_cli_version: Option<String>,

    /// Directory holding config files and directories copied into projects
    #[serde(default = "default_config_dir")]
    pub config_dir: String,

    /// Directory holding README fragments (`<name>.md`)
    #[serde(default = "default_markdown_dir")]
    pub markdown_dir: String,

    /// Optional dependency catalog offered to the user
    #[serde(default = "default_catalog")]
    pub optional_dependencies: String,
}

/// A template root on disk together with its parsed manifest
#[derive(Debug, Clone)]
pub struct TemplateRoot {
    root: PathBuf,
    manifest: TemplateManifest,
}

impl TemplateRoot {
    pub fn load(root: &Path) -> Result<Self> {
        let manifest_path = root.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
        let manifest: TemplateManifest = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;

        Ok(Self {
            root: root.to_path_buf(),
            manifest,
        })
    }

    /// Resolve the template root: explicit flag, then the environment, then
    /// `templates/` beside the executable, then `./templates`.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(TEMPLATE_DIR_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("templates")));

        let candidates = beside_exe
            .into_iter()
            .chain(std::iter::once(PathBuf::from("templates")));
        for candidate in candidates {
            if candidate.join(MANIFEST_FILE).is_file() {
                return Ok(candidate);
            }
        }

        anyhow::bail!(
            "Template directory not found. Pass --template-dir or set {}",
            TEMPLATE_DIR_ENV
        )
    }

    pub fn manifest(&self) -> &TemplateManifest {
        &self.manifest
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join(&self.manifest.config_dir)
    }

    pub fn markdown_dir(&self) -> PathBuf {
        self.root.join(&self.manifest.markdown_dir)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(&self.manifest.optional_dependencies)
    }
}
