//! User-facing options that drive configuration derivation
//!
//! `Options` is an immutable value: facts discovered after the project has been
//! created produce a new value through [`Options::with_facts`] instead of being
//! patched in place.

use crate::error::{Result, ScaffoldError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use crate::runtime::package_manager::PackageManagerKind;

/// A user-selectable extra package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionalDependency {
    /// npm package name
    pub module: String,

    /// Install as a dev dependency
    #[serde(default)]
    pub save_dev: bool,

    /// Repository link shown in the README table
    pub github: String,

    pub description: String,
}

impl OptionalDependency {
    /// Reject records that would produce a broken install command or README row
    pub fn validate(&self) -> Result<()> {
        if self.module.trim().is_empty() || self.module.chars().any(char::is_whitespace) {
            return Err(ScaffoldError::Derivation(format!(
                "invalid optional dependency name '{}'",
                self.module
            )));
        }
        if !self.github.starts_with("https://") {
            return Err(ScaffoldError::Derivation(format!(
                "optional dependency '{}' must link to an https:// repository",
                self.module
            )));
        }
        Ok(())
    }
}

/// Facts learned from the generated project after `create-next-app` ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectFacts {
    pub typescript: bool,
    pub app_router: bool,
    pub tailwind: bool,
}

/// Feature toggles and choices for one scaffolding run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub package_manager: PackageManagerKind,
    pub use_typescript: bool,
    pub use_eslint: bool,
    pub use_prettier: bool,
    pub use_jest: bool,
    pub use_react_testing_library: bool,
    pub use_lint_staged: bool,
    pub use_husky: bool,
    pub use_storybook: bool,
    pub use_cypress: bool,
    pub use_docker: bool,
    pub use_image_optimisation: bool,

    /// Prettier `semi` profile
    pub semicolons: bool,

    /// Selection order is install order and README table order
    pub optional_dependencies: Vec<OptionalDependency>,

    /// Files created empty in the project root
    pub dot_env_files: BTreeSet<String>,

    pub facts: ProjectFacts,
}

impl Options {
    /// Fold facts discovered on disk into a new options value
    pub fn with_facts(self, facts: ProjectFacts) -> Self {
        Self {
            use_typescript: facts.typescript,
            facts,
            ..self
        }
    }

    /// Validate boundary-supplied records
    pub fn validate(&self) -> Result<()> {
        for dependency in &self.optional_dependencies {
            dependency.validate()?;
        }
        for file in &self.dot_env_files {
            let plain = !file.is_empty()
                && !file.contains(['/', '\\'])
                && file != "."
                && file != "..";
            if !plain {
                return Err(ScaffoldError::Derivation(format!(
                    "invalid env file name '{}'",
                    file
                )));
            }
        }
        Ok(())
    }
}
