//! Package-manager abstraction
//!
//! Normalizes the differences between npm, yarn, pnpm and bun: the install
//! verb, the dev-dependency flag, how scripts and binaries are invoked, and how
//! a new Next.js app is created.

use crate::error::{Result, ScaffoldError};
use crate::manifest::PackageManifest;
use crate::runtime::command::{CommandRunner, Invocation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Supported package managers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PackageManagerKind {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManagerKind {
    pub const ALL: [PackageManagerKind; 4] = [
        PackageManagerKind::Npm,
        PackageManagerKind::Yarn,
        PackageManagerKind::Pnpm,
        PackageManagerKind::Bun,
    ];

    /// Executable name
    pub fn command(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "npm",
            PackageManagerKind::Yarn => "yarn",
            PackageManagerKind::Pnpm => "pnpm",
            PackageManagerKind::Bun => "bun",
        }
    }

    pub fn install_verb(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "install",
            _ => "add",
        }
    }

    pub fn dev_flag(&self) -> &'static str {
        match self {
            PackageManagerKind::Yarn | PackageManagerKind::Bun => "--dev",
            _ => "--save-dev",
        }
    }

    /// Prefix for running a locally installed binary
    pub fn exec_prefix(&self) -> &'static [&'static str] {
        match self {
            PackageManagerKind::Npm => &["npx"],
            PackageManagerKind::Yarn => &["yarn"],
            PackageManagerKind::Pnpm => &["pnpm", "exec"],
            PackageManagerKind::Bun => &["bunx"],
        }
    }

    /// Argument vector for running a package script with extra arguments.
    /// npm needs `--` before arguments meant for the script itself.
    pub fn run_script_argv(&self, script: &str, args: &[&str]) -> Vec<String> {
        let mut argv = vec![self.command().to_string(), "run".to_string(), script.to_string()];
        if !args.is_empty() {
            if *self == PackageManagerKind::Npm {
                argv.push("--".to_string());
            }
            argv.extend(args.iter().map(|a| a.to_string()));
        }
        argv
    }

    /// Shell line for running a package script, as written into hooks
    pub fn run_script_line(&self, script: &str, args: &[&str]) -> String {
        self.run_script_argv(script, args).join(" ")
    }

    /// Argument vector for running a local binary
    pub fn exec_argv(&self, binary: &str, args: &[&str]) -> Vec<String> {
        self.exec_prefix()
            .iter()
            .chain(std::iter::once(&binary))
            .chain(args.iter())
            .map(|s| s.to_string())
            .collect()
    }

    /// Command prefix that runs `create-next-app` with this package manager
    pub fn create_app_prefix(&self) -> &'static [&'static str] {
        match self {
            PackageManagerKind::Npm => &["npx", "--yes", "create-next-app@latest"],
            PackageManagerKind::Yarn => &["yarn", "create", "next-app"],
            PackageManagerKind::Pnpm => &["pnpm", "create", "next-app"],
            PackageManagerKind::Bun => &["bunx", "create-next-app"],
        }
    }

    /// `create-next-app` flag selecting this package manager
    pub fn create_app_flag(&self) -> &'static str {
        match self {
            PackageManagerKind::Npm => "--use-npm",
            PackageManagerKind::Yarn => "--use-yarn",
            PackageManagerKind::Pnpm => "--use-pnpm",
            PackageManagerKind::Bun => "--use-bun",
        }
    }
}

impl fmt::Display for PackageManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Parses manager names from configuration or environment values; the CLI
/// goes through clap's `ValueEnum` instead.
impl FromStr for PackageManagerKind {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(PackageManagerKind::Npm),
            "yarn" => Ok(PackageManagerKind::Yarn),
            "pnpm" => Ok(PackageManagerKind::Pnpm),
            "bun" => Ok(PackageManagerKind::Bun),
            other => Err(ScaffoldError::Derivation(format!(
                "unknown package manager '{}' (expected npm, yarn, pnpm or bun)",
                other
            ))),
        }
    }
}

/// A package manager bound to a project directory and a command runner
pub struct PackageManager<R> {
    kind: PackageManagerKind,
    project_dir: PathBuf,
    runner: R,
}

impl<R: CommandRunner> PackageManager<R> {
    pub fn new(kind: PackageManagerKind, project_dir: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            kind,
            project_dir: project_dir.into(),
            runner,
        }
    }

    pub fn kind(&self) -> PackageManagerKind {
        self.kind
    }

    pub fn install_verb(&self) -> &'static str {
        self.kind.install_verb()
    }

    pub fn dev_flag(&self) -> &'static str {
        self.kind.dev_flag()
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Install `names` in the project directory; returns immediately when empty
    pub async fn install_dependencies(&self, names: &[String], dev: bool) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }

        let mut args = Vec::with_capacity(names.len() + 2);
        args.push(self.install_verb().to_string());
        args.extend(names.iter().cloned());
        if dev {
            args.push(self.dev_flag().to_string());
        }

        info!(
            package_manager = %self.kind,
            dev,
            count = names.len(),
            "installing dependencies"
        );
        let invocation = Invocation::new(self.kind.command(), args, &self.project_dir);
        self.runner.run(&invocation).await
    }

    /// Run a package script, e.g. `format:write`
    pub async fn run_script(&self, script: &str, args: &[&str]) -> Result<()> {
        let argv = self.kind.run_script_argv(script, args);
        self.runner
            .run(&Invocation::from_argv(argv, &self.project_dir))
            .await
    }

    /// Run a locally installed binary, e.g. `husky install`
    pub async fn exec(&self, binary: &str, args: &[&str]) -> Result<()> {
        let argv = self.kind.exec_argv(binary, args);
        self.runner
            .run(&Invocation::from_argv(argv, &self.project_dir))
            .await
    }

    /// Apply `edit` to the manifest at `manifest_path` as one read-modify-write
    pub async fn edit_manifest<F>(&self, manifest_path: &Path, edit: F) -> Result<()>
    where
        F: FnOnce(&mut PackageManifest),
    {
        let mut manifest = PackageManifest::load(manifest_path).await?;
        edit(&mut manifest);
        manifest.save().await
    }

    /// Shallow-merge `values` under `key` in the manifest at `manifest_path`.
    /// Library entry point for single-key merges; the pipeline batches its
    /// edits through [`PackageManager::edit_manifest`].
    pub async fn merge_into_manifest(
        &self,
        manifest_path: &Path,
        key: &str,
        values: Map<String, Value>,
    ) -> Result<()> {
        self.edit_manifest(manifest_path, |manifest| manifest.merge(key, values))
            .await
    }
}
