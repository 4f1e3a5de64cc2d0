//! Scaffolding pipeline
//!
//! Runs the stages of a single scaffolding run in order:
//!
//! 1. create the Next.js app and fold discovered facts into the options
//! 2. derive the [`Config`] plan
//! 3. copy template files and directories
//! 4. install dependencies and dev dependencies
//! 5. merge scripts and lint-staged rules into `package.json`
//! 6. write ESLint / Prettier configs and the pre-commit hook
//! 7. assemble the README
//! 8. format the project with Prettier
//!
//! A failing stage aborts the run. Nothing is rolled back.

pub mod create_app;

use crate::config::{
    derive_config, eslint_config, lint_staged_rules, pre_commit_script, prettier_config,
    prettier_ignore, Config, ESLINT_CONFIG_FILE, PRE_COMMIT_FILE, PRETTIER_CONFIG_FILE,
    PRETTIER_IGNORE_FILE,
};
use crate::error::{Result, ScaffoldError};
use crate::manifest::{to_json_map, MANIFEST_FILE};
use crate::options::Options;
use crate::runtime::command::{CommandRunner, Invocation};
use crate::runtime::package_manager::PackageManager;
use crate::templates::copier::{copy_template, touch_files};
use crate::templates::fragments::FragmentSource;
use crate::templates::readme::{assemble_readme, README_FILE};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

pub use create_app::{create_app_argv, detect_facts, discover_facts};

/// One sequential phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CreateApp,
    CopyTemplates,
    InstallDependencies,
    UpdateManifest,
    WriteConfigFiles,
    WriteReadme,
    Format,
}

impl Stage {
    pub fn description(&self) -> &'static str {
        match self {
            Stage::CreateApp => "Creating Next.js app",
            Stage::CopyTemplates => "Copying templates",
            Stage::InstallDependencies => "Installing dependencies",
            Stage::UpdateManifest => "Updating package.json",
            Stage::WriteConfigFiles => "Writing tool configuration",
            Stage::WriteReadme => "Writing README",
            Stage::Format => "Formatting project",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Receives stage progress, e.g. to drive a spinner
pub trait StageObserver {
    fn stage_started(&mut self, _stage: Stage) {}
    fn stage_finished(&mut self, _stage: Stage) {}
    fn stage_failed(&mut self, _stage: Stage, _error: &anyhow::Error) {}
}

/// Observer that ignores all progress
#[derive(Debug, Default)]
pub struct NoProgress;

impl StageObserver for NoProgress {}

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Options after facts from the generated project were folded in
    pub options: Options,
    pub config: Config,
    /// Files written by the copy and config stages
    pub written: Vec<PathBuf>,
}

/// Executes the scaffolding plan against a project directory
pub struct Scaffolder<R, F> {
    project_dir: PathBuf,
    template_config_dir: PathBuf,
    fragments: F,
    runner: R,
    skip_create: bool,
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> ScaffoldError + '_ {
    move |source| ScaffoldError::TemplateCopy {
        path: path.to_path_buf(),
        source,
    }
}

fn to_pretty_json<T: Serialize>(value: &T, path: &Path) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).map_err(|e| ScaffoldError::TemplateCopy {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    json.push('\n');
    Ok(json)
}

impl<R: CommandRunner, F: FragmentSource> Scaffolder<R, F> {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        template_config_dir: impl Into<PathBuf>,
        fragments: F,
        runner: R,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            template_config_dir: template_config_dir.into(),
            fragments,
            runner,
            skip_create: false,
        }
    }

    /// Use the existing project instead of running `create-next-app`
    pub fn skip_create(mut self, skip: bool) -> Self {
        self.skip_create = skip;
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    fn package_manager(&self, options: &Options) -> PackageManager<&R> {
        PackageManager::new(options.package_manager, &self.project_dir, &self.runner)
    }

    /// Run every stage for `options`
    pub async fn run<O: StageObserver>(
        &self,
        options: Options,
        observer: &mut O,
    ) -> anyhow::Result<Outcome> {
        options.validate()?;

        let options = stage(observer, Stage::CreateApp, self.create_app(options)).await?;

        let config = derive_config(&options);
        info!(
            files = config.config_template_files.len(),
            directories = config.config_template_directories.len(),
            dependencies = config.package_dependencies.len(),
            dev_dependencies = config.package_dev_dependencies.len(),
            "derived configuration"
        );

        let mut written =
            stage(observer, Stage::CopyTemplates, self.copy_templates(&options, &config)).await?;

        stage(
            observer,
            Stage::InstallDependencies,
            self.install_dependencies(&options, &config),
        )
        .await?;

        stage(
            observer,
            Stage::UpdateManifest,
            self.update_manifest(&options, &config),
        )
        .await?;

        written.extend(
            stage(observer, Stage::WriteConfigFiles, self.write_config_files(&options)).await?,
        );

        written.push(
            stage(observer, Stage::WriteReadme, self.write_readme(&options, &config)).await?,
        );

        if options.use_prettier {
            stage(observer, Stage::Format, self.format(&options)).await?;
        }

        Ok(Outcome {
            options,
            config,
            written,
        })
    }

    /// Create the app unless a manifest already exists, then fold in facts
    pub async fn create_app(&self, options: Options) -> Result<Options> {
        let manifest_path = self.project_dir.join(MANIFEST_FILE);

        let has_manifest = fs::try_exists(&manifest_path).await.unwrap_or(false);
        if self.skip_create || has_manifest {
            info!(project = %self.project_dir.display(), "using existing project");
        } else {
            // create-next-app runs beside the target so it can create the directory itself
            let (cwd, target) = match (self.project_dir.parent(), self.project_dir.file_name()) {
                (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
                    (parent.to_path_buf(), PathBuf::from(name))
                }
                _ => (PathBuf::from("."), self.project_dir.clone()),
            };
            fs::create_dir_all(&cwd).await.map_err(write_error(&cwd))?;

            let argv = create_app_argv(&options, &target);
            self.runner.run(&Invocation::from_argv(argv, &cwd)).await?;
        }

        let facts = discover_facts(&self.project_dir).await?;
        if facts.typescript != options.use_typescript {
            warn!(
                requested = options.use_typescript,
                detected = facts.typescript,
                "TypeScript setting taken from the generated project"
            );
        }
        info!(
            typescript = facts.typescript,
            app_router = facts.app_router,
            tailwind = facts.tailwind,
            "project facts"
        );

        Ok(options.with_facts(facts))
    }

    pub async fn copy_templates(
        &self,
        options: &Options,
        config: &Config,
    ) -> Result<Vec<PathBuf>> {
        let written = copy_template(
            &self.template_config_dir,
            &self.project_dir,
            &config.config_template_files,
            &config.config_template_directories,
        )
        .await?;

        touch_files(
            &self.project_dir,
            options.dot_env_files.iter().map(String::as_str),
        )
        .await?;

        Ok(written)
    }

    /// Dependencies first, then dev dependencies; both share one lockfile
    pub async fn install_dependencies(&self, options: &Options, config: &Config) -> Result<()> {
        let pm = self.package_manager(options);
        pm.install_dependencies(&config.package_dependencies, false)
            .await?;
        pm.install_dependencies(&config.package_dev_dependencies, true)
            .await
    }

    /// Single read-modify-write of `package.json`
    pub async fn update_manifest(&self, options: &Options, config: &Config) -> Result<()> {
        let scripts = to_json_map(
            config
                .package_scripts
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        let lint_staged = options
            .use_lint_staged
            .then(|| to_json_map(lint_staged_rules(options.into())));

        self.package_manager(options)
            .edit_manifest(&self.project_dir.join(MANIFEST_FILE), |manifest| {
                if manifest.remove_script("lint").is_some() {
                    info!("removed generated lint script");
                }
                manifest.merge("scripts", scripts);
                if let Some(rules) = lint_staged {
                    manifest.merge("lint-staged", rules);
                }
            })
            .await
    }

    async fn write_file(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(write_error(parent))?;
        }
        fs::write(&path, content).await.map_err(write_error(&path))?;
        info!(path = %path.display(), "wrote");
        Ok(path)
    }

    pub async fn write_config_files(&self, options: &Options) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if let Some(eslint) = eslint_config(options.into()) {
            let path = self.project_dir.join(ESLINT_CONFIG_FILE);
            let json = to_pretty_json(&eslint, &path)?;
            written.push(self.write_file(ESLINT_CONFIG_FILE, &json).await?);
        }

        if options.use_prettier {
            let path = self.project_dir.join(PRETTIER_CONFIG_FILE);
            let json = to_pretty_json(&prettier_config(options), &path)?;
            written.push(self.write_file(PRETTIER_CONFIG_FILE, &json).await?);
            written.push(
                self.write_file(PRETTIER_IGNORE_FILE, &prettier_ignore())
                    .await?,
            );
        }

        if options.use_husky {
            written.push(self.install_pre_commit_hook(options).await?);
        }

        Ok(written)
    }

    async fn install_pre_commit_hook(&self, options: &Options) -> Result<PathBuf> {
        let has_repo = fs::try_exists(self.project_dir.join(".git"))
            .await
            .unwrap_or(false);
        if !has_repo {
            self.runner
                .run(&Invocation::new("git", ["init"], &self.project_dir))
                .await?;
        }
        self.package_manager(options)
            .exec("husky", &["install"])
            .await?;

        let path = self
            .write_file(PRE_COMMIT_FILE, &pre_commit_script(options.into()))
            .await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .await
                .map_err(write_error(&path))?;
        }

        Ok(path)
    }

    pub async fn write_readme(&self, options: &Options, config: &Config) -> Result<PathBuf> {
        let readme = assemble_readme(
            &self.fragments,
            &config.markdown,
            &options.optional_dependencies,
        )
        .await?;

        let path = self.project_dir.join(README_FILE);
        fs::write(&path, readme)
            .await
            .map_err(|source| ScaffoldError::ReadmeAssembly {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    pub async fn format(&self, options: &Options) -> Result<()> {
        self.package_manager(options)
            .run_script("format:write", &[])
            .await
    }
}

async fn stage<O, T, Fut>(observer: &mut O, stage: Stage, work: Fut) -> anyhow::Result<T>
where
    O: StageObserver,
    Fut: Future<Output = Result<T>>,
{
    observer.stage_started(stage);
    info!(stage = %stage, "stage started");

    match work.await {
        Ok(value) => {
            observer.stage_finished(stage);
            Ok(value)
        }
        Err(e) => {
            let error = anyhow::Error::new(e).context(format!("{} failed", stage));
            observer.stage_failed(stage, &error);
            Err(error)
        }
    }
}
