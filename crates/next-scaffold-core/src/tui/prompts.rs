//! Charm-style CLI prompts using cliclack

use crate::options::{OptionalDependency, Options, PackageManagerKind};
use crate::runtime::check;
use crate::runtime::command::ProcessRunner;
use crate::scaffold::{Outcome, Scaffolder, Stage, StageObserver};
use crate::templates::{self, DirectoryFragments, TemplateRoot};
use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

const DEFAULT_DIRECTORY: &str = "my-app";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project directory to create or extend (prompted for when empty)
    pub directory: PathBuf,

    /// Local template root (overrides the environment and the default lookup)
    pub template_dir: Option<PathBuf>,

    /// Package manager to use without prompting
    pub package_manager: Option<PackageManagerKind>,

    /// Reuse an existing project instead of running create-next-app
    pub skip_create: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Toggleable tooling offered in the feature prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Feature {
    TypeScript,
    Eslint,
    Prettier,
    Jest,
    ReactTestingLibrary,
    LintStaged,
    Husky,
    Storybook,
    Cypress,
    Docker,
    ImageOptimisation,
}

impl Feature {
    const ALL: [Feature; 11] = [
        Feature::TypeScript,
        Feature::Eslint,
        Feature::Prettier,
        Feature::Jest,
        Feature::ReactTestingLibrary,
        Feature::LintStaged,
        Feature::Husky,
        Feature::Storybook,
        Feature::Cypress,
        Feature::Docker,
        Feature::ImageOptimisation,
    ];

    /// Selected when running with --yes
    const DEFAULTS: [Feature; 3] = [Feature::TypeScript, Feature::Eslint, Feature::Prettier];

    fn label(&self) -> &'static str {
        match self {
            Feature::TypeScript => "TypeScript",
            Feature::Eslint => "ESLint",
            Feature::Prettier => "Prettier",
            Feature::Jest => "Jest",
            Feature::ReactTestingLibrary => "React Testing Library",
            Feature::LintStaged => "lint-staged",
            Feature::Husky => "Husky",
            Feature::Storybook => "Storybook",
            Feature::Cypress => "Cypress",
            Feature::Docker => "Docker",
            Feature::ImageOptimisation => "Image optimisation (sharp)",
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            Feature::ReactTestingLibrary => "pairs with Jest",
            Feature::LintStaged => "runs checks on staged files only",
            Feature::Husky => "git hooks",
            Feature::Docker => "compose file, Dockerfile, Makefile",
            _ => "",
        }
    }
}

fn options_from_features(kind: PackageManagerKind, features: &[Feature]) -> Options {
    let on = |feature: Feature| features.contains(&feature);
    Options {
        package_manager: kind,
        use_typescript: on(Feature::TypeScript),
        use_eslint: on(Feature::Eslint),
        use_prettier: on(Feature::Prettier),
        use_jest: on(Feature::Jest),
        use_react_testing_library: on(Feature::ReactTestingLibrary),
        use_lint_staged: on(Feature::LintStaged),
        use_husky: on(Feature::Husky),
        use_storybook: on(Feature::Storybook),
        use_cypress: on(Feature::Cypress),
        use_docker: on(Feature::Docker),
        use_image_optimisation: on(Feature::ImageOptimisation),
        ..Options::default()
    }
}

fn parse_env_files(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Drives a cliclack spinner per pipeline stage
#[derive(Default)]
struct SpinnerProgress {
    spinner: Option<cliclack::ProgressBar>,
}

impl StageObserver for SpinnerProgress {
    fn stage_started(&mut self, stage: Stage) {
        let spinner = cliclack::spinner();
        spinner.start(format!("{}...", stage));
        self.spinner = Some(spinner);
    }

    fn stage_finished(&mut self, stage: Stage) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop(stage.to_string());
        }
    }

    fn stage_failed(&mut self, stage: Stage, _error: &anyhow::Error) {
        if let Some(spinner) = self.spinner.take() {
            spinner.error(format!("{} failed", stage));
        }
    }
}

/// Run the CLI with interactive prompts
pub async fn run(args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro("next-scaffold")?;

    // Step 1: Locate templates
    let template_root = load_templates(&args, cli_version)?;

    // Step 2: Resolve the project directory
    let project_dir = resolve_directory(&args)?;

    // Step 3: Package manager
    let kind = select_package_manager(&args)?;

    // Step 4: Features
    let features = select_features(&args)?;
    let mut options = options_from_features(kind, &features);

    if options.use_prettier {
        options.semicolons = if args.yes {
            true
        } else {
            cliclack::confirm("Use semicolons in formatted code?")
                .initial_value(true)
                .interact()?
        };
    }

    // Step 5: Optional dependencies and env files
    let catalog = templates::load_catalog(&template_root.catalog_path())?;
    options.optional_dependencies = select_optional_dependencies(&catalog, &args)?;
    options.dot_env_files = select_env_files(&args)?.into_iter().collect();

    // Step 6: Check tools
    check_tools(kind, options.use_husky)?;

    // Step 7: Scaffold
    let scaffolder = Scaffolder::new(
        &project_dir,
        template_root.config_dir(),
        DirectoryFragments::new(template_root.markdown_dir()),
        ProcessRunner,
    )
    .skip_create(args.skip_create);

    let mut progress = SpinnerProgress::default();
    let outcome = scaffolder.run(options, &mut progress).await?;

    cliclack::log::success(format!(
        "Wrote {} files in {}",
        outcome.written.len(),
        project_dir.display()
    ))?;

    // Step 8: Show next steps
    print_next_steps(&project_dir, &outcome)?;

    Ok(())
}

fn load_templates(args: &CreateArgs, cli_version: &str) -> Result<TemplateRoot> {
    let path = TemplateRoot::locate(args.template_dir.as_deref())?;
    let root = TemplateRoot::load(&path)?;
    cliclack::log::info(format!(
        "Templates: {} {} ({})",
        root.manifest().name,
        root.manifest().version,
        path.display()
    ))?;

    if let Some(warning) =
        templates::check_compatibility(cli_version, root.manifest().min_cli_version.as_deref())
    {
        cliclack::log::warning(warning)?;
    }

    Ok(root)
}

fn resolve_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let directory = if !args.directory.as_os_str().is_empty() {
        args.directory.clone()
    } else if args.yes {
        PathBuf::from(DEFAULT_DIRECTORY)
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(DEFAULT_DIRECTORY)
            .default_input(DEFAULT_DIRECTORY)
            .interact()?;
        PathBuf::from(input)
    };

    let path = if directory.is_absolute() {
        directory
    } else {
        current_dir.join(directory)
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    if path.join("package.json").is_file() {
        cliclack::log::info(format!(
            "Found package.json in {}, extending the existing project",
            path.display()
        ))?;
    } else if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                // Auto-confirm with --yes flag
                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(false)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    }

    Ok(path)
}

fn select_package_manager(args: &CreateArgs) -> Result<PackageManagerKind> {
    if let Some(kind) = args.package_manager {
        cliclack::log::info(format!("Package manager: {}", kind))?;
        return Ok(kind);
    }
    if args.yes {
        return Ok(PackageManagerKind::default());
    }

    let mut select = cliclack::select("Package manager");
    for kind in PackageManagerKind::ALL {
        select = select.item(kind, kind.command(), "");
    }
    Ok(select.initial_value(PackageManagerKind::default()).interact()?)
}

fn select_features(args: &CreateArgs) -> Result<Vec<Feature>> {
    if args.yes {
        return Ok(Feature::DEFAULTS.to_vec());
    }

    let mut multi = cliclack::multiselect("Select tooling");
    for feature in Feature::ALL {
        multi = multi.item(feature, feature.label(), feature.hint());
    }

    let selected: Vec<Feature> = multi
        .initial_values(Feature::DEFAULTS.to_vec())
        .required(false)
        .interact()?;

    if selected.contains(&Feature::ReactTestingLibrary) && !selected.contains(&Feature::Jest) {
        cliclack::log::warning("React Testing Library is usually paired with Jest")?;
    }

    Ok(selected)
}

fn select_optional_dependencies(
    catalog: &[OptionalDependency],
    args: &CreateArgs,
) -> Result<Vec<OptionalDependency>> {
    if catalog.is_empty() || args.yes {
        return Ok(Vec::new());
    }

    let mut multi = cliclack::multiselect("Additional packages (optional)");
    for (idx, dependency) in catalog.iter().enumerate() {
        multi = multi.item(idx, &dependency.module, &dependency.description);
    }

    let mut selected: Vec<usize> = multi.required(false).interact()?;
    // Keep catalog order regardless of the order items were toggled in
    selected.sort_unstable();

    Ok(selected
        .into_iter()
        .filter_map(|idx| catalog.get(idx).cloned())
        .collect())
}

fn select_env_files(args: &CreateArgs) -> Result<Vec<String>> {
    const DEFAULT_ENV_FILES: &str = ".env.local";

    if args.yes {
        return Ok(parse_env_files(DEFAULT_ENV_FILES));
    }

    let input: String = cliclack::input("Env files to create (comma-separated)")
        .placeholder(DEFAULT_ENV_FILES)
        .default_input(DEFAULT_ENV_FILES)
        .required(false)
        .interact()?;

    Ok(parse_env_files(&input))
}

/// Outcome of the tool check; missing tools never stop the run
#[derive(Debug, PartialEq, Eq)]
enum ToolReport {
    Detected(String),
    Missing(String),
}

fn tool_report(result: Result<Vec<check::RuntimeInfo>>) -> ToolReport {
    match result {
        Ok(runtimes) => {
            let runtime_info: Vec<String> = runtimes
                .iter()
                .map(|r| format!("{} ({})", r.name, r.version.as_deref().unwrap_or("unknown")))
                .collect();
            ToolReport::Detected(format!("Detected: {}", runtime_info.join(", ")))
        }
        Err(e) => ToolReport::Missing(format!(
            "{}. Stages that need them will fail until they are installed.",
            e
        )),
    }
}

fn check_tools(kind: PackageManagerKind, needs_git: bool) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking tools...");

    match tool_report(check::check_runtimes(kind, needs_git)) {
        ToolReport::Detected(summary) => spinner.stop(summary),
        ToolReport::Missing(warning) => {
            spinner.stop("Missing tools");
            cliclack::log::warning(warning)?;
        }
    }
    Ok(())
}

fn next_steps(project_dir: &Path, outcome: &Outcome) -> Vec<String> {
    let pm = outcome.options.package_manager;
    let mut steps = Vec::new();

    if std::env::current_dir().ok().as_deref() != Some(project_dir) {
        steps.push(format!("cd {}", project_dir.display()));
    }
    steps.push(pm.run_script_line("dev", &[]));
    if outcome.options.use_storybook {
        steps.push(pm.run_script_line("storybook", &[]));
    }
    if outcome.options.use_cypress {
        steps.push(pm.run_script_line("e2e", &[]));
    }
    steps.push("Open README.md for the tooling guide".to_string());
    steps
}

fn print_next_steps(project_dir: &Path, outcome: &Outcome) -> Result<()> {
    let steps = next_steps(project_dir, outcome);

    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}  {}", format!("{}.", i + 1).dimmed(), step.cyan());
    }
    println!();

    cliclack::outro("Happy hacking!")?;

    Ok(())
}
