//! End-to-end runs of the scaffolding pipeline against the bundled templates,
//! with every external command recorded instead of executed.

use next_scaffold_core::error::{Result, ScaffoldError};
use next_scaffold_core::templates::{load_catalog, DirectoryFragments, TemplateRoot};
use next_scaffold_core::{
    CommandRunner, Invocation, NoProgress, OptionalDependency, Options, PackageManagerKind,
    Scaffolder, Stage, StageObserver,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Records command lines; fails any command containing `fail_on`
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl Recorder {
    fn failing_on(pattern: &'static str) -> Self {
        Self {
            fail_on: Some(pattern),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for Recorder {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        let line = invocation.to_string();
        self.calls.lock().unwrap().push(line.clone());

        match self.fail_on {
            Some(pattern) if line.contains(pattern) => Err(ScaffoldError::Install {
                command: line,
                code: Some(1),
                stderr: "npm ERR! 404 Not Found".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[derive(Default)]
struct Log {
    events: Vec<String>,
}

impl StageObserver for Log {
    fn stage_started(&mut self, stage: Stage) {
        self.events.push(format!("start {:?}", stage));
    }

    fn stage_finished(&mut self, stage: Stage) {
        self.events.push(format!("done {:?}", stage));
    }

    fn stage_failed(&mut self, stage: Stage, _error: &anyhow::Error) {
        self.events.push(format!("failed {:?}", stage));
    }
}

fn bundled_templates() -> TemplateRoot {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates");
    TemplateRoot::load(&path).unwrap()
}

/// A project as `create-next-app` leaves it
fn seed_project(dir: &Path, typescript: bool) {
    std::fs::write(
        dir.join("package.json"),
        r#"{
  "name": "site",
  "version": "0.1.0",
  "private": true,
  "scripts": {
    "dev": "next dev",
    "build": "next build",
    "start": "next start",
    "lint": "next lint"
  }
}
"#,
    )
    .unwrap();
    if typescript {
        std::fs::write(dir.join("tsconfig.json"), "{}").unwrap();
    }
}

fn scaffolder<'a>(
    project: &Path,
    root: &TemplateRoot,
    runner: &'a Recorder,
) -> Scaffolder<&'a Recorder, DirectoryFragments> {
    Scaffolder::new(
        project,
        root.config_dir(),
        DirectoryFragments::new(root.markdown_dir()),
        runner,
    )
}

fn dependency(module: &str, save_dev: bool) -> OptionalDependency {
    OptionalDependency {
        module: module.to_string(),
        save_dev,
        github: format!("https://github.com/example/{}", module),
        description: format!("{} package", module),
    }
}

fn read_json(path: PathBuf) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_full_run_on_existing_typescript_project() {
    let project = tempfile::tempdir().unwrap();
    seed_project(project.path(), true);
    let root = bundled_templates();
    let runner = Recorder::default();

    let options = Options {
        package_manager: PackageManagerKind::Npm,
        use_typescript: true,
        use_eslint: true,
        use_prettier: true,
        use_jest: true,
        use_lint_staged: true,
        use_husky: true,
        use_docker: true,
        optional_dependencies: vec![dependency("zod", false), dependency("msw", true)],
        dot_env_files: [".env.local".to_string()].into_iter().collect(),
        ..Options::default()
    };

    let mut log = Log::default();
    let outcome = scaffolder(project.path(), &root, &runner)
        .run(options, &mut log)
        .await
        .unwrap();

    assert_eq!(
        runner.calls(),
        vec![
            "npm install zod".to_string(),
            "npm install husky @typescript-eslint/eslint-plugin @typescript-eslint/parser \
             lint-staged prettier @trivago/prettier-plugin-sort-imports eslint-config-prettier \
             jest jest-environment-jsdom @types/jest ts-jest ts-node msw --save-dev"
                .to_string(),
            "git init".to_string(),
            "npx husky install".to_string(),
            "npm run format:write".to_string(),
        ]
    );

    // create-next-app was skipped because package.json already existed
    assert_eq!(log.events.first().map(String::as_str), Some("start CreateApp"));
    assert_eq!(log.events.last().map(String::as_str), Some("done Format"));
    assert!(!log.events.iter().any(|e| e.starts_with("failed")));

    for file in [
        "next.config.ts",
        "Dockerfile",
        "docker-compose.yml",
        "Makefile",
        "jest.config.ts",
        "jest.setup.ts",
        ".env.local",
        ".eslintrc.json",
        ".prettierrc.json",
        ".prettierignore",
        ".husky/pre-commit",
        "README.md",
    ] {
        assert!(project.path().join(file).is_file(), "missing {}", file);
    }
    assert!(!project.path().join("next.config.js").exists());
    assert!(outcome.written.contains(&project.path().join("README.md")));

    let manifest = read_json(project.path().join("package.json"));
    let scripts = manifest["scripts"].as_object().unwrap();
    assert!(scripts.get("lint").is_none());
    assert_eq!(scripts["dev"], "next dev");
    assert_eq!(scripts["lint:fix"], "next lint --fix");
    assert_eq!(scripts["format:write"], "prettier --write .");
    assert_eq!(scripts["prepare"], "husky install");
    assert_eq!(
        scripts["build-start:standalone"],
        "npm run build:standalone && npm run start:standalone"
    );
    assert!(manifest["lint-staged"].as_object().is_some_and(|r| !r.is_empty()));

    let prettier = read_json(project.path().join(".prettierrc.json"));
    assert_eq!(prettier["semi"], false);

    let hook = std::fs::read_to_string(project.path().join(".husky/pre-commit")).unwrap();
    // lint-staged replaces the per-tool checks
    assert!(hook.contains("npx lint-staged"));
    assert!(!hook.contains("--passWithNoTests"));

    let readme = std::fs::read_to_string(project.path().join("README.md")).unwrap();
    let positions: Vec<usize> = [
        "# Next.js App",
        "## Docker",
        "## Prettier",
        "## Jest",
        "## lint-staged",
        "## Git",
        "## Husky",
        "## Selected dependencies",
        "| [zod](https://github.com/example/zod) | zod package | dependency |",
        "| [msw](https://github.com/example/msw) | msw package | devDependency |",
    ]
    .iter()
    .map(|needle| readme.find(needle).unwrap_or_else(|| panic!("{} missing", needle)))
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(readme.ends_with("|\n"));
}

#[tokio::test]
async fn test_generated_project_decides_typescript() {
    let project = tempfile::tempdir().unwrap();
    seed_project(project.path(), false);
    let root = bundled_templates();
    let runner = Recorder::default();

    let options = Options {
        package_manager: PackageManagerKind::Yarn,
        use_typescript: true,
        use_jest: true,
        ..Options::default()
    };

    let outcome = scaffolder(project.path(), &root, &runner)
        .run(options, &mut NoProgress)
        .await
        .unwrap();

    assert!(!outcome.options.use_typescript);
    assert!(project.path().join("next.config.js").is_file());
    assert!(project.path().join("jest.config.js").is_file());
    assert_eq!(
        runner.calls(),
        vec!["yarn add jest jest-environment-jsdom --dev".to_string()]
    );
}

#[tokio::test]
async fn test_create_app_runs_in_parent_directory() {
    let workspace = tempfile::tempdir().unwrap();
    let project = workspace.path().join("site");
    let root = bundled_templates();
    // The recorded create step produces nothing, so the manifest stage fails
    let runner = Recorder::default();

    let options = Options {
        package_manager: PackageManagerKind::Pnpm,
        ..Options::default()
    };

    let err = scaffolder(&project, &root, &runner)
        .run(options, &mut NoProgress)
        .await
        .unwrap_err();

    assert_eq!(
        runner.calls(),
        vec!["pnpm create next-app site --js --no-eslint --use-pnpm --yes".to_string()]
    );
    assert_eq!(err.to_string(), "Updating package.json failed");
}

#[tokio::test]
async fn test_install_failure_stops_before_manifest_update() {
    let project = tempfile::tempdir().unwrap();
    seed_project(project.path(), true);
    let before = std::fs::read_to_string(project.path().join("package.json")).unwrap();
    let root = bundled_templates();
    let runner = Recorder::failing_on("left-pad");

    let options = Options {
        use_prettier: true,
        optional_dependencies: vec![dependency("left-pad", false)],
        ..Options::default()
    };

    let mut log = Log::default();
    let err = scaffolder(project.path(), &root, &runner)
        .run(options, &mut log)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Installing dependencies failed");
    assert!(matches!(
        err.downcast_ref::<ScaffoldError>(),
        Some(ScaffoldError::Install { code: Some(1), .. })
    ));
    assert_eq!(
        log.events.last().map(String::as_str),
        Some("failed InstallDependencies")
    );

    // Nothing after the failed stage ran
    assert_eq!(runner.calls(), vec!["npm install left-pad".to_string()]);
    assert_eq!(
        std::fs::read_to_string(project.path().join("package.json")).unwrap(),
        before
    );
    assert!(!project.path().join("README.md").exists());
}

#[tokio::test]
async fn test_invalid_options_are_rejected_before_any_stage() {
    let project = tempfile::tempdir().unwrap();
    let root = bundled_templates();
    let runner = Recorder::default();

    let options = Options {
        optional_dependencies: vec![OptionalDependency {
            github: "http://insecure.example".to_string(),
            ..dependency("thing", false)
        }],
        ..Options::default()
    };

    let mut log = Log::default();
    assert!(scaffolder(project.path(), &root, &runner)
        .run(options, &mut log)
        .await
        .is_err());
    assert!(log.events.is_empty());
    assert!(runner.calls().is_empty());
}

#[test]
fn test_bundled_templates_are_complete() {
    let root = bundled_templates();
    assert_eq!(root.manifest().name, "next-scaffold");

    let catalog = load_catalog(&root.catalog_path()).unwrap();
    assert!(!catalog.is_empty());

    for fragment in [
        "next",
        "cypress",
        "docker",
        "prettier",
        "storybook",
        "jest",
        "react-testing-library",
        "lint-staged",
        "git",
        "husky",
        "selected-dependencies",
    ] {
        let path = root.markdown_dir().join(format!("{}.md", fragment));
        assert!(path.is_file(), "missing fragment {}", path.display());
    }

    for file in [
        "next.config.js",
        "next.config.ts",
        "jest.config.js",
        "jest.config.ts",
        "jest.setup.js",
        "jest.setup.ts",
        "Dockerfile",
        "docker-compose.yml",
        "Makefile",
    ] {
        assert!(root.config_dir().join(file).is_file(), "missing {}", file);
    }
    assert!(root.config_dir().join("cypress").is_dir());
    assert!(root.config_dir().join(".storybook").is_dir());
}
