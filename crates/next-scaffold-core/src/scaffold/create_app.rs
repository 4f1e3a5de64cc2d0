//! `create-next-app` invocation and discovery of what it generated

use crate::error::{Result, ScaffoldError};
use crate::options::{Options, ProjectFacts};
use std::path::Path;

const TAILWIND_CONFIGS: [&str; 4] = [
    "tailwind.config.js",
    "tailwind.config.ts",
    "tailwind.config.mjs",
    "tailwind.config.cjs",
];

const POSTCSS_CONFIGS: [&str; 3] = ["postcss.config.mjs", "postcss.config.js", "postcss.config.cjs"];

/// Command line creating the Next.js app at `project_dir`
pub fn create_app_argv(options: &Options, project_dir: &Path) -> Vec<String> {
    let pm = options.package_manager;
    let mut argv: Vec<String> = pm
        .create_app_prefix()
        .iter()
        .map(|s| s.to_string())
        .collect();

    argv.push(project_dir.display().to_string());
    argv.push(if options.use_typescript { "--ts" } else { "--js" }.to_string());
    argv.push(
        if options.use_eslint {
            "--eslint"
        } else {
            "--no-eslint"
        }
        .to_string(),
    );
    argv.push(pm.create_app_flag().to_string());
    argv.push("--yes".to_string());
    argv
}

fn uses_tailwind(project_dir: &Path) -> bool {
    if TAILWIND_CONFIGS
        .iter()
        .any(|name| project_dir.join(name).is_file())
    {
        return true;
    }

    POSTCSS_CONFIGS.iter().any(|name| {
        std::fs::read_to_string(project_dir.join(name))
            .map(|content| content.contains("tailwindcss"))
            .unwrap_or(false)
    })
}

/// Inspect a generated project
pub fn detect_facts(project_dir: &Path) -> ProjectFacts {
    ProjectFacts {
        typescript: project_dir.join("tsconfig.json").is_file(),
        app_router: project_dir.join("app").is_dir() || project_dir.join("src/app").is_dir(),
        tailwind: uses_tailwind(project_dir),
    }
}

/// [`detect_facts`] on the blocking pool
pub async fn discover_facts(project_dir: &Path) -> Result<ProjectFacts> {
    let dir = project_dir.to_path_buf();
    tokio::task::spawn_blocking(move || detect_facts(&dir))
        .await
        .map_err(|e| ScaffoldError::TemplateCopy {
            path: project_dir.to_path_buf(),
            source: std::io::Error::other(e),
        })
}
