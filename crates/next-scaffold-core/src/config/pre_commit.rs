//! Husky pre-commit hook generation

use crate::options::{Options, PackageManagerKind};

pub const PRE_COMMIT_FILE: &str = ".husky/pre-commit";

const HEADER: &str = "#!/usr/bin/env sh\n. \"$(dirname -- \"$0\")/_/husky.sh\"\n";

const LINT_STAGED_BLOCK: &str = r#"echo "Running lint-staged..."
npx lint-staged || {
  echo ""
  echo "❌ lint-staged failed. Fix the errors above and commit again."
  exit 1
}
"#;

const TRAILER: &str = r#"echo "Scanning staged files for TODO/FIXME markers..."
git diff --cached --name-only --diff-filter=ACM | xargs grep -n -E "TODO|FIXME" || true

echo "✅ Pre-commit checks passed"
"#;

/// Flags the hook generator reads
#[derive(Debug, Clone, Copy, Default)]
pub struct PreCommitFlags {
    pub eslint: bool,
    pub jest: bool,
    pub lint_staged: bool,
    pub package_manager: PackageManagerKind,
    pub prettier: bool,
    pub typescript: bool,
}

impl From<&Options> for PreCommitFlags {
    fn from(options: &Options) -> Self {
        Self {
            eslint: options.use_eslint,
            jest: options.use_jest,
            lint_staged: options.use_lint_staged,
            package_manager: options.package_manager,
            prettier: options.use_prettier,
            typescript: options.use_typescript,
        }
    }
}

fn block(banner: &str, lines: &[String]) -> String {
    let mut out = format!("echo \"{}\"\n", banner);
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Render the pre-commit script
pub fn pre_commit_script(flags: PreCommitFlags) -> String {
    let pm = flags.package_manager;
    let mut sections = vec![HEADER.to_string()];

    if flags.lint_staged {
        sections.push(LINT_STAGED_BLOCK.to_string());
    } else {
        if flags.prettier {
            sections.push(block(
                "Checking formatting...",
                &[format!(
                    "{} || {}",
                    pm.run_script_line("format:check", &[]),
                    pm.run_script_line("format:write", &[])
                )],
            ));
        }
        if flags.eslint {
            sections.push(block(
                "Linting...",
                &[format!(
                    "{} || {}",
                    pm.run_script_line("lint:check", &[]),
                    pm.run_script_line("lint:fix", &[])
                )],
            ));
        }
        if flags.jest {
            sections.push(block(
                "Running tests...",
                &[pm.run_script_line("test", &["--passWithNoTests"])],
            ));
        }
        // tsc is a binary, not a script, so it runs through the exec prefix (npx, bunx, ...)
        if flags.typescript {
            sections.push(block(
                "Type checking...",
                &[pm.exec_argv("tsc", &["--noEmit"]).join(" ")],
            ));
        }
    }

    sections.push(TRAILER.to_string());
    sections.join("\n")
}
