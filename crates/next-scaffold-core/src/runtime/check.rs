//! Detection of the executables a run depends on (Node.js, the package manager, git)

use crate::runtime::package_manager::PackageManagerKind;
use anyhow::Result;
use std::process::Command;

/// Executable detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Probe `<program> --version`
pub fn check_executable(name: &'static str, program: &str) -> RuntimeInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

pub fn check_node() -> RuntimeInfo {
    check_executable("Node.js", "node")
}

pub fn check_git() -> RuntimeInfo {
    check_executable("git", "git")
}

pub fn check_package_manager(kind: PackageManagerKind) -> RuntimeInfo {
    check_executable(kind.command(), kind.command())
}

fn install_hint(kind: PackageManagerKind) -> &'static str {
    match kind {
        PackageManagerKind::Npm => "npm (ships with Node.js, https://nodejs.org)",
        PackageManagerKind::Yarn => "yarn (corepack enable, or https://yarnpkg.com)",
        PackageManagerKind::Pnpm => "pnpm (corepack enable, or https://pnpm.io)",
        PackageManagerKind::Bun => "bun (https://bun.sh)",
    }
}

/// Check everything the run will shell out to; fails listing what is missing.
/// Bun projects do not need Node.js to be installed.
pub fn check_runtimes(kind: PackageManagerKind, needs_git: bool) -> Result<Vec<RuntimeInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    if kind != PackageManagerKind::Bun {
        let node = check_node();
        if node.available {
            results.push(node);
        } else {
            missing.push("Node.js (install from https://nodejs.org)");
        }
    }

    let package_manager = check_package_manager(kind);
    if package_manager.available {
        results.push(package_manager);
    } else {
        missing.push(install_hint(kind));
    }

    if needs_git {
        let git = check_git();
        if git.available {
            results.push(git);
        } else {
            missing.push("git (install from https://git-scm.com)");
        }
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}
