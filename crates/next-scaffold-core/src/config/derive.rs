//! Configuration derivation
//!
//! [`derive_config`] maps [`Options`] to the plan executed by the scaffolder. It
//! is pure and deterministic: ordering of every list is part of the output.

use crate::options::{Options, PackageManagerKind};
use indexmap::IndexMap;
use std::fmt;

/// Named README fragments, in the order they may appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    Next,
    Cypress,
    Docker,
    Prettier,
    Storybook,
    Jest,
    ReactTestingLibrary,
    LintStaged,
    Git,
    Husky,
    SelectedDependencies,
}

impl Fragment {
    /// Fragment identifier, also the markdown file stem
    pub fn name(&self) -> &'static str {
        match self {
            Fragment::Next => "next",
            Fragment::Cypress => "cypress",
            Fragment::Docker => "docker",
            Fragment::Prettier => "prettier",
            Fragment::Storybook => "storybook",
            Fragment::Jest => "jest",
            Fragment::ReactTestingLibrary => "react-testing-library",
            Fragment::LintStaged => "lint-staged",
            Fragment::Git => "git",
            Fragment::Husky => "husky",
            Fragment::SelectedDependencies => "selected-dependencies",
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const DOCKER_FILES: [&str; 3] = ["docker-compose.yml", "Dockerfile", "Makefile"];

pub const CYPRESS_DIR: &str = "cypress";
pub const STORYBOOK_DIR: &str = ".storybook";

pub const HUSKY_INSTALL: &str = "husky install";

/// Resolved scaffolding plan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Files copied from the template root to the project root
    pub config_template_files: Vec<String>,
    /// Directories copied recursively
    pub config_template_directories: Vec<String>,
    pub package_dependencies: Vec<String>,
    pub package_dev_dependencies: Vec<String>,
    pub package_scripts: IndexMap<String, String>,
    pub markdown: Vec<Fragment>,
}

fn script_ext(options: &Options) -> &'static str {
    if options.use_typescript {
        "ts"
    } else {
        "js"
    }
}

/// The Next config file that is always copied
pub fn next_config_file(options: &Options) -> String {
    format!("next.config.{}", script_ext(options))
}

fn template_files(options: &Options) -> Vec<String> {
    let ext = script_ext(options);
    let mut files = vec![next_config_file(options)];

    if options.use_docker {
        files.extend(DOCKER_FILES.iter().map(|f| f.to_string()));
    }
    if options.use_jest {
        files.push(format!("jest.config.{}", ext));
        files.push(format!("jest.setup.{}", ext));
    }

    files
}

fn template_directories(options: &Options) -> Vec<String> {
    let mut dirs = Vec::new();
    if options.use_cypress {
        dirs.push(CYPRESS_DIR.to_string());
    }
    if options.use_storybook {
        dirs.push(STORYBOOK_DIR.to_string());
    }
    dirs
}

fn dependencies(options: &Options) -> Vec<String> {
    let mut deps = Vec::new();

    if options.use_image_optimisation {
        deps.push("sharp".to_string());
    }

    deps.extend(
        options
            .optional_dependencies
            .iter()
            .filter(|d| !d.save_dev)
            .map(|d| d.module.clone()),
    );
    deps
}

fn dev_dependencies(options: &Options) -> Vec<String> {
    let mut deps: Vec<&str> = Vec::new();

    if options.use_cypress {
        deps.push("cypress");
    }
    if options.use_husky {
        deps.push("husky");
    }
    if options.use_eslint && options.use_typescript {
        deps.extend(["@typescript-eslint/eslint-plugin", "@typescript-eslint/parser"]);
    }
    if options.use_lint_staged {
        deps.push("lint-staged");
    }
    if options.use_prettier {
        deps.extend(["prettier", "@trivago/prettier-plugin-sort-imports"]);
        if options.use_eslint {
            deps.push("eslint-config-prettier");
        }
    }
    if options.use_storybook {
        deps.extend([
            "storybook",
            "@storybook/nextjs",
            "@storybook/react",
            "@storybook/addon-essentials",
            "@storybook/addon-interactions",
            "@storybook/addon-links",
            "@storybook/blocks",
            "@storybook/test",
        ]);
        if options.use_eslint {
            deps.push("eslint-plugin-storybook");
        }
    }
    if options.use_jest {
        deps.extend(["jest", "jest-environment-jsdom"]);
        // jest.config.ts is only loadable through ts-node
        if options.use_typescript {
            deps.extend(["@types/jest", "ts-jest", "ts-node"]);
        }
    }
    if options.use_react_testing_library {
        deps.extend([
            "@testing-library/react",
            "@testing-library/jest-dom",
            "@testing-library/user-event",
        ]);
        if options.use_eslint {
            deps.push("eslint-plugin-testing-library");
        }
    }

    let mut deps: Vec<String> = deps.into_iter().map(String::from).collect();
    deps.extend(
        options
            .optional_dependencies
            .iter()
            .filter(|d| d.save_dev)
            .map(|d| d.module.clone()),
    );
    deps
}

/// Script key under which `husky install` is registered
pub fn husky_script_key(package_manager: PackageManagerKind) -> &'static str {
    match package_manager {
        PackageManagerKind::Yarn => "postinstall",
        _ => "prepare",
    }
}

fn scripts(options: &Options) -> IndexMap<String, String> {
    let pm = options.package_manager;
    let mut scripts: IndexMap<String, String> = IndexMap::new();
    let mut add = |key: &str, command: String| {
        scripts.insert(key.to_string(), command);
    };

    add(
        "build:standalone",
        "BUILD_STANDALONE=true next build".to_string(),
    );
    add(
        "start:standalone",
        "node ./.next/standalone/server.js".to_string(),
    );
    add("build-start", "next build && next start".to_string());
    add(
        "build-start:standalone",
        format!(
            "{} && {}",
            pm.run_script_line("build:standalone", &[]),
            pm.run_script_line("start:standalone", &[])
        ),
    );

    if options.use_eslint {
        add("lint:check", "next lint".to_string());
        add("lint:fix", "next lint --fix".to_string());
    }
    if options.use_prettier {
        add("format:check", "prettier --check .".to_string());
        add("format:write", "prettier --write .".to_string());
    }
    if options.use_jest {
        add("test", "jest".to_string());
        add("test:watch", "jest --watch".to_string());
        add("test:ci", "jest --ci".to_string());
    }
    if options.use_cypress {
        add("e2e", "cypress open --e2e".to_string());
    }
    if options.use_storybook {
        add("storybook", "storybook dev -p 6006".to_string());
        add("build-storybook", "storybook build".to_string());
    }
    if options.use_husky {
        add(husky_script_key(pm), HUSKY_INSTALL.to_string());
    }

    scripts
}

fn markdown(options: &Options) -> Vec<Fragment> {
    let gated = [
        (options.use_cypress, Fragment::Cypress),
        (options.use_docker, Fragment::Docker),
        (options.use_prettier, Fragment::Prettier),
        (options.use_storybook, Fragment::Storybook),
        (options.use_jest, Fragment::Jest),
        (options.use_react_testing_library, Fragment::ReactTestingLibrary),
        (options.use_lint_staged, Fragment::LintStaged),
        (options.use_husky, Fragment::Git),
        (options.use_husky, Fragment::Husky),
        (
            !options.optional_dependencies.is_empty(),
            Fragment::SelectedDependencies,
        ),
    ];

    std::iter::once(Fragment::Next)
        .chain(
            gated
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, fragment)| fragment),
        )
        .collect()
}

/// Derive the scaffolding plan for `options`
pub fn derive_config(options: &Options) -> Config {
    Config {
        config_template_files: template_files(options),
        config_template_directories: template_directories(options),
        package_dependencies: dependencies(options),
        package_dev_dependencies: dev_dependencies(options),
        package_scripts: scripts(options),
        markdown: markdown(options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionalDependency;
    use pretty_assertions::assert_eq;

    fn all_enabled() -> Options {
        Options {
            package_manager: PackageManagerKind::Pnpm,
            use_typescript: true,
            use_eslint: true,
            use_prettier: true,
            use_jest: true,
            use_react_testing_library: true,
            use_lint_staged: true,
            use_husky: true,
            use_storybook: true,
            use_cypress: true,
            use_docker: true,
            use_image_optimisation: true,
            optional_dependencies: vec![dependency("zod", false), dependency("msw", true)],
            ..Options::default()
        }
    }

    fn dependency(module: &str, save_dev: bool) -> OptionalDependency {
        OptionalDependency {
            module: module.to_string(),
            save_dev,
            github: format!("https://github.com/example/{}", module),
            description: format!("{} description", module),
        }
    }

    #[test]
    fn test_empty_options_baseline() {
        let config = derive_config(&Options::default());

        assert_eq!(config.config_template_files, vec!["next.config.js"]);
        assert!(config.config_template_directories.is_empty());
        assert!(config.package_dependencies.is_empty());
        assert!(config.package_dev_dependencies.is_empty());
        assert_eq!(config.markdown, vec![Fragment::Next]);
        assert_eq!(
            config.package_scripts.keys().collect::<Vec<_>>(),
            vec![
                "build:standalone",
                "start:standalone",
                "build-start",
                "build-start:standalone"
            ]
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let options = all_enabled();
        assert_eq!(derive_config(&options), derive_config(&options));
    }

    #[test]
    fn test_jest_without_typescript_skips_ts_packages() {
        let options = Options {
            use_jest: true,
            ..Options::default()
        };
        let config = derive_config(&options);

        assert_eq!(
            config.package_dev_dependencies,
            vec!["jest", "jest-environment-jsdom"]
        );
        assert_eq!(
            config.config_template_files,
            vec!["next.config.js", "jest.config.js", "jest.setup.js"]
        );
    }

    #[test]
    fn test_jest_with_typescript_adds_ts_packages() {
        let options = Options {
            use_jest: true,
            use_typescript: true,
            ..Options::default()
        };
        let config = derive_config(&options);

        assert!(config.package_dev_dependencies.contains(&"@types/jest".to_string()));
        assert!(config.package_dev_dependencies.contains(&"ts-jest".to_string()));
        assert_eq!(
            config.config_template_files,
            vec!["next.config.ts", "jest.config.ts", "jest.setup.ts"]
        );
        // A TypeScript Jest config needs a loader installed alongside it
        assert_eq!(
            config.package_dev_dependencies,
            vec![
                "jest",
                "jest-environment-jsdom",
                "@types/jest",
                "ts-jest",
                "ts-node"
            ]
        );
    }

    #[test]
    fn test_typescript_alone_adds_nothing() {
        let options = Options {
            use_typescript: true,
            ..Options::default()
        };
        assert!(derive_config(&options).package_dev_dependencies.is_empty());
    }

    #[test]
    fn test_eslint_typescript_plugin_needs_both() {
        let eslint_only = Options {
            use_eslint: true,
            ..Options::default()
        };
        assert!(!derive_config(&eslint_only)
            .package_dev_dependencies
            .iter()
            .any(|d| d.starts_with("@typescript-eslint")));

        let both = Options {
            use_eslint: true,
            use_typescript: true,
            ..Options::default()
        };
        assert_eq!(
            derive_config(&both).package_dev_dependencies,
            vec!["@typescript-eslint/eslint-plugin", "@typescript-eslint/parser"]
        );
    }

    #[test]
    fn test_husky_script_key_for_yarn() {
        let options = Options {
            package_manager: PackageManagerKind::Yarn,
            use_husky: true,
            ..Options::default()
        };
        let scripts = derive_config(&options).package_scripts;

        assert_eq!(scripts.get("postinstall").map(String::as_str), Some("husky install"));
        assert!(!scripts.contains_key("prepare"));
    }

    #[test]
    fn test_husky_script_key_for_other_managers() {
        for kind in [
            PackageManagerKind::Npm,
            PackageManagerKind::Pnpm,
            PackageManagerKind::Bun,
        ] {
            let options = Options {
                package_manager: kind,
                use_husky: true,
                ..Options::default()
            };
            let scripts = derive_config(&options).package_scripts;

            assert_eq!(scripts.get("prepare").map(String::as_str), Some("husky install"));
            assert!(!scripts.contains_key("postinstall"));
        }
    }

    #[test]
    fn test_optional_dependency_split() {
        let options = Options {
            optional_dependencies: vec![dependency("a", true), dependency("b", false)],
            ..Options::default()
        };
        let config = derive_config(&options);

        assert_eq!(config.package_dependencies, vec!["b"]);
        assert_eq!(config.package_dev_dependencies, vec!["a"]);
        assert_eq!(config.markdown.last(), Some(&Fragment::SelectedDependencies));
    }

    #[test]
    fn test_optional_dependencies_keep_selection_order() {
        let options = Options {
            use_cypress: true,
            optional_dependencies: vec![
                dependency("c", true),
                dependency("a", true),
                dependency("b", true),
            ],
            ..Options::default()
        };
        assert_eq!(
            derive_config(&options).package_dev_dependencies,
            vec!["cypress", "c", "a", "b"]
        );
    }

    #[test]
    fn test_dev_dependency_precedence() {
        let config = derive_config(&all_enabled());

        let position = |name: &str| {
            config
                .package_dev_dependencies
                .iter()
                .position(|d| d == name)
                .unwrap_or_else(|| panic!("{name} missing"))
        };

        let order = [
            "cypress",
            "husky",
            "@typescript-eslint/eslint-plugin",
            "lint-staged",
            "prettier",
            "storybook",
            "jest",
            "@testing-library/react",
            "msw",
        ];
        for pair in order.windows(2) {
            assert!(position(pair[0]) < position(pair[1]), "{:?}", pair);
        }
        assert_eq!(config.package_dependencies, vec!["sharp", "zod"]);
    }

    #[test]
    fn test_markdown_order_with_everything_enabled() {
        assert_eq!(
            derive_config(&all_enabled()).markdown,
            vec![
                Fragment::Next,
                Fragment::Cypress,
                Fragment::Docker,
                Fragment::Prettier,
                Fragment::Storybook,
                Fragment::Jest,
                Fragment::ReactTestingLibrary,
                Fragment::LintStaged,
                Fragment::Git,
                Fragment::Husky,
                Fragment::SelectedDependencies,
            ]
        );
    }

    #[test]
    fn test_template_lists_with_everything_enabled() {
        let config = derive_config(&all_enabled());

        assert_eq!(
            config.config_template_files,
            vec![
                "next.config.ts",
                "docker-compose.yml",
                "Dockerfile",
                "Makefile",
                "jest.config.ts",
                "jest.setup.ts"
            ]
        );
        assert_eq!(config.config_template_directories, vec!["cypress", ".storybook"]);
    }

    #[test]
    fn test_feature_script_groups() {
        let config = derive_config(&all_enabled());
        let keys: Vec<&str> = config.package_scripts.keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec![
                "build:standalone",
                "start:standalone",
                "build-start",
                "build-start:standalone",
                "lint:check",
                "lint:fix",
                "format:check",
                "format:write",
                "test",
                "test:watch",
                "test:ci",
                "e2e",
                "storybook",
                "build-storybook",
                "prepare",
            ]
        );
        assert_eq!(
            config.package_scripts["build-start:standalone"],
            "pnpm run build:standalone && pnpm run start:standalone"
        );
    }

    #[test]
    fn test_fragment_names() {
        assert_eq!(Fragment::ReactTestingLibrary.to_string(), "react-testing-library");
        assert_eq!(Fragment::SelectedDependencies.name(), "selected-dependencies");
    }
}
