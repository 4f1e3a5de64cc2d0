//! ESLint configuration generation

use crate::options::Options;
use indexmap::IndexMap;
use serde::Serialize;

pub const ESLINT_CONFIG_FILE: &str = ".eslintrc.json";

const TEST_FILE_GLOBS: [&str; 2] = ["**/__tests__/**/*.[jt]s?(x)", "**/*.(spec|test).[jt]s?(x)"];

/// Flags the ESLint generator reads
#[derive(Debug, Clone, Copy, Default)]
pub struct EslintFlags {
    pub eslint: bool,
    pub react_testing_library: bool,
    pub prettier: bool,
    pub storybook: bool,
    pub typescript: bool,
}

impl From<&Options> for EslintFlags {
    fn from(options: &Options) -> Self {
        Self {
            eslint: options.use_eslint,
            react_testing_library: options.use_react_testing_library,
            prettier: options.use_prettier,
            storybook: options.use_storybook,
            typescript: options.use_typescript,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EslintOverride {
    pub files: Vec<String>,
    pub extends: Vec<String>,
}

/// `.eslintrc.json` contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EslintConfig {
    pub root: bool,
    pub extends: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub rules: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<EslintOverride>,
}

/// Build the ESLint config, or `None` when ESLint is disabled
pub fn eslint_config(flags: EslintFlags) -> Option<EslintConfig> {
    if !flags.eslint {
        return None;
    }

    let mut extends = vec!["next/core-web-vitals".to_string()];
    let mut plugins = Vec::new();
    let mut rules = IndexMap::new();
    let mut overrides = Vec::new();

    if flags.typescript {
        plugins.push("@typescript-eslint".to_string());
        extends.push("plugin:@typescript-eslint/recommended".to_string());
        rules.insert(
            "@typescript-eslint/no-unused-vars".to_string(),
            "error".to_string(),
        );
        rules.insert(
            "@typescript-eslint/no-explicit-any".to_string(),
            "error".to_string(),
        );
    }

    if flags.storybook {
        extends.push("plugin:storybook/recommended".to_string());
    }

    if flags.react_testing_library {
        plugins.push("testing-library".to_string());
        overrides.push(EslintOverride {
            files: TEST_FILE_GLOBS.iter().map(|g| g.to_string()).collect(),
            extends: vec!["plugin:testing-library/react".to_string()],
        });
    }

    // Must stay last so it switches off conflicting style rules.
    if flags.prettier {
        extends.push("prettier".to_string());
    }

    Some(EslintConfig {
        root: true,
        extends,
        plugins,
        rules,
        overrides,
    })
}
