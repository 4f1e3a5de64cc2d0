//! lint-staged rule generation

use crate::options::Options;
use indexmap::IndexMap;

pub const JS_GLOB: &str = "**/*.js?(x)";
pub const TS_GLOB: &str = "**/*.ts?(x)";
pub const DATA_GLOB: &str = "**/*.{md,yml,yaml,json}";
pub const CSS_GLOB: &str = "**/*.{css}";

const PRETTIER_CHECK: &str = "prettier --check";
const PRETTIER_WRITE: &str = "prettier --write";
const ESLINT_CHECK: &str = "eslint";
const ESLINT_FIX: &str = "eslint --fix";
const JEST_CI: &str = "jest --ci";
const TYPE_CHECK: &str = "tsc --noEmit";

/// Flags the lint-staged generator reads
#[derive(Debug, Clone, Copy, Default)]
pub struct LintStagedFlags {
    pub eslint: bool,
    pub jest: bool,
    pub prettier: bool,
    pub typescript: bool,
}

impl From<&Options> for LintStagedFlags {
    fn from(options: &Options) -> Self {
        Self {
            eslint: options.use_eslint,
            jest: options.use_jest,
            prettier: options.use_prettier,
            typescript: options.use_typescript,
        }
    }
}

/// Glob -> ordered commands
pub type LintStagedRules = IndexMap<String, Vec<String>>;

fn script_commands(flags: LintStagedFlags) -> Vec<String> {
    let mut commands = Vec::new();
    if flags.prettier {
        commands.extend([PRETTIER_CHECK, PRETTIER_WRITE]);
    }
    if flags.eslint {
        commands.extend([ESLINT_CHECK, ESLINT_FIX]);
    }
    if flags.jest {
        commands.push(JEST_CI);
    }
    commands.into_iter().map(String::from).collect()
}

/// Build the lint-staged rules; globs without commands are left out
pub fn lint_staged_rules(flags: LintStagedFlags) -> LintStagedRules {
    let mut rules = LintStagedRules::new();
    let mut add = |glob: &str, commands: Vec<String>| {
        if !commands.is_empty() {
            rules.insert(glob.to_string(), commands);
        }
    };

    add(JS_GLOB, script_commands(flags));

    if flags.typescript {
        let mut commands = script_commands(flags);
        commands.push(TYPE_CHECK.to_string());
        add(TS_GLOB, commands);
    }

    if flags.prettier {
        let formatting = || vec![PRETTIER_CHECK.to_string(), PRETTIER_WRITE.to_string()];
        add(DATA_GLOB, formatting());
        add(CSS_GLOB, formatting());
    }

    rules
}
