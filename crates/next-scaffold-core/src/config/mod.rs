//! Configuration derivation and generated tool configs
//!
//! - `derive`: the pure `Options -> Config` plan
//! - `eslint`, `lint_staged`, `pre_commit`, `prettier`: generators that read
//!   `Options` directly and render the files written into the project

pub mod derive;
pub mod eslint;
pub mod lint_staged;
pub mod pre_commit;
pub mod prettier;

pub use derive::{derive_config, husky_script_key, Config, Fragment};
pub use eslint::{eslint_config, EslintConfig, EslintFlags, ESLINT_CONFIG_FILE};
pub use lint_staged::{lint_staged_rules, LintStagedFlags, LintStagedRules};
pub use pre_commit::{pre_commit_script, PreCommitFlags, PRE_COMMIT_FILE};
pub use prettier::{prettier_config, prettier_ignore, PRETTIER_CONFIG_FILE, PRETTIER_IGNORE_FILE};
