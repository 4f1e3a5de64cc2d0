//! Prettier configuration and ignore file

use crate::options::Options;
use serde::Serialize;

pub const PRETTIER_CONFIG_FILE: &str = ".prettierrc.json";
pub const PRETTIER_IGNORE_FILE: &str = ".prettierignore";

const IGNORED_PATHS: [&str; 8] = [
    ".next",
    ".cache",
    "package-lock.json",
    "public",
    "node_modules",
    "next-env.d.ts",
    "next.config.ts",
    "yarn.lock",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrettierConfig {
    pub semi: bool,
    pub trailing_comma: &'static str,
    pub single_quote: bool,
    pub tab_width: u8,
    pub plugins: Vec<&'static str>,
    pub import_order_separation: bool,
    pub import_order: Vec<&'static str>,
}

pub fn prettier_config(options: &Options) -> PrettierConfig {
    PrettierConfig {
        semi: options.semicolons,
        trailing_comma: "es5",
        single_quote: true,
        tab_width: 2,
        plugins: vec!["@trivago/prettier-plugin-sort-imports"],
        import_order_separation: true,
        import_order: vec!["^[./]"],
    }
}

pub fn prettier_ignore() -> String {
    IGNORED_PATHS.join("\n")
}
