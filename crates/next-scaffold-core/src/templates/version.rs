//! CLI / template-set compatibility

use semver::Version;

fn parse_loose(version: &str) -> Option<Version> {
    Version::parse(version.trim().trim_start_matches('v')).ok()
}

/// Warn when the running CLI is older than the template set requires.
/// Unparseable versions never warn.
pub fn check_compatibility(cli_version: &str, min_cli_version: Option<&str>) -> Option<String> {
    let required = parse_loose(min_cli_version?)?;
    let running = parse_loose(cli_version)?;

    (running < required).then(|| {
        format!(
            "These templates need next-scaffold {} or newer (running {}). \
             Update with: cargo install next-scaffold --force",
            required, running
        )
    })
}
