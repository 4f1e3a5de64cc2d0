//! README assembly from markdown fragments

use crate::config::Fragment;
use crate::error::Result;
use crate::options::OptionalDependency;
use crate::templates::fragments::FragmentSource;

pub const README_FILE: &str = "README.md";

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Markdown table of the selected optional dependencies, in selection order
pub fn dependency_table(dependencies: &[OptionalDependency]) -> String {
    let mut table = String::from("| Package | Description | Type |\n| --- | --- | --- |\n");
    for dependency in dependencies {
        let kind = if dependency.save_dev {
            "devDependency"
        } else {
            "dependency"
        };
        table.push_str(&format!(
            "| [{}]({}) | {} | {} |\n",
            dependency.module,
            dependency.github,
            escape_cell(&dependency.description),
            kind
        ));
    }
    table
}

/// Join the named fragments with a blank line, then append the dependency
/// table when any optional dependency was selected
pub async fn assemble_readme<S: FragmentSource>(
    source: &S,
    fragments: &[Fragment],
    dependencies: &[OptionalDependency],
) -> Result<String> {
    let mut parts = Vec::with_capacity(fragments.len() + 1);
    for fragment in fragments {
        let content = source.fragment(*fragment).await?;
        parts.push(content.trim_end().to_string());
    }

    if !dependencies.is_empty() {
        parts.push(dependency_table(dependencies).trim_end().to_string());
    }

    let mut readme = parts.join("\n\n");
    readme.push('\n');
    Ok(readme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScaffoldError;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    struct Fixed;

    impl FragmentSource for Fixed {
        async fn fragment(&self, fragment: Fragment) -> Result<String> {
            match fragment {
                Fragment::Docker => Err(ScaffoldError::ReadmeAssembly {
                    path: PathBuf::from("docker.md"),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
                other => Ok(format!("# {}\n\n", other.name())),
            }
        }
    }

    fn dependency(module: &str, save_dev: bool) -> OptionalDependency {
        OptionalDependency {
            module: module.to_string(),
            save_dev,
            github: format!("https://github.com/example/{}", module),
            description: format!("{} | helper", module),
        }
    }

    #[tokio::test]
    async fn test_fragments_joined_in_order() {
        let readme = assemble_readme(&Fixed, &[Fragment::Next, Fragment::Jest], &[])
            .await
            .unwrap();

        assert_eq!(readme, "# next\n\n# jest\n");
    }

    #[tokio::test]
    async fn test_dependency_table_appended() {
        let deps = vec![dependency("zod", false), dependency("msw", true)];
        let readme = assemble_readme(
            &Fixed,
            &[Fragment::Next, Fragment::SelectedDependencies],
            &deps,
        )
        .await
        .unwrap();

        let expected = "# next\n\n# selected-dependencies\n\n\
| Package | Description | Type |\n\
| --- | --- | --- |\n\
| [zod](https://github.com/example/zod) | zod \\| helper | dependency |\n\
| [msw](https://github.com/example/msw) | msw \\| helper | devDependency |\n";
        assert_eq!(readme, expected);
    }

    #[tokio::test]
    async fn test_missing_fragment_aborts() {
        let err = assemble_readme(&Fixed, &[Fragment::Next, Fragment::Docker], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::ReadmeAssembly { .. }));
    }
}
