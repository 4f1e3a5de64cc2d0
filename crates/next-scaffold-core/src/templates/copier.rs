//! Copying template files and directories into the project

use crate::error::{Result, ScaffoldError};
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

fn copy_error(path: &Path) -> impl FnOnce(std::io::Error) -> ScaffoldError + '_ {
    move |source| ScaffoldError::TemplateCopy {
        path: path.to_path_buf(),
        source,
    }
}

async fn ensure_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await.map_err(copy_error(parent))?;
    }
    Ok(())
}

/// Copy one file, creating parent directories. Returns the written path.
pub async fn copy_file(source: &Path, target: &Path) -> Result<PathBuf> {
    if !fs::try_exists(source).await.unwrap_or(false) {
        return Err(ScaffoldError::TemplateCopy {
            path: source.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "template file not found"),
        });
    }

    ensure_parent(target).await?;
    fs::copy(source, target).await.map_err(copy_error(target))?;
    debug!(from = %source.display(), to = %target.display(), "copied");
    Ok(target.to_path_buf())
}

/// Entries under `source` relative to it, directories flagged, in file-name order
fn walk_entries(source: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ScaffoldError::TemplateCopy {
            path: e.path().unwrap_or(source).to_path_buf(),
            source: e.into(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or(entry.path())
            .to_path_buf();
        entries.push((relative, entry.file_type().is_dir()));
    }
    Ok(entries)
}

/// Recursively copy a directory. Returns the written file paths.
/// The walk runs on the blocking pool; copies stay on the async runtime.
pub async fn copy_directory(source: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    let is_dir = fs::metadata(source)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(ScaffoldError::TemplateCopy {
            path: source.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "template directory not found",
            ),
        });
    }

    let walk_root = source.to_path_buf();
    let entries = tokio::task::spawn_blocking(move || walk_entries(&walk_root))
        .await
        .map_err(|e| ScaffoldError::TemplateCopy {
            path: source.to_path_buf(),
            source: std::io::Error::other(e),
        })??;

    let mut files = Vec::new();
    for (relative, is_dir) in entries {
        let destination = target.join(&relative);
        if is_dir {
            fs::create_dir_all(&destination)
                .await
                .map_err(copy_error(&destination))?;
        } else {
            files.push(copy_file(&source.join(&relative), &destination).await?);
        }
    }

    Ok(files)
}

/// Copy named files and directories from `template_dir` into `project_dir`.
/// Entries are copied concurrently; all must succeed.
pub async fn copy_template(
    template_dir: &Path,
    project_dir: &Path,
    files: &[String],
    directories: &[String],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(project_dir)
        .await
        .map_err(copy_error(project_dir))?;

    let file_copies = try_join_all(
        files
            .iter()
            .map(|name| copy_file_owned(template_dir.join(name), project_dir.join(name))),
    );
    let dir_copies = try_join_all(
        directories
            .iter()
            .map(|name| copy_directory_owned(template_dir.join(name), project_dir.join(name))),
    );

    let (copied_files, copied_dirs) = futures::try_join!(file_copies, dir_copies)?;

    let mut written = copied_files;
    written.extend(copied_dirs.into_iter().flatten());
    Ok(written)
}

async fn copy_file_owned(source: PathBuf, target: PathBuf) -> Result<PathBuf> {
    copy_file(&source, &target).await
}

async fn copy_directory_owned(source: PathBuf, target: PathBuf) -> Result<Vec<PathBuf>> {
    copy_directory(&source, &target).await
}

/// Create each file empty unless it already exists
pub async fn touch_files(project_dir: &Path, names: impl IntoIterator<Item = &str>) -> Result<()> {
    for name in names {
        let path = project_dir.join(name);
        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "keeping existing file");
            continue;
        }
        fs::write(&path, "").await.map_err(copy_error(&path))?;
    }
    Ok(())
}
