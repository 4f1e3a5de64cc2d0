//! Markdown fragment sources for README assembly

use crate::config::Fragment;
use crate::error::{Result, ScaffoldError};
use std::future::Future;
use std::path::PathBuf;
use tokio::fs;

/// Supplies markdown for a named fragment
pub trait FragmentSource: Send + Sync {
    fn fragment(&self, fragment: Fragment) -> impl Future<Output = Result<String>> + Send;
}

/// Reads `<dir>/<fragment-name>.md`
#[derive(Debug, Clone)]
pub struct DirectoryFragments {
    dir: PathBuf,
}

impl DirectoryFragments {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, fragment: Fragment) -> PathBuf {
        self.dir.join(format!("{}.md", fragment.name()))
    }
}

impl FragmentSource for DirectoryFragments {
    async fn fragment(&self, fragment: Fragment) -> Result<String> {
        let path = self.path_for(fragment);
        fs::read_to_string(&path)
            .await
            .map_err(|source| ScaffoldError::ReadmeAssembly { path, source })
    }
}
