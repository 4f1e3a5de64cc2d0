//! Error kinds raised by the scaffolding pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Boxed source for errors that can come from either I/O or parsing
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// A package-manager or tool invocation exited unsuccessfully (or never started)
    #[error("`{command}` failed{}: {stderr}", .code.map(|c| format!(" with exit code {}", c)).unwrap_or_default())]
    Install {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The package manifest could not be read, parsed or written
    #[error("failed to {action} package manifest {}", .path.display())]
    ManifestIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: BoxedSource,
    },

    /// A template asset was missing or the destination was not writable
    #[error("failed to copy template {}", .path.display())]
    TemplateCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A markdown fragment was missing or the README could not be written
    #[error("failed to assemble README from {}", .path.display())]
    ReadmeAssembly {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Options that cannot describe a project (e.g. an unknown package manager)
    #[error("invalid options: {0}")]
    Derivation(String),
}

impl ScaffoldError {
    pub(crate) fn manifest(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: impl Into<BoxedSource>,
    ) -> Self {
        Self::ManifestIo {
            action,
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
