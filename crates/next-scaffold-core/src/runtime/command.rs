//! External process execution
//!
//! Everything that shells out (package installs, `create-next-app`, git, husky,
//! formatting) goes through [`CommandRunner`] so the pipeline can be exercised
//! without touching the real toolchain.

use crate::error::{Result, ScaffoldError};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

/// A fully-specified process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Build an invocation from a command line whose first element is the program
    pub fn from_argv(argv: Vec<String>, cwd: &Path) -> Self {
        let mut parts = argv.into_iter();
        let program = parts.next().unwrap_or_default();
        Self::new(program, parts, cwd)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external commands; a non-zero exit is reported as [`ScaffoldError::Install`]
pub trait CommandRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<()>> + Send;
}

impl<R: CommandRunner> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> impl Future<Output = Result<()>> + Send {
        (**self).run(invocation)
    }
}

/// Runs commands as child processes, forwarding their output to the debug log
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        info!(command = %invocation, cwd = %invocation.cwd.display(), "running");

        let mut child = TokioCommand::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ScaffoldError::Install {
                command: invocation.to_string(),
                code: None,
                stderr: e.to_string(),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let stdout_task = async {
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "next_scaffold::process", "{}", line);
                }
            }
        };

        let stderr_task = async {
            let mut captured = String::new();
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(target: "next_scaffold::process", "{}", line);
                    captured.push_str(&line);
                    captured.push('\n');
                }
            }
            captured
        };

        let ((), captured) = tokio::join!(stdout_task, stderr_task);

        let status = child.wait().await.map_err(|e| ScaffoldError::Install {
            command: invocation.to_string(),
            code: None,
            stderr: e.to_string(),
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ScaffoldError::Install {
                command: invocation.to_string(),
                code: status.code(),
                stderr: captured.trim_end().to_string(),
            })
        }
    }
}
