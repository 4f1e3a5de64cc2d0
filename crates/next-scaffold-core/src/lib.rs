//! Next Scaffold Core - Library behind the `next-scaffold` CLI
//!
//! Turns a set of user choices into a working Next.js project: the app is
//! generated with `create-next-app`, then extended with tooling (ESLint,
//! Prettier, Jest, Storybook, Cypress, Husky, lint-staged, Docker) and a
//! README assembled from markdown fragments.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Pure derivation of the [`config::Config`]
//!   plan, generated config files, template copying, process execution
//! - **Layer 2: Workflow Orchestration** - [`scaffold::Scaffolder`] runs the
//!   stages in order against any [`runtime::CommandRunner`]
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use next_scaffold_core::{Options, Scaffolder, NoProgress, ProcessRunner};
//! use next_scaffold_core::templates::{DirectoryFragments, TemplateRoot};
//!
//! let root = TemplateRoot::load(&TemplateRoot::locate(None)?)?;
//! let options = Options { use_prettier: true, ..Options::default() };
//!
//! let scaffolder = Scaffolder::new(
//!     "my-app",
//!     root.config_dir(),
//!     DirectoryFragments::new(root.markdown_dir()),
//!     ProcessRunner,
//! );
//! scaffolder.run(options, &mut NoProgress).await?;
//! ```

pub mod config;
pub mod error;
pub mod manifest;
pub mod options;
pub mod runtime;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{derive_config, Config, Fragment};
pub use error::{Result, ScaffoldError};
pub use options::{OptionalDependency, Options, PackageManagerKind, ProjectFacts};
pub use runtime::{check_runtimes, CommandRunner, Invocation, ProcessRunner, RuntimeInfo};
pub use scaffold::{NoProgress, Outcome, Scaffolder, Stage, StageObserver};

#[cfg(feature = "tui")]
pub use tui::run;
