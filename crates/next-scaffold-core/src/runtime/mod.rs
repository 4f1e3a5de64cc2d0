//! Process execution and package-manager handling
//!
//! This module provides:
//! - The `CommandRunner` seam and its child-process implementation
//! - The package-manager abstraction (install verb, dev flag, manifest merge)
//! - Detection of required executables

pub mod check;
pub mod command;
pub mod package_manager;

pub use check::{check_package_manager, check_runtimes, RuntimeInfo};
pub use command::{CommandRunner, Invocation, ProcessRunner};
pub use package_manager::{PackageManager, PackageManagerKind};
