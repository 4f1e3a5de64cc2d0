//! Template assets, README fragments and the optional dependency catalog
//!
//! This module provides:
//! - The template root layout (`template.yaml`, config assets, markdown fragments)
//! - Concurrent copying of template files and directories
//! - README assembly from named fragments
//! - Version compatibility checking between the CLI and the template set

pub mod catalog;
pub mod copier;
pub mod fragments;
pub mod manifest;
pub mod readme;
pub mod version;

pub use catalog::load_catalog;
pub use copier::{copy_template, touch_files};
pub use fragments::{DirectoryFragments, FragmentSource};
pub use manifest::{TemplateManifest, TemplateRoot, TEMPLATE_DIR_ENV};
pub use readme::{assemble_readme, dependency_table, README_FILE};
pub use version::check_compatibility;
