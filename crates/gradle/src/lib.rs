//! Gradle project discovery for outdir
//!
//! This crate reads the project structure of a Gradle build:
//! - Settings script parsing (`include`, `rootProject.name`)
//! - Project path to module name/directory mapping
//! - Project tree construction for the layout engine

#![warn(missing_docs)]

pub mod project;
pub mod settings;

pub use project::{load_project_tree, ProjectPath};
pub use settings::{find_settings_file, Settings};
