//! Core utilities for outdir
//!
//! Shared functionality used by the layout engine, the Gradle reader and the
//! CLI:
//!
//! - **Error handling**: errors with codes, context, and recovery suggestions
//! - **Configuration**: TOML-based configuration with validation
//!
//! # Example
//!
//! ```rust,no_run
//! use outdir_core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(None, Path::new(".")).expect("invalid config");
//! println!("relocating to {}", config.schema.layout.relocate_to);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};
