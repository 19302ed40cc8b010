//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file names probed in the project directory, in order
pub const CANDIDATES: [&str; 3] = [".outdir.toml", "outdir.toml", ".config/outdir.toml"];

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed and validated values
    pub schema: ConfigSchema,
    /// File the values came from; `None` for defaults
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, or from the first candidate
    /// found in `project_dir`, or fall back to defaults.
    ///
    /// An explicit path that does not exist is an error; missing candidates
    /// are not.
    pub fn load(explicit: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let config_path = match explicit {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(project_dir),
        };

        let schema = if let Some(ref p) = config_path {
            debug!(path = %p.display(), "loading config");
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };
        schema.validate()?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Load with defaults only (no file)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file(project_dir: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|candidate| project_dir.join(candidate))
        .find(|path| path.is_file())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("While parsing {}", path.display()))
    })
}
