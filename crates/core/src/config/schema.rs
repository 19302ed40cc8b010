//! Configuration schema definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    /// `[layout]`
    #[serde(default)]
    pub layout: LayoutConfig,

    /// `[evaluation]`
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// `[project]`
    #[serde(default)]
    pub project: ProjectConfig,
}

impl ConfigSchema {
    /// Check values that deserialize fine but cannot produce a layout
    pub fn validate(&self) -> Result<()> {
        if self.layout.default_build_dir.trim().is_empty() {
            return Err(Error::config_invalid("layout.default_build_dir", "must not be empty"));
        }
        if self.layout.relocate_to.trim().is_empty() {
            return Err(Error::config_invalid("layout.relocate_to", "must not be empty"));
        }
        if Path::new(&self.layout.relocate_to).is_absolute() {
            return Err(Error::config_invalid(
                "layout.relocate_to",
                "must be relative to the root project's default build directory",
            ));
        }
        if self.evaluation.first.trim().is_empty() {
            return Err(Error::config_invalid("evaluation.first", "must not be empty"));
        }
        Ok(())
    }
}

/// Where build output goes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Conventional per-module build directory name
    #[serde(default = "default_build_dir")]
    pub default_build_dir: String,

    /// Relocation target, relative to the root project's default build dir
    #[serde(default = "default_relocate_to")]
    pub relocate_to: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_build_dir: default_build_dir(),
            relocate_to: default_relocate_to(),
        }
    }
}

fn default_build_dir() -> String {
    "build".to_string()
}

fn default_relocate_to() -> String {
    "../../build".to_string()
}

/// Evaluation order settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Module that must be configured before every other module
    #[serde(default = "default_first")]
    pub first: String,

    /// Fail the configuration pass when `first` is missing
    #[serde(default = "default_true")]
    pub enforce: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            first: default_first(),
            enforce: true,
        }
    }
}

fn default_first() -> String {
    "app".to_string()
}

fn default_true() -> bool {
    true
}

/// Project tree discovery
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    /// Settings file to read instead of the usual candidates
    #[serde(default)]
    pub settings_file: Option<String>,

    /// Extra Gradle project paths (e.g. ":app") added after the settings ones
    #[serde(default)]
    pub modules: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let schema = ConfigSchema::default();
        assert!(schema.validate().is_ok());
        assert_eq!(schema.layout.relocate_to, "../../build");
        assert_eq!(schema.evaluation.first, "app");
        assert!(schema.evaluation.enforce);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [evaluation]
            first = "mobile"
            "#,
        )
        .unwrap();
        assert_eq!(schema.evaluation.first, "mobile");
        assert_eq!(schema.layout.default_build_dir, "build");
        assert!(schema.project.modules.is_empty());
    }

    #[test]
    fn test_absolute_relocation_rejected() {
        let mut schema = ConfigSchema::default();
        schema.layout.relocate_to = "/tmp/out".to_string();
        let err = schema.validate().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.message.contains("layout.relocate_to"));
    }

    #[test]
    fn test_empty_first_rejected() {
        let mut schema = ConfigSchema::default();
        schema.evaluation.first = "  ".to_string();
        assert!(schema.validate().is_err());
    }
}
