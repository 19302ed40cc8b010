//! Project tree discovery
//!
//! Turns Gradle project paths (`:app`, `:core:network`) into layout
//! modules. A project's name is the last path segment and its directory
//! mirrors the path below the root project, which is what Gradle does when
//! `projectDir` is not overridden.

use crate::settings::{find_settings_file, Settings};
use outdir_core::config::ConfigSchema;
use outdir_core::error::{Error, ErrorCode, Result, ResultExt};
use outdir_layout::{Module, ModuleName, ProjectTree};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Gradle's separator between project path segments
pub const PATH_SEPARATOR: char = ':';

/// A parsed Gradle project path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPath {
    segments: Vec<String>,
}

impl ProjectPath {
    /// Parse `:a:b`, `a:b` or `a`. Paths are always taken relative to the
    /// root project.
    pub fn parse(path: &str) -> Result<Self> {
        let segments: Vec<String> = path
            .split(PATH_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if segments.is_empty() {
            return Err(Error::empty_module_name().with_context(format!("Project path '{}'", path)));
        }
        Ok(Self { segments })
    }

    /// Project name: the last segment
    pub fn name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Default project directory below `root`
    pub fn dir_under(&self, root: &Path) -> PathBuf {
        self.segments.iter().fold(root.to_path_buf(), |dir, s| dir.join(s))
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{}", self.segments.join(":"))
    }
}

/// Build a project tree for the Gradle build at `location`.
///
/// Includes come from the settings script (the configured one, or the
/// first of [`crate::settings::SETTINGS_FILES`]) followed by
/// `[project].modules`. The same path listed twice is kept once; two
/// different paths whose names collide are a duplicate-module error.
pub fn load_project_tree(location: &Path, config: &ConfigSchema) -> Result<ProjectTree> {
    let settings = match &config.project.settings_file {
        Some(file) => Settings::load(&location.join(file))?,
        None => match find_settings_file(location) {
            Some(path) => Settings::load(&path)?,
            None => {
                warn!(location = %location.display(), "no Gradle settings file found");
                Settings::default()
            }
        },
    };

    let root_name = root_project_name(location, &settings)?;
    let default_build_dir = &config.layout.default_build_dir;
    let mut tree = ProjectTree::new(location, root_name, default_build_dir);

    let mut seen: Vec<ProjectPath> = Vec::new();
    for raw in settings.includes.iter().chain(config.project.modules.iter()) {
        let path = ProjectPath::parse(raw)?;
        if seen.contains(&path) {
            continue;
        }
        let name = ModuleName::new(path.name()).context(format!("Project path '{}'", raw))?;
        debug!(path = %path, name = %name, "discovered project");
        tree.add_module(Module::new(name, path.dir_under(location), default_build_dir))
            .context(format!("While adding project '{}'", path))?;
        seen.push(path);
    }

    Ok(tree)
}

fn root_project_name(location: &Path, settings: &Settings) -> Result<ModuleName> {
    let name = settings
        .root_name
        .clone()
        .or_else(|| {
            location
                .file_name()
                .and_then(|n| n.to_str())
                .map(String::from)
        })
        .unwrap_or_else(|| "root".to_string());
    ModuleName::new(name).map_err(|e| {
        Error::new(ErrorCode::ConfigValidationError, e.message).with_context("Root project name")
    })
}
