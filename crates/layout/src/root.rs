//! Root build directory resolution
//!
//! The shared root is derived from the project location by walking a
//! relative path from the root project's default build directory. With the
//! defaults (`build` then `../../build`) a project at `/work/proj` gets its
//! output at `/work/build`.

use crate::module::ModuleName;
use outdir_core::config::LayoutConfig;
use std::path::{Component, Path, PathBuf};

/// How the shared root is derived from a project location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationRule {
    default_build_dir: PathBuf,
    relocate_to: PathBuf,
}

impl Default for RelocationRule {
    fn default() -> Self {
        Self {
            default_build_dir: PathBuf::from("build"),
            relocate_to: PathBuf::from("../../build"),
        }
    }
}

impl RelocationRule {
    /// Rule relocating `<location>/<default_build_dir>` by `relocate_to`
    pub fn new(default_build_dir: impl Into<PathBuf>, relocate_to: impl Into<PathBuf>) -> Self {
        Self {
            default_build_dir: default_build_dir.into(),
            relocate_to: relocate_to.into(),
        }
    }

    /// Rule from the `[layout]` config table
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(&config.default_build_dir, &config.relocate_to)
    }

    /// Conventional build directory name this rule relocates away from
    pub fn default_build_dir(&self) -> &Path {
        &self.default_build_dir
    }

    /// Where the root project would build without relocation
    pub fn default_location(&self, location: &Path) -> PathBuf {
        normalize(&location.join(&self.default_build_dir))
    }

    /// Resolve the shared root for a project at `location`.
    ///
    /// Pure path arithmetic; the file system is never consulted.
    pub fn resolve(&self, location: &Path) -> ResolvedRoot {
        let raw = location.join(&self.default_build_dir).join(&self.relocate_to);
        ResolvedRoot(normalize(&raw))
    }
}

/// Shared build root for a project at `location`, using the default rule
pub fn compute_root_directory(location: &Path) -> PathBuf {
    RelocationRule::default().resolve(location).into_path_buf()
}

/// A root build directory that has been resolved.
///
/// Only [`RelocationRule::resolve`] produces one, so a module directory can
/// never be computed before the root is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedRoot(PathBuf);

impl ResolvedRoot {
    /// The root directory
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// `<root>/<module name>`
    pub fn module_dir(&self, name: &ModuleName) -> PathBuf {
        self.0.join(name.as_str())
    }

    /// Unwrap into the root directory
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ResolvedRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Lexically collapse `.` and `..` components.
///
/// `..` at the file-system root stays at the root; leading `..` on a
/// relative path is kept.
fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}
