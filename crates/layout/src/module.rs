//! Project tree: the root project and its named subprojects

use crate::assignment::BuildDirectoryAssignment;
use outdir_core::error::{Error, ErrorCode, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A validated module name.
///
/// The name becomes a directory under the shared build root, so it must be
/// a single non-empty path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    /// Validate and wrap a module name
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::empty_module_name());
        }
        if name == "." || name == ".." || name.contains(['/', '\\', ':']) {
            return Err(Error::new(
                ErrorCode::InvalidPath,
                format!("Module name '{}' is not a single path segment", name),
            ));
        }
        Ok(Self(name))
    }

    /// The name as a plain string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A project in the tree with its current build directory setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: ModuleName,
    dir: PathBuf,
    build_dir: PathBuf,
    relocated: bool,
}

impl Module {
    /// Create a module whose build directory is still the conventional
    /// `<dir>/<default_build_dir>`.
    pub fn new(name: ModuleName, dir: impl Into<PathBuf>, default_build_dir: &str) -> Self {
        let dir = dir.into();
        let build_dir = dir.join(default_build_dir);
        Self {
            name,
            dir,
            build_dir,
            relocated: false,
        }
    }

    /// Project name
    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Project directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Current build directory
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Whether `apply_build_dir` has been called
    pub fn is_relocated(&self) -> bool {
        self.relocated
    }

    /// Point this module's output at `path`
    pub fn apply_build_dir(&mut self, path: impl Into<PathBuf>) {
        self.build_dir = path.into();
        self.relocated = true;
    }
}

/// Root project plus ordered, uniquely named subprojects
#[derive(Debug, Clone)]
pub struct ProjectTree {
    location: PathBuf,
    root: Module,
    subprojects: Vec<Module>,
}

impl ProjectTree {
    /// Create a tree with no subprojects.
    ///
    /// `location` is the root project's directory and the reference point
    /// for the relocated build root.
    pub fn new(location: impl Into<PathBuf>, root_name: ModuleName, default_build_dir: &str) -> Self {
        let location = location.into();
        let root = Module::new(root_name, location.clone(), default_build_dir);
        Self {
            location,
            root,
            subprojects: Vec::new(),
        }
    }

    /// Build a tree whose subprojects live directly under `location`.
    pub fn with_modules<I, S>(
        location: impl Into<PathBuf>,
        root_name: ModuleName,
        default_build_dir: &str,
        names: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tree = Self::new(location, root_name, default_build_dir);
        for name in names {
            let name = ModuleName::new(name)?;
            let dir = tree.location.join(name.as_str());
            tree.add_module(Module::new(name, dir, default_build_dir))?;
        }
        Ok(tree)
    }

    /// Append a subproject; names must be unique across the whole tree,
    /// root project included
    pub fn add_module(&mut self, module: Module) -> Result<()> {
        if module.name == self.root.name || self.find(module.name.as_str()).is_some() {
            return Err(Error::duplicate_module(module.name.as_str()));
        }
        self.subprojects.push(module);
        Ok(())
    }

    /// Root project directory
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// The root project
    pub fn root(&self) -> &Module {
        &self.root
    }

    /// Subprojects in declaration order
    pub fn subprojects(&self) -> &[Module] {
        &self.subprojects
    }

    /// Look up a subproject by name
    pub fn find(&self, name: &str) -> Option<&Module> {
        self.subprojects.iter().find(|m| m.name.as_str() == name)
    }

    /// Apply an assignment to the whole tree: root first, then every
    /// subproject in declaration order.
    pub fn apply(&mut self, assignment: &BuildDirectoryAssignment) -> Result<()> {
        self.apply_root(assignment);
        let names: Vec<ModuleName> = self.subprojects.iter().map(|m| m.name.clone()).collect();
        for name in &names {
            self.apply_subproject(name.as_str(), assignment)?;
        }
        Ok(())
    }

    /// Relocate the root project's build directory
    pub fn apply_root(&mut self, assignment: &BuildDirectoryAssignment) {
        self.root.apply_build_dir(assignment.root());
    }

    /// Relocate one subproject.
    ///
    /// Fails unless the root project already points at the assignment's
    /// root, since subproject directories live beneath it.
    pub fn apply_subproject(&mut self, name: &str, assignment: &BuildDirectoryAssignment) -> Result<()> {
        if !self.root.relocated || self.root.build_dir.as_path() != assignment.root() {
            return Err(Error::new(
                ErrorCode::LayoutError,
                format!(
                    "Cannot relocate '{}' before the root build directory is applied",
                    name
                ),
            ));
        }
        let path = assignment
            .module(name)
            .ok_or_else(|| Error::unknown_module(name))?
            .to_path_buf();
        let module = self
            .subprojects
            .iter_mut()
            .find(|m| m.name.as_str() == name)
            .ok_or_else(|| Error::unknown_module(name))?;
        module.apply_build_dir(path);
        Ok(())
    }
}
