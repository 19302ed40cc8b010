//! Build directory assignment
//!
//! An immutable mapping from every module (root included) to its output
//! directory, computed once per configuration pass.

use crate::module::{ModuleName, ProjectTree};
use crate::root::ResolvedRoot;
use outdir_core::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One module's assigned output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedDir {
    /// Module the directory belongs to
    pub name: ModuleName,
    /// Assigned build directory
    pub path: PathBuf,
}

/// Output directories for a whole project tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildDirectoryAssignment {
    root: AssignedDir,
    modules: Vec<AssignedDir>,
}

impl BuildDirectoryAssignment {
    /// Assign `<root>/<name>` to every subproject of `tree`.
    ///
    /// Names are already unique within a [`ProjectTree`], so every path is
    /// distinct.
    pub fn compute(tree: &ProjectTree, root: &ResolvedRoot) -> Self {
        let modules = tree
            .subprojects()
            .iter()
            .map(|module| AssignedDir {
                name: module.name().clone(),
                path: root.module_dir(module.name()),
            })
            .collect();

        Self {
            root: AssignedDir {
                name: tree.root().name().clone(),
                path: root.path().to_path_buf(),
            },
            modules,
        }
    }

    /// The shared root directory
    pub fn root(&self) -> &Path {
        &self.root.path
    }

    /// Name of the root project
    pub fn root_name(&self) -> &ModuleName {
        &self.root.name
    }

    /// Directory assigned to a subproject
    pub fn module(&self, name: &str) -> Option<&Path> {
        self.modules
            .iter()
            .find(|entry| entry.name.as_str() == name)
            .map(|entry| entry.path.as_path())
    }

    /// Directory assigned to any module, root included
    pub fn get(&self, name: &str) -> Option<&Path> {
        if self.root.name.as_str() == name {
            Some(self.root())
        } else {
            self.module(name)
        }
    }

    /// Subproject entries in declaration order
    pub fn modules(&self) -> &[AssignedDir] {
        &self.modules
    }

    /// Root entry followed by every subproject entry
    pub fn iter(&self) -> impl Iterator<Item = &AssignedDir> {
        std::iter::once(&self.root).chain(self.modules.iter())
    }

    /// Number of entries, root included
    pub fn len(&self) -> usize {
        self.modules.len() + 1
    }

    /// Always false; an assignment has at least the root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Create every assigned directory, root first.
    ///
    /// Returns the directories that did not exist before.
    pub fn materialize(&self) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for entry in self.iter() {
            if entry.path.is_dir() {
                continue;
            }
            std::fs::create_dir_all(&entry.path)
                .map_err(|e| Error::create_failed(&entry.path, e))?;
            debug!(module = %entry.name, path = %entry.path.display(), "created build directory");
            created.push(entry.path.clone());
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::root::RelocationRule;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn tree(location: &Path, names: &[&str]) -> ProjectTree {
        ProjectTree::with_modules(
            location,
            ModuleName::new("root").unwrap(),
            "build",
            names.iter().copied(),
        )
        .unwrap()
    }

    #[test]
    fn test_scenario_paths() {
        let location = Path::new("/proj");
        let root = RelocationRule::default().resolve(location);
        let assignment = BuildDirectoryAssignment::compute(&tree(location, &["app", "libA", "libB"]), &root);

        assert_eq!(assignment.root(), Path::new("/build"));
        assert_eq!(assignment.module("app"), Some(Path::new("/build/app")));
        assert_eq!(assignment.module("libA"), Some(Path::new("/build/libA")));
        assert_eq!(assignment.module("libB"), Some(Path::new("/build/libB")));
        assert_eq!(assignment.get("root"), Some(Path::new("/build")));
        assert_eq!(assignment.module("missing"), None);
        assert_eq!(assignment.len(), 4);
    }

    #[test]
    fn test_every_name_has_one_path() {
        let location = Path::new("/proj");
        let root = RelocationRule::default().resolve(location);
        let assignment = BuildDirectoryAssignment::compute(&tree(location, &["app", "libA"]), &root);

        for entry in assignment.iter() {
            assert_eq!(assignment.get(entry.name.as_str()), Some(entry.path.as_path()));
        }
    }

    #[test]
    fn test_iter_root_first() {
        let location = Path::new("/proj");
        let root = RelocationRule::default().resolve(location);
        let assignment = BuildDirectoryAssignment::compute(&tree(location, &["libB", "app"]), &root);

        let names: Vec<&str> = assignment.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["root", "libB", "app"]);
    }

    #[test]
    fn test_materialize_creates_tree() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("android");
        let root = RelocationRule::default().resolve(&location);
        let assignment = BuildDirectoryAssignment::compute(&tree(&location, &["app", "libA"]), &root);

        let created = assignment.materialize().unwrap();
        assert_eq!(created.len(), 3);
        assert!(temp.path().join("build/app").is_dir());
        assert!(temp.path().join("build/libA").is_dir());

        // second run has nothing left to create
        assert!(assignment.materialize().unwrap().is_empty());
    }

    #[test]
    fn test_serializes_names_as_strings() {
        let location = Path::new("/proj");
        let root = RelocationRule::default().resolve(location);
        let assignment = BuildDirectoryAssignment::compute(&tree(location, &["app"]), &root);
        let json = serde_json::to_value(&assignment).unwrap();
        assert_eq!(json["modules"][0]["name"], "app");
        assert_eq!(json["root"]["path"], "/build");
    }

    proptest! {
        #[test]
        fn prop_distinct_direct_children(names in prop::collection::hash_set("[a-zA-Z][a-zA-Z0-9_-]{0,12}", 0..24)) {
            // "proj" is the root project's name and cannot be reused
            let names: Vec<String> = names.into_iter().filter(|n| n.as_str() != "proj").collect();
            let location = Path::new("/work/proj");
            let root = RelocationRule::default().resolve(location);
            let tree = ProjectTree::with_modules(
                location,
                ModuleName::new("proj").unwrap(),
                "build",
                names.iter().cloned(),
            ).unwrap();
            let assignment = BuildDirectoryAssignment::compute(&tree, &root);

            let paths: HashSet<&Path> = assignment.modules().iter().map(|e| e.path.as_path()).collect();
            prop_assert_eq!(paths.len(), names.len());
            for entry in assignment.modules() {
                prop_assert_eq!(entry.path.parent(), Some(assignment.root()));
                prop_assert_eq!(entry.path.file_name().and_then(|n| n.to_str()), Some(entry.name.as_str()));
            }
        }
    }
}
