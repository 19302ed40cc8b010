//! Configuration pass over a project tree

use crate::assignment::BuildDirectoryAssignment;
use crate::clean::{clean_with, CleanOptions, CleanReport};
use crate::module::ProjectTree;
use crate::order::EvaluationOrder;
use crate::root::{RelocationRule, ResolvedRoot};
use outdir_core::config::ConfigSchema;
use outdir_core::error::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Relocates build output for a project tree and cleans it up again
#[derive(Debug, Clone)]
pub struct BuildDirectoryManager {
    rule: RelocationRule,
    evaluate_first: Option<String>,
}

impl Default for BuildDirectoryManager {
    fn default() -> Self {
        Self {
            rule: RelocationRule::default(),
            evaluate_first: Some("app".to_string()),
        }
    }
}

/// Result of a successful configuration pass
#[derive(Debug, Clone)]
pub struct ConfiguredLayout {
    /// The tree with every build directory relocated
    pub tree: ProjectTree,
    /// Directories assigned during the pass
    pub assignment: BuildDirectoryAssignment,
    /// `None` when evaluation order is not enforced
    pub order: Option<EvaluationOrder>,
}

impl BuildDirectoryManager {
    /// Manager with a custom rule that evaluates `app` first
    pub fn new(rule: RelocationRule) -> Self {
        Self {
            rule,
            ..Self::default()
        }
    }

    /// Manager driven by the `[layout]` and `[evaluation]` config tables
    pub fn from_config(config: &ConfigSchema) -> Self {
        let evaluate_first = config
            .evaluation
            .enforce
            .then(|| config.evaluation.first.clone());
        Self {
            rule: RelocationRule::from_config(&config.layout),
            evaluate_first,
        }
    }

    /// Module to configure first
    pub fn evaluate_first(mut self, name: impl Into<String>) -> Self {
        self.evaluate_first = Some(name.into());
        self
    }

    /// Skip the evaluation order constraint entirely
    pub fn without_evaluation_order(mut self) -> Self {
        self.evaluate_first = None;
        self
    }

    /// Relocation rule in use
    pub fn rule(&self) -> &RelocationRule {
        &self.rule
    }

    /// Shared root for a project at `location`
    pub fn compute_root_directory(&self, location: &Path) -> ResolvedRoot {
        self.rule.resolve(location)
    }

    /// Run the configuration pass: resolve the root, relocate the root
    /// project, relocate every subproject, then enforce evaluation order.
    ///
    /// Nothing touches the file system. On error the tree is dropped, so no
    /// half-configured tree escapes.
    pub fn configure(&self, mut tree: ProjectTree) -> Result<ConfiguredLayout> {
        let root = self.checked_root(tree.location())?;
        debug!(root = %root.path().display(), "resolved build root");

        let assignment = BuildDirectoryAssignment::compute(&tree, &root);
        tree.apply(&assignment)?;

        let order = match &self.evaluate_first {
            Some(first) => Some(EvaluationOrder::enforce(&tree, first)?),
            None => None,
        };

        info!(
            root = %assignment.root().display(),
            modules = tree.subprojects().len(),
            "build directories assigned"
        );
        Ok(ConfiguredLayout {
            tree,
            assignment,
            order,
        })
    }

    /// Delete the relocated root for a project at `location`.
    ///
    /// Only the root resolution step is needed, so this works on trees that
    /// have never been configured or built.
    pub fn clean(&self, location: &Path, options: CleanOptions) -> Result<CleanReport> {
        let root = self.checked_root(location)?;
        clean_with(root.path(), options)
    }

    /// Resolve the root and refuse one that would overlap the project:
    /// the default build directory, the project directory itself, or any
    /// of its ancestors.
    fn checked_root(&self, location: &Path) -> Result<ResolvedRoot> {
        let root = self.compute_root_directory(location);
        if root.path() == self.rule.default_location(location).as_path() {
            return Err(Error::config_invalid(
                "layout.relocate_to",
                format!(
                    "resolves to the default build directory {}",
                    root.path().display()
                ),
            ));
        }
        if location.starts_with(root.path()) {
            return Err(Error::config_invalid(
                "layout.relocate_to",
                format!(
                    "resolves to {}, which contains the project at {}",
                    root.path().display(),
                    location.display()
                ),
            )
            .with_suggestion("Point the shared root at a directory beside the project, e.g. ../../build"));
        }
        Ok(root)
    }
}

impl ConfiguredLayout {
    /// Create every assigned directory
    pub fn prepare(&self) -> Result<Vec<std::path::PathBuf>> {
        self.assignment.materialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleName;
    use outdir_core::ErrorCode;
    use tempfile::TempDir;

    fn tree(location: &Path, names: &[&str]) -> ProjectTree {
        ProjectTree::with_modules(
            location,
            ModuleName::new("android").unwrap(),
            "build",
            names.iter().copied(),
        )
        .unwrap()
    }

    #[test]
    fn test_configure_scenario() {
        let layout = BuildDirectoryManager::default()
            .configure(tree(Path::new("/proj"), &["app", "libA", "libB"]))
            .unwrap();

        assert_eq!(layout.assignment.root(), Path::new("/build"));
        assert_eq!(layout.tree.root().build_dir(), Path::new("/build"));
        for (name, expected) in [("app", "/build/app"), ("libA", "/build/libA"), ("libB", "/build/libB")] {
            let module = layout.tree.find(name).unwrap();
            assert!(module.is_relocated());
            assert_eq!(module.build_dir(), Path::new(expected));
        }
        assert_eq!(layout.order.unwrap().first().as_str(), "app");
    }

    #[test]
    fn test_missing_app_fails_before_any_directory() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("android");

        let err = BuildDirectoryManager::default()
            .configure(tree(&location, &["libA", "libB"]))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::MissingEvaluationTarget);
        assert!(!temp.path().join("build").exists());
    }

    #[test]
    fn test_without_order_allows_missing_app() {
        let layout = BuildDirectoryManager::default()
            .without_evaluation_order()
            .configure(tree(Path::new("/proj"), &["libA"]))
            .unwrap();
        assert!(layout.order.is_none());
    }

    #[test]
    fn test_relocation_to_default_rejected() {
        let manager = BuildDirectoryManager::new(RelocationRule::new("build", "."));
        let err = manager.configure(tree(Path::new("/proj"), &["app"])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
    }

    #[test]
    fn test_root_containing_project_rejected() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("android");
        std::fs::create_dir_all(&location).unwrap();
        std::fs::write(location.join("settings.gradle.kts"), "include(\":app\")\n").unwrap();

        for relocate_to in ["..", "../..", "../../.."] {
            let manager = BuildDirectoryManager::new(RelocationRule::new("build", relocate_to));

            let err = manager.configure(tree(&location, &["app"])).unwrap_err();
            assert_eq!(err.code, ErrorCode::ConfigValidationError);

            let err = manager.clean(&location, CleanOptions::default()).unwrap_err();
            assert_eq!(err.code, ErrorCode::ConfigValidationError);
            assert!(location.join("settings.gradle.kts").exists());
        }
    }

    #[test]
    fn test_clean_rejects_default_location() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("android");
        std::fs::create_dir_all(location.join("build")).unwrap();

        let err = BuildDirectoryManager::new(RelocationRule::new("build", "."))
            .clean(&location, CleanOptions::default())
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(location.join("build").is_dir());
    }

    #[test]
    fn test_subproject_before_root_is_rejected() {
        let location = Path::new("/proj");
        let mut tree = tree(location, &["app"]);
        let root = RelocationRule::default().resolve(location);
        let assignment = BuildDirectoryAssignment::compute(&tree, &root);

        let err = tree.apply_subproject("app", &assignment).unwrap_err();
        assert_eq!(err.code, ErrorCode::LayoutError);
        assert!(!tree.find("app").unwrap().is_relocated());

        tree.apply_root(&assignment);
        tree.apply_subproject("app", &assignment).unwrap();
        assert_eq!(tree.find("app").unwrap().build_dir(), Path::new("/build/app"));
    }

    #[test]
    fn test_from_config() {
        let mut config = ConfigSchema::default();
        config.layout.relocate_to = "../out".to_string();
        config.evaluation.first = "mobile".to_string();

        let manager = BuildDirectoryManager::from_config(&config);
        assert_eq!(
            manager.compute_root_directory(Path::new("/proj")).path(),
            Path::new("/proj/out")
        );
        let layout = manager.configure(tree(Path::new("/proj"), &["lib", "mobile"])).unwrap();
        assert_eq!(layout.order.unwrap().sequence()[0].as_str(), "mobile");

        config.evaluation.enforce = false;
        let manager = BuildDirectoryManager::from_config(&config);
        assert!(manager.configure(tree(Path::new("/proj"), &["lib"])).unwrap().order.is_none());
    }

    #[test]
    fn test_prepare_then_clean() {
        let temp = TempDir::new().unwrap();
        let location = temp.path().join("android");
        let manager = BuildDirectoryManager::default();

        let layout = manager.configure(tree(&location, &["app", "libA", "libB"])).unwrap();
        let created = layout.prepare().unwrap();
        assert_eq!(created.len(), 4);
        assert!(temp.path().join("build/libB").is_dir());

        let report = manager.clean(&location, CleanOptions::default()).unwrap();
        assert!(report.existed);
        assert_eq!(report.root, temp.path().join("build"));
        assert!(!temp.path().join("build").exists());
    }

    #[test]
    fn test_clean_without_configure() {
        let temp = TempDir::new().unwrap();
        let report = BuildDirectoryManager::default()
            .clean(&temp.path().join("android"), CleanOptions::default())
            .unwrap();
        assert!(!report.existed);
    }
}
