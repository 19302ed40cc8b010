//! Centralized build output layout for multi-project builds
//!
//! Every project in a tree gets its build directory redirected beneath one
//! shared root that sits outside the conventional per-project `build`
//! directories:
//!
//! ```text
//! /work/app/android          project location
//! /work/app/build            shared root      (android/build/../../build)
//! /work/app/build/app        :app output
//! /work/app/build/plugin_a   :plugin_a output
//! ```
//!
//! The configuration pass is explicit and two-phase. The root is resolved
//! first and the resulting [`ResolvedRoot`] is the only way to derive a
//! module directory:
//!
//! ```rust
//! use outdir_layout::{BuildDirectoryManager, ModuleName, ProjectTree};
//! use std::path::Path;
//!
//! let tree = ProjectTree::with_modules(
//!     "/proj",
//!     ModuleName::new("proj").unwrap(),
//!     "build",
//!     ["app", "libA", "libB"],
//! )
//! .unwrap();
//!
//! let layout = BuildDirectoryManager::default().configure(tree).unwrap();
//! assert_eq!(layout.assignment.root(), Path::new("/build"));
//! assert_eq!(layout.assignment.module("libA"), Some(Path::new("/build/libA")));
//! ```
//!
//! A module directory cannot be produced without a resolved root:
//!
//! ```compile_fail
//! use outdir_layout::{ModuleName, ResolvedRoot};
//!
//! let root = ResolvedRoot(std::path::PathBuf::from("/build"));
//! let _ = root.module_dir(&ModuleName::new("app").unwrap());
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod assignment;
pub mod clean;
pub mod manager;
pub mod module;
pub mod order;
pub mod root;

pub use assignment::{AssignedDir, BuildDirectoryAssignment};
pub use clean::{clean, clean_with, CleanOptions, CleanReport};
pub use manager::{BuildDirectoryManager, ConfiguredLayout};
pub use module::{Module, ModuleName, ProjectTree};
pub use order::EvaluationOrder;
pub use root::{compute_root_directory, RelocationRule, ResolvedRoot};
