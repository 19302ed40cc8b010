//! Configuration loading and schema definitions
//!
//! `.outdir.toml` controls where relocated output lands and which module is
//! evaluated first.

mod loader;
mod schema;

pub use loader::{Config, CANDIDATES};
pub use schema::*;
