//! Project path resolution.
//!
//! Computes every path a build needs from the project root, the deployment
//! layer and the build configuration, and decides whether the project has a
//! separate node entry point next to its web entry point.
//!
//! # Module Organization
//!
//! - [`extensions`] - candidate extension lists and first-match resolution
//! - `layer` - the [`DeploymentLayer`] choice and its inference helper
//! - [`served`] - public URL and served path normalization
//! - `resolved` - [`ResolvedPaths`] and [`compute_paths`]

pub mod extensions;
mod layer;
mod resolved;
pub mod served;

pub use extensions::{
    MODULE_FILE_EXTENSIONS, node_module_file_extensions, resolve_extension,
    web_module_file_extensions,
};
pub use layer::DeploymentLayer;
pub use resolved::{ResolvedPaths, ToolchainPaths, compute_paths};
pub use served::ensure_slash;

use std::path::PathBuf;
use thiserror::Error;

/// Package name the toolchain is installed under in `node_modules`.
pub const TOOLCHAIN_NAME: &str = "frontend-scripts";

/// Path resolution failures
#[derive(Error, Debug)]
pub enum PathsError {
    /// Project root missing or unreadable
    #[error("Cannot resolve project root {}: {source}", .path.display())]
    ProjectRoot {
        /// Requested root
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Toolchain directory could not be made absolute
    #[error("Cannot resolve toolchain directory {}: {source}", .path.display())]
    ToolchainDir {
        /// Requested toolchain directory
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Layer needs the toolchain directory but none was given
    #[error("The {layer} layout needs a toolchain directory (pass --toolchain-dir)")]
    MissingToolchainDir {
        /// Layer that was requested
        layer: DeploymentLayer,
    },

    /// Entry resolution produced nothing despite a default extension
    #[error("Entry point could not be resolved")]
    UnresolvedEntry,
}
