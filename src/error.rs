//! Error types for path resolution and build orchestration.
//!
//! Every fallible step returns [`Result`]; the binary prints the message of
//! whatever reaches the top level and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for frontend-scripts operations
pub type Result<T> = std::result::Result<T, ScriptsError>;

/// Main error type for all frontend-scripts operations
#[derive(Error, Debug)]
pub enum ScriptsError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path resolution errors
    #[error("Path resolution error: {0}")]
    Paths(#[from] crate::paths::PathsError),

    /// Bundler invocation errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::BundlerError),

    /// Required input files are absent
    #[error("Could not find required file{}:\n{}", plural(.missing), format_paths(.missing))]
    MissingRequiredFiles {
        /// Every required path that does not exist
        missing: Vec<PathBuf>,
    },

    /// Manifest could not be read or parsed
    #[error("Failed to load manifest {}: {reason}", .path.display())]
    Manifest {
        /// Manifest path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// A `.env` file could not be read or parsed
    #[error("Failed to load environment file {}: {reason}", .path.display())]
    EnvFile {
        /// File path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

fn plural(paths: &[PathBuf]) -> &'static str {
    if paths.len() == 1 { "" } else { "s" }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  Name: {}\n  Searched in: {}", file_name(p), parent(p)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn parent(path: &std::path::Path) -> String {
    path.parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
