//! Path resolution and build orchestration for front-end applications
//!
//! This library provides:
//! - A single path resolver over an explicit deployment layer
//! - A build driver that sequences a production build through a bundler
//! - A reporter that turns the outcome into output and an exit code
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod build;
pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod paths;
pub mod report;

// Re-export commonly used types
pub use build::{BuildDriver, BuildOutcome, CompileErrorKind};
pub use config::BuildConfig;
pub use error::{CliError, Result, ScriptsError};
pub use paths::{DeploymentLayer, ResolvedPaths, compute_paths};
