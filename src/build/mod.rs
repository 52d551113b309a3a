//! Build orchestration.
//!
//! This module provides the [`BuildDriver`] that sequences a production
//! build and returns a [`BuildOutcome`] for the reporter to present.
//!
//! # Overview
//!
//! The driver:
//! 1. Verifies required inputs (HTML template, web entry, manifest)
//! 2. Measures the gzip sizes of the previous build
//! 3. Empties the output directories
//! 4. Copies the public folder into the web output
//! 5. Compiles every target through a [`Bundler`]
//! 6. Classifies the formatted messages
//!
//! # Example
//!
//! ```no_run
//! use frontend_scripts::build::{BuildDriver, BuildOutcome};
//! use frontend_scripts::bundler::CommandBundler;
//! use frontend_scripts::config::BuildConfig;
//! use frontend_scripts::paths::{DeploymentLayer, compute_paths};
//!
//! # async fn example() -> frontend_scripts::Result<()> {
//! let config = BuildConfig::default();
//! let paths = compute_paths(".".as_ref(), DeploymentLayer::Standalone, None, &config)?;
//! let bundler = CommandBundler::locate("frontend-bundler", paths.app_path(), None)?;
//!
//! match BuildDriver::new(&paths, &config, bundler).run().await {
//!     BuildOutcome::Success { warnings, .. } => println!("{} warning(s)", warnings.len()),
//!     BuildOutcome::CompileError { messages, .. } => eprintln!("{}", messages.join("\n\n")),
//!     BuildOutcome::Fatal { cause } => eprintln!("{cause}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod file_sizes;
pub mod fs;
pub mod preflight;

pub use file_sizes::{AssetSize, FileSizes};

use crate::bundler::{Bundler, BundlerConfig, FormattedMessages, format_messages};
use crate::config::BuildConfig;
use crate::error::{Result, ScriptsError};
use crate::paths::ResolvedPaths;

/// Why a compile was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// The bundler reported errors
    Errors,
    /// CI mode escalated warnings
    WarningsAsErrors,
}

/// Result of one build run.
#[derive(Debug)]
pub enum BuildOutcome {
    /// Compiled, possibly with warnings
    Success {
        /// Formatted warnings
        warnings: Vec<String>,
        /// Gzip sizes of the build that was replaced
        previous_sizes: FileSizes,
    },
    /// The compile was rejected
    CompileError {
        /// Rejection reason
        kind: CompileErrorKind,
        /// The single first error, or every warning in CI mode
        messages: Vec<String>,
    },
    /// A step failed before or outside compilation
    Fatal {
        /// Underlying failure
        cause: ScriptsError,
    },
}

impl BuildOutcome {
    /// True for [`BuildOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Success { .. })
    }
}

/// Sequences one build over resolved paths.
#[derive(Debug)]
pub struct BuildDriver<'a, B> {
    paths: &'a ResolvedPaths,
    config: &'a BuildConfig,
    bundler: B,
}

impl<'a, B: Bundler> BuildDriver<'a, B> {
    /// Creates a driver; nothing runs until [`BuildDriver::run`].
    pub fn new(paths: &'a ResolvedPaths, config: &'a BuildConfig, bundler: B) -> Self {
        Self {
            paths,
            config,
            bundler,
        }
    }

    /// Runs every step and folds failures into [`BuildOutcome::Fatal`].
    pub async fn run(&self) -> BuildOutcome {
        match self.try_run().await {
            Ok(outcome) => outcome,
            Err(cause) => {
                log::debug!("Build failed: {cause}");
                BuildOutcome::Fatal { cause }
            }
        }
    }

    async fn try_run(&self) -> Result<BuildOutcome> {
        preflight::verify_inputs(self.paths, self.config)?;

        let web_build = self.paths.app_web_build();
        let previous_sizes = FileSizes::measure(web_build).await?;

        fs::empty_dir(web_build).await?;
        if let Some(node_build) = self.paths.app_node_build() {
            fs::empty_dir(node_build).await?;
        }

        fs::copy_public_folder(self.paths.app_public(), web_build, self.paths.app_html()).await?;

        let configs = BundlerConfig::all_targets(self.paths, self.config);
        log::info!(
            "Compiling {} target(s) in {} mode",
            configs.len(),
            self.config.mode
        );
        let stats = self.bundler.compile(&configs).await?;

        Ok(classify(
            format_messages(&stats),
            self.config.ci_mode,
            previous_sizes,
        ))
    }
}

/// Errors reject with only the first one; CI mode rejects on warnings.
pub fn classify(
    messages: FormattedMessages,
    ci_mode: bool,
    previous_sizes: FileSizes,
) -> BuildOutcome {
    let FormattedMessages {
        mut errors,
        warnings,
    } = messages;

    if !errors.is_empty() {
        // Later errors are usually caused by the first one.
        errors.truncate(1);
        return BuildOutcome::CompileError {
            kind: CompileErrorKind::Errors,
            messages: errors,
        };
    }

    if ci_mode && !warnings.is_empty() {
        log::debug!("Escalating {} warning(s) in CI mode", warnings.len());
        return BuildOutcome::CompileError {
            kind: CompileErrorKind::WarningsAsErrors,
            messages: warnings,
        };
    }

    BuildOutcome::Success {
        warnings,
        previous_sizes,
    }
}
