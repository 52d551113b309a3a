//! Interface to the external bundling engine.
//!
//! The engine itself is opaque. This module owns what crosses the boundary:
//! the per-target [`BundlerConfig`], the [`Bundler`] trait that compiles a
//! set of configurations, the raw [`BundlerStats`] it reports, and the
//! [`format_messages`] cleanup applied before anything is shown to a user.
//!
//! # Module Organization
//!
//! - [`config`] - configuration factory from resolved paths
//! - [`command`] - [`CommandBundler`], a bundler reached through an adapter process
//! - [`messages`] - error and warning formatting

pub mod command;
pub mod config;
pub mod messages;

pub use command::{CommandBundler, DEFAULT_BUNDLER_COMMAND};
pub use config::{BundlerConfig, Target};
pub use messages::{FormattedMessages, format_messages};

use serde::Deserialize;
use std::future::Future;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while talking to the bundler, as opposed to compile errors
/// the bundler reports.
#[derive(Error, Debug)]
pub enum BundlerError {
    /// Adapter command could not be located
    #[error("Bundler command '{command}' not found: {reason}")]
    NotFound {
        /// Command that was looked up
        command: String,
        /// Reason for the error
        reason: String,
    },

    /// Adapter process could not be started or awaited
    #[error("Failed to run bundler {}: {source}", .program.display())]
    Spawn {
        /// Program path
        program: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Adapter exited successfully without valid stats
    #[error("Bundler produced unreadable stats: {reason}")]
    InvalidStats {
        /// Reason for the error
        reason: String,
    },
}

/// One error or warning as reported by the bundler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BundlerMessage {
    /// Plain text message
    Text(String),
    /// Structured message with the module it came from
    Detailed {
        /// Message body
        message: String,
        /// Module the message belongs to
        #[serde(default, rename = "moduleName")]
        module_name: Option<String>,
    },
}

impl BundlerMessage {
    /// Full text, prefixed with the module name when known.
    pub fn text(&self) -> String {
        match self {
            BundlerMessage::Text(text) => text.clone(),
            BundlerMessage::Detailed {
                message,
                module_name: Some(module),
            } => format!("{module}\n{message}"),
            BundlerMessage::Detailed { message, .. } => message.clone(),
        }
    }
}

/// Errors and warnings from one compile across all targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BundlerStats {
    /// Compile errors
    #[serde(default)]
    pub errors: Vec<BundlerMessage>,
    /// Compile warnings
    #[serde(default)]
    pub warnings: Vec<BundlerMessage>,
}

impl BundlerStats {
    /// Stats holding a single error, used when the bundler failed without
    /// structured output.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![BundlerMessage::Text(message.into())],
            warnings: Vec::new(),
        }
    }
}

/// A bundling engine that compiles every configuration in one run.
pub trait Bundler {
    /// Compiles `configs` and reports their combined errors and warnings.
    ///
    /// `Err` means the engine could not run at all; compile problems are
    /// reported through the returned stats.
    fn compile(
        &self,
        configs: &[BundlerConfig],
    ) -> impl Future<Output = Result<BundlerStats, BundlerError>> + Send;
}
