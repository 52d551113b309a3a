//! Command line interface for frontend-scripts.
//!
//! Parses arguments, reads the environment once into a
//! [`BuildConfig`](crate::config::BuildConfig) and dispatches to the
//! subcommand.

mod args;
pub mod commands;
mod output;

pub use args::{Args, BuildArgs, Command, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime_config = RuntimeConfig::from(&args);

    match &args.command {
        Command::Build(build_args) => commands::build::execute(build_args, &runtime_config).await,
    }
}
