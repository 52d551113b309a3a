//! Command line argument parsing and validation.
//!
//! Every environment variable the build honors is declared here through
//! clap's `env` support, so the rest of the crate only sees a
//! [`BuildConfig`].

use crate::bundler::DEFAULT_BUNDLER_COMMAND;
use crate::config::{BuildConfig, Mode, collect_client_env, parse_ci_flag, parse_true_flag};
use crate::paths::DeploymentLayer;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Build tooling for front-end applications
#[derive(Parser, Debug)]
#[command(
    name = "frontend-scripts",
    version,
    about = "Build tooling for front-end applications",
    long_about = "Resolves the project layout and drives a production build through a bundler adapter.

The adapter receives its configuration as JSON on stdin and reports errors and
warnings as JSON on stdout.

Usage:
  frontend-scripts build
  frontend-scripts build --project-root ./my-app --bundler ./scripts/bundle.sh
  CI=true frontend-scripts build

Exit code 0 = the build compiled (possibly with warnings)."
)]
pub struct Args {
    /// Print additional progress details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an optimized production build
    Build(BuildArgs),
}

/// Arguments of `frontend-scripts build`
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Application directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,

    /// Installation layout; detected from the project when omitted
    #[arg(long, value_enum, value_name = "LAYER")]
    pub layer: Option<DeploymentLayer>,

    /// Toolchain package directory [default: <project>/node_modules/frontend-scripts]
    #[arg(long, value_name = "DIR")]
    pub toolchain_dir: Option<PathBuf>,

    /// Bundler adapter command, looked up in node_modules/.bin and then PATH
    #[arg(
        long,
        value_name = "CMD",
        env = "FRONTEND_SCRIPTS_BUNDLER",
        default_value = DEFAULT_BUNDLER_COMMAND
    )]
    pub bundler: String,

    /// Compilation mode
    #[arg(long, value_enum, default_value_t = Mode::Production)]
    pub mode: Mode,

    /// URL prefix the app is served from, overriding the manifest homepage
    #[arg(long, value_name = "URL", env = "PUBLIC_URL")]
    pub public_url: Option<String>,

    /// Treat warnings as errors unless "false"
    #[arg(long, value_name = "VALUE", env = "CI", hide = true)]
    pub ci: Option<String>,

    /// "true" downgrades compile errors to warnings
    #[arg(long, value_name = "VALUE", env = "TSC_COMPILE_ON_ERROR", hide = true)]
    pub tsc_compile_on_error: Option<String>,

    /// "true" skips the manifest check
    #[arg(long, value_name = "VALUE", env = "SKIP_PREFLIGHT_CHECK", hide = true)]
    pub skip_preflight_check: Option<String>,

    /// Deprecated module search path; only triggers a notice
    #[arg(long, value_name = "PATH", env = "NODE_PATH", hide = true)]
    pub node_path: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Build(build) => build.validate(),
        }
    }
}

impl BuildArgs {
    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.project_root.is_dir() {
            return Err(format!(
                "Project root {} is not a directory",
                self.project_root.display()
            ));
        }

        if self.bundler.trim().is_empty() {
            return Err("Bundler command cannot be empty".to_string());
        }

        if let Some(dir) = &self.toolchain_dir
            && !dir.is_dir()
        {
            return Err(format!(
                "Toolchain directory {} is not a directory",
                dir.display()
            ));
        }

        Ok(())
    }

    /// Fills settings left unset by flags and the process environment from
    /// `.env` file values.
    pub fn apply_env_files(&mut self, file_vars: &BTreeMap<String, String>) {
        let fill = |slot: &mut Option<String>, key: &str| {
            if slot.is_none() {
                *slot = file_vars.get(key).cloned();
            }
        };
        fill(&mut self.public_url, "PUBLIC_URL");
        fill(&mut self.ci, "CI");
        fill(&mut self.tsc_compile_on_error, "TSC_COMPILE_ON_ERROR");
        fill(&mut self.skip_preflight_check, "SKIP_PREFLIGHT_CHECK");
        fill(&mut self.node_path, "NODE_PATH");
    }

    /// Builds the run configuration from parsed flags plus the process
    /// environment (for `APP_*` client variables). Later pairs in `vars`
    /// replace earlier ones.
    pub fn to_config<I>(&self, vars: I) -> BuildConfig
    where
        I: IntoIterator<Item = (String, String)>,
    {
        BuildConfig {
            public_url_override: self.public_url.clone(),
            ci_mode: parse_ci_flag(self.ci.as_deref()),
            tsc_compile_on_error: parse_true_flag(self.tsc_compile_on_error.as_deref()),
            skip_preflight_check: parse_true_flag(self.skip_preflight_check.as_deref()),
            node_path: self.node_path.clone(),
            mode: self.mode,
            client_env: collect_client_env(vars),
        }
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }
}
