//! `frontend-scripts build`: resolve paths, run the build, report.

use crate::build::{BuildDriver, BuildOutcome, preflight};
use crate::bundler::CommandBundler;
use crate::cli::{BuildArgs, RuntimeConfig};
use crate::config::load_env_files;
use crate::error::Result;
use crate::paths::{DeploymentLayer, TOOLCHAIN_NAME, compute_paths};
use crate::report::Reporter;
use anyhow::Context;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Runs one build and returns the process exit code.
pub async fn execute(args: &BuildArgs, runtime_config: &RuntimeConfig) -> Result<i32> {
    let mut config = args.to_config(std::env::vars());

    let project_root = args
        .project_root
        .absolutize()
        .with_context(|| format!("Cannot resolve {}", args.project_root.display()))?
        .into_owned();

    let toolchain_dir = match &args.toolchain_dir {
        Some(dir) => Some(dir.clone()),
        None => installed_toolchain_dir(&project_root),
    };

    let layer = args.layer.unwrap_or_else(|| {
        DeploymentLayer::detect(&project_root, toolchain_dir.as_deref(), TOOLCHAIN_NAME)
    });
    log::info!("Resolving paths for the {layer} layout");

    let mut paths = compute_paths(&project_root, layer, toolchain_dir.as_deref(), &config)?;

    let file_vars = load_env_files(paths.dotenv(), config.mode)?;
    if !file_vars.is_empty() {
        let mut args = args.clone();
        args.apply_env_files(&file_vars);
        config = args.to_config(file_vars.into_iter().chain(std::env::vars()));
        // PUBLIC_URL may come from an env file.
        paths = compute_paths(&project_root, layer, toolchain_dir.as_deref(), &config)?;
    }

    runtime_config.verbose_println(&format!("Web build: {}", paths.app_web_build().display()))?;
    if let Some(node_build) = paths.app_node_build() {
        runtime_config.verbose_println(&format!("Node build: {}", node_build.display()))?;
    }
    runtime_config.verbose_println(&format!("Served path: {}", paths.served_path()))?;

    for notice in preflight::notices(&paths, &config) {
        runtime_config.warn(&notice)?;
        runtime_config.output().blank()?;
    }

    let reporter = Reporter::new(runtime_config.output(), &paths, &config);

    // Missing inputs are reported before looking for a bundler.
    if let Err(cause) = preflight::verify_inputs(&paths, &config) {
        return reporter.report(&BuildOutcome::Fatal { cause });
    }

    let local_bin = paths.app_node_modules().join(".bin");
    let bundler = match CommandBundler::locate(&args.bundler, paths.app_path(), Some(&local_bin)) {
        Ok(bundler) => bundler,
        Err(e) => return reporter.report(&BuildOutcome::Fatal { cause: e.into() }),
    };

    runtime_config.progress(&format!(
        "Creating an optimized {} build...",
        config.mode
    ))?;

    let outcome = BuildDriver::new(&paths, &config, bundler).run().await;
    reporter.report(&outcome)
}

/// `<project>/node_modules/<toolchain>`, resolved through symlinks, when it
/// exists.
fn installed_toolchain_dir(project_root: &Path) -> Option<PathBuf> {
    let installed = project_root.join("node_modules").join(TOOLCHAIN_NAME);
    match installed.canonicalize() {
        Ok(dir) => Some(dir),
        Err(e) => {
            log::debug!("No installed toolchain at {}: {e}", installed.display());
            None
        }
    }
}
