//! Checks run before anything touches the output directory.

use crate::config::BuildConfig;
use crate::error::{Result, ScriptsError};
use crate::metadata::{PackageManifest, load_manifest};
use crate::paths::ResolvedPaths;
use std::path::{Path, PathBuf};

/// Fails with every missing path when any of `files` does not exist.
pub fn check_required_files<P: AsRef<Path>>(files: &[P]) -> Result<()> {
    let missing: Vec<PathBuf> = files
        .iter()
        .map(AsRef::<Path>::as_ref)
        .filter(|f| !f.is_file())
        .map(Path::to_path_buf)
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    for path in &missing {
        log::debug!("Required file missing: {}", path.display());
    }
    Err(ScriptsError::MissingRequiredFiles { missing })
}

/// Required inputs plus, unless skipped, a readable manifest.
pub fn verify_inputs(paths: &ResolvedPaths, config: &BuildConfig) -> Result<()> {
    check_required_files(&[paths.app_html(), paths.app_web_index_js()])?;

    if config.skip_preflight_check {
        log::debug!("Skipping preflight manifest check");
    } else {
        load_manifest(paths.app_package_json())?;
    }

    Ok(())
}

/// Non-fatal notices to show before building.
pub fn notices(paths: &ResolvedPaths, config: &BuildConfig) -> Vec<String> {
    let mut notices = Vec::new();

    if config.node_path.as_deref().is_some_and(|p| !p.is_empty()) {
        notices.push(
            "Setting NODE_PATH to resolve modules absolutely has been deprecated in favor of \
             setting baseUrl in jsconfig.json (or tsconfig.json if you are using TypeScript) \
             and will be removed in a future major release."
                .to_string(),
        );
    }

    let manifest = match crate::metadata::load_manifest_or_default(paths.app_package_json()) {
        Ok(manifest) => manifest,
        Err(e) => {
            log::debug!("Skipping browser target check: {e}");
            return notices;
        }
    };

    if !has_browser_targets(paths.app_path(), &manifest) {
        notices.push(
            "No browser targets found. Add a \"browserslist\" field to package.json or a \
             .browserslistrc file so the bundler knows which browsers to support."
                .to_string(),
        );
    }

    notices
}

fn has_browser_targets(app_path: &Path, manifest: &PackageManifest) -> bool {
    manifest.browserslist.is_some()
        || app_path.join(".browserslistrc").is_file()
        || app_path.join("browserslist").is_file()
}
