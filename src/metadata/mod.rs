//! Metadata read from the project's package.json

use crate::error::{Result, ScriptsError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Fields of package.json consumed by the build
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    /// Package name, shown in hosting instructions
    #[serde(default)]
    pub name: Option<String>,

    /// URL the app is hosted at; its pathname becomes the served path
    #[serde(default)]
    pub homepage: Option<String>,

    /// Browser targets, either an array or an env-keyed object
    #[serde(default)]
    pub browserslist: Option<serde_json::Value>,

    /// npm scripts; only their names are consulted
    #[serde(default)]
    pub scripts: BTreeMap<String, serde_json::Value>,
}

impl PackageManifest {
    /// Whether an npm script named `name` is declared.
    pub fn has_script(&self, name: &str) -> bool {
        self.scripts.contains_key(name)
    }
}

/// Load package.json (single read + parse)
pub fn load_manifest(package_json_path: &Path) -> Result<PackageManifest> {
    let contents = std::fs::read_to_string(package_json_path).map_err(|e| ScriptsError::Manifest {
        path: package_json_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let manifest: PackageManifest =
        serde_json::from_str(&contents).map_err(|e| ScriptsError::Manifest {
            path: package_json_path.to_path_buf(),
            reason: format!("invalid JSON: {e}"),
        })?;

    log::debug!(
        "Loaded manifest {} (name: {:?}, homepage: {:?})",
        package_json_path.display(),
        manifest.name,
        manifest.homepage
    );

    Ok(manifest)
}

/// Load package.json, treating a missing file as an empty manifest.
///
/// Malformed JSON is still an error.
pub fn load_manifest_or_default(package_json_path: &Path) -> Result<PackageManifest> {
    if !package_json_path.exists() {
        log::debug!(
            "No manifest at {}; using defaults",
            package_json_path.display()
        );
        return Ok(PackageManifest::default());
    }
    load_manifest(package_json_path)
}
