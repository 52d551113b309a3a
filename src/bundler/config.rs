//! Bundler configuration factory.

use crate::config::{BuildConfig, Mode};
use crate::paths::{ResolvedPaths, ensure_slash};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Build target of one bundler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Browser bundle
    Web,
    /// Server-side bundle
    Node,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Target::Web => "web",
            Target::Node => "node",
        })
    }
}

/// One compilation handed to the bundler.
///
/// Serialized as camelCase JSON for the adapter process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    /// Compilation mode
    pub mode: Mode,
    /// Build target
    pub target: Target,
    /// Entry point the dependency graph starts from
    pub entry: PathBuf,
    /// Directory emitted files are written to
    pub output_path: PathBuf,
    /// Prefix for asset URLs, always ending in `/`
    pub public_path: String,
    /// HTML template for the web target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_template: Option<PathBuf>,
    /// Application sources
    pub app_src: PathBuf,
    /// Static assets directory
    pub public_dir: PathBuf,
    /// Module lookup root
    pub node_modules: PathBuf,
    /// Whether `tsconfig.json` exists
    pub typescript: bool,
    /// `tsconfig.json` or else `jsconfig.json`, for `baseUrl` and path aliases
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_config: Option<PathBuf>,
    /// Variables embedded into the bundle as `process.env.*`
    pub client_env: BTreeMap<String, String>,
}

impl BundlerConfig {
    /// Builds the configuration for `target`.
    ///
    /// Returns `None` for [`Target::Node`] when the project has no node target.
    pub fn for_target(paths: &ResolvedPaths, config: &BuildConfig, target: Target) -> Option<Self> {
        let (entry, output_path) = match target {
            Target::Web => (
                paths.app_web_index_js().to_path_buf(),
                paths.app_web_build().to_path_buf(),
            ),
            Target::Node => (
                paths.app_node_index_js()?.to_path_buf(),
                paths.app_node_build()?.to_path_buf(),
            ),
        };

        let typescript = paths.app_ts_config().is_file();
        let module_config = [paths.app_ts_config(), paths.app_js_config()]
            .into_iter()
            .find(|file| file.is_file())
            .map(Path::to_path_buf);

        Some(Self {
            mode: config.mode,
            target,
            entry,
            output_path,
            public_path: paths.served_path().to_string(),
            html_template: (target == Target::Web).then(|| paths.app_html().to_path_buf()),
            app_src: paths.app_src().to_path_buf(),
            public_dir: paths.app_public().to_path_buf(),
            node_modules: paths.app_node_modules().to_path_buf(),
            typescript,
            module_config,
            client_env: client_environment(paths, config),
        })
    }

    /// Web configuration followed by the node one when present.
    pub fn all_targets(paths: &ResolvedPaths, config: &BuildConfig) -> Vec<Self> {
        [Target::Web, Target::Node]
            .into_iter()
            .filter_map(|target| Self::for_target(paths, config, target))
            .collect()
    }
}

/// `APP_*` variables plus `NODE_ENV` and `PUBLIC_URL`.
///
/// `PUBLIC_URL` drops the trailing slash so `%PUBLIC_URL%/favicon.ico` works.
fn client_environment(paths: &ResolvedPaths, config: &BuildConfig) -> BTreeMap<String, String> {
    let mut env = config.client_env.clone();
    env.insert("NODE_ENV".to_string(), config.mode.as_str().to_string());
    env.insert(
        "PUBLIC_URL".to_string(),
        ensure_slash(paths.served_path(), false),
    );
    env
}
