//! The resolved path map and the function computing it.

use super::extensions::{
    DEFAULT_EXTENSION, node_module_file_extensions, resolve_extension, web_module_file_extensions,
};
use super::served::{public_url, served_path};
use super::{DeploymentLayer, PathsError};
use crate::config::BuildConfig;
use crate::error::Result;
use crate::metadata::load_manifest_or_default;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Paths that only exist while the toolchain is a separate package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainPaths {
    /// Toolchain root directory
    pub own_path: PathBuf,
    /// Toolchain's own `node_modules`
    pub own_node_modules: PathBuf,
    /// Ambient type declarations placed in the app sources
    pub app_type_declarations: PathBuf,
    /// Type declarations shipped with the toolchain
    pub own_type_declarations: PathBuf,
}

/// Every filesystem path a build needs, computed once per process.
///
/// Constructed only by [`compute_paths`]; read-only afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    layer: DeploymentLayer,
    dotenv: PathBuf,
    app_path: PathBuf,
    app_node_build: Option<PathBuf>,
    app_web_build: PathBuf,
    app_public: PathBuf,
    app_html: PathBuf,
    app_index_js: PathBuf,
    app_web_index_js: PathBuf,
    app_node_index_js: Option<PathBuf>,
    app_package_json: PathBuf,
    app_src: PathBuf,
    app_ts_config: PathBuf,
    app_js_config: PathBuf,
    yarn_lock_file: PathBuf,
    tests_setup: PathBuf,
    proxy_setup: PathBuf,
    app_node_modules: PathBuf,
    public_url: Option<String>,
    served_path: String,
    toolchain: Option<ToolchainPaths>,
}

/// Base directories a layer resolves against.
struct Layout {
    /// App-level files (`.env`, `public/`, `src/`, configs)
    base: PathBuf,
    /// Parent of the web/node build directories
    build_root: PathBuf,
    package_json: PathBuf,
    node_modules: PathBuf,
}

impl Layout {
    fn for_layer(
        layer: DeploymentLayer,
        app_dir: &Path,
        own_dir: Option<&Path>,
    ) -> std::result::Result<Self, PathsError> {
        if layer.uses_template() {
            let own = own_dir.ok_or(PathsError::MissingToolchainDir { layer })?;
            return Ok(Self {
                base: resolve(own, "template"),
                build_root: resolve(own, "../../build"),
                package_json: resolve(own, "package.json"),
                node_modules: resolve(own, "node_modules"),
            });
        }

        Ok(Self {
            base: app_dir.to_path_buf(),
            build_root: resolve(app_dir, "build"),
            package_json: resolve(app_dir, "package.json"),
            node_modules: resolve(app_dir, "node_modules"),
        })
    }
}

/// Computes the full path map for a project.
///
/// `toolchain_dir` is required for [`DeploymentLayer::Template`] and, when
/// present, fills [`ResolvedPaths::toolchain`]. The project root is
/// canonicalized so symlinked project folders resolve to their real location.
pub fn compute_paths(
    project_root: &Path,
    layer: DeploymentLayer,
    toolchain_dir: Option<&Path>,
    config: &BuildConfig,
) -> Result<ResolvedPaths> {
    let app_dir =
        std::fs::canonicalize(project_root).map_err(|source| PathsError::ProjectRoot {
            path: project_root.to_path_buf(),
            source,
        })?;

    let own_dir = toolchain_dir
        .map(|dir| {
            dir.absolutize()
                .map(|p| p.into_owned())
                .map_err(|source| PathsError::ToolchainDir {
                    path: dir.to_path_buf(),
                    source,
                })
        })
        .transpose()?;

    let layout = Layout::for_layer(layer, &app_dir, own_dir.as_deref())?;

    let app_web_index_js = resolve_extension(
        &layout.base,
        &web_module_file_extensions(),
        "src/index",
        Some(DEFAULT_EXTENSION),
    )
    .ok_or(PathsError::UnresolvedEntry)?;

    let app_node_index_js = resolve_extension(
        &layout.base,
        &node_module_file_extensions(),
        "src/index",
        None,
    )
    .filter(|node| *node != app_web_index_js);

    let has_node_target = app_node_index_js.is_some();
    log::debug!(
        "Entry points: web={} node={:?} ({layer} layout)",
        app_web_index_js.display(),
        app_node_index_js
    );

    let tests_setup = resolve_extension(
        &layout.base,
        &node_module_file_extensions(),
        "src/setupTests",
        Some(DEFAULT_EXTENSION),
    )
    .ok_or(PathsError::UnresolvedEntry)?;

    let override_url = config.public_url_override.as_deref();
    let homepage = if override_url.is_some_and(|url| !url.is_empty()) {
        None
    } else {
        load_manifest_or_default(&layout.package_json)?.homepage
    };

    let toolchain = own_dir.as_deref().map(|own| ToolchainPaths {
        own_path: own.to_path_buf(),
        own_node_modules: resolve(own, "node_modules"),
        app_type_declarations: resolve(&layout.base, "src/app-env.d.ts"),
        own_type_declarations: resolve(own, "lib/app.d.ts"),
    });

    Ok(ResolvedPaths {
        layer,
        dotenv: resolve(&layout.base, ".env"),
        app_path: app_dir.clone(),
        app_node_build: has_node_target.then(|| resolve(&layout.build_root, "node")),
        app_web_build: if has_node_target {
            resolve(&layout.build_root, "web")
        } else {
            layout.build_root.clone()
        },
        app_public: resolve(&layout.base, "public"),
        app_html: resolve(&layout.base, "public/index.html"),
        app_index_js: resolve(&app_dir, "src/index"),
        app_web_index_js,
        app_node_index_js,
        app_package_json: layout.package_json.clone(),
        app_src: resolve(&layout.base, "src"),
        app_ts_config: resolve(&layout.base, "tsconfig.json"),
        app_js_config: resolve(&layout.base, "jsconfig.json"),
        yarn_lock_file: resolve(&layout.base, "yarn.lock"),
        tests_setup,
        proxy_setup: resolve(&layout.base, "src/setupProxy.js"),
        app_node_modules: layout.node_modules.clone(),
        public_url: public_url(override_url, homepage.as_deref()),
        served_path: served_path(override_url, homepage.as_deref()),
        toolchain,
    })
}

/// Joins and lexically normalizes, so `own/../../build` collapses.
fn resolve(base: &Path, relative: &str) -> PathBuf {
    let joined = base.join(relative);
    match joined.absolutize() {
        Ok(normalized) => normalized.into_owned(),
        Err(_) => joined,
    }
}

impl ResolvedPaths {
    /// Layer these paths were computed for.
    pub fn layer(&self) -> DeploymentLayer {
        self.layer
    }

    /// True when a node entry exists and differs from the web entry.
    pub fn has_node_target(&self) -> bool {
        self.app_node_index_js.is_some()
    }

    /// Optional `.env` file.
    pub fn dotenv(&self) -> &Path {
        &self.dotenv
    }

    /// Project root (canonical).
    pub fn app_path(&self) -> &Path {
        &self.app_path
    }

    /// Node build output, present only with a node target.
    pub fn app_node_build(&self) -> Option<&Path> {
        self.app_node_build.as_deref()
    }

    /// Web build output.
    pub fn app_web_build(&self) -> &Path {
        &self.app_web_build
    }

    /// Static assets copied verbatim into the web build.
    pub fn app_public(&self) -> &Path {
        &self.app_public
    }

    /// HTML template.
    pub fn app_html(&self) -> &Path {
        &self.app_html
    }

    /// Extension-less `src/index` of the project.
    pub fn app_index_js(&self) -> &Path {
        &self.app_index_js
    }

    /// Resolved web entry point.
    pub fn app_web_index_js(&self) -> &Path {
        &self.app_web_index_js
    }

    /// Resolved node entry point.
    pub fn app_node_index_js(&self) -> Option<&Path> {
        self.app_node_index_js.as_deref()
    }

    /// Manifest read for `name`, `homepage` and `browserslist`.
    pub fn app_package_json(&self) -> &Path {
        &self.app_package_json
    }

    /// Application sources.
    pub fn app_src(&self) -> &Path {
        &self.app_src
    }

    /// `tsconfig.json`; its presence marks a TypeScript project.
    pub fn app_ts_config(&self) -> &Path {
        &self.app_ts_config
    }

    /// `jsconfig.json`, used when there is no `tsconfig.json`.
    pub fn app_js_config(&self) -> &Path {
        &self.app_js_config
    }

    /// Lock file whose presence switches hints to yarn.
    pub fn yarn_lock_file(&self) -> &Path {
        &self.yarn_lock_file
    }

    /// Test setup module.
    pub fn tests_setup(&self) -> &Path {
        &self.tests_setup
    }

    /// Development proxy module. Builds never load it.
    pub fn proxy_setup(&self) -> &Path {
        &self.proxy_setup
    }

    /// Dependencies of the project.
    pub fn app_node_modules(&self) -> &Path {
        &self.app_node_modules
    }

    /// Public URL as configured, before normalization.
    pub fn public_url(&self) -> Option<&str> {
        self.public_url.as_deref()
    }

    /// Normalized served path, always ending in `/`.
    pub fn served_path(&self) -> &str {
        &self.served_path
    }

    /// Toolchain-owned paths, when the toolchain directory is known.
    pub fn toolchain(&self) -> Option<&ToolchainPaths> {
        self.toolchain.as_ref()
    }
}
