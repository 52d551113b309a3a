//! Deployment layer selection.

use std::fmt;
use std::path::{Component, Path};

/// Installation layout that decides which base directory paths resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DeploymentLayer {
    /// Toolchain installed into the app's `node_modules`; app paths resolve
    /// against the project root.
    Standalone,
    /// Toolchain symlinked into `node_modules` for local development; same
    /// layout as `Standalone`.
    LinkedDev,
    /// Toolchain building its own bundled template from its source tree.
    Template,
}

impl DeploymentLayer {
    /// Infers the layer from where the toolchain lives relative to the project.
    ///
    /// A symlinked `node_modules/<toolchain_name>` means `LinkedDev`. Otherwise a
    /// toolchain directory inside `packages/<toolchain_name>` means `Template`.
    /// Anything else is `Standalone`.
    pub fn detect(project_root: &Path, toolchain_dir: Option<&Path>, toolchain_name: &str) -> Self {
        let installed = project_root.join("node_modules").join(toolchain_name);
        let linked = std::fs::symlink_metadata(&installed)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);

        if linked {
            log::debug!("{} is a symlink; using linked layout", installed.display());
            return DeploymentLayer::LinkedDev;
        }

        if let Some(dir) = toolchain_dir
            && is_within_packages(dir, toolchain_name)
        {
            log::debug!(
                "Toolchain runs from source tree {}; using template layout",
                dir.display()
            );
            return DeploymentLayer::Template;
        }

        DeploymentLayer::Standalone
    }

    /// Whether paths resolve against the toolchain's bundled template.
    pub fn uses_template(&self) -> bool {
        matches!(self, DeploymentLayer::Template)
    }
}

impl fmt::Display for DeploymentLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeploymentLayer::Standalone => "standalone",
            DeploymentLayer::LinkedDev => "linked-dev",
            DeploymentLayer::Template => "template",
        })
    }
}

fn is_within_packages(dir: &Path, toolchain_name: &str) -> bool {
    let components: Vec<_> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .collect();

    components
        .windows(2)
        .any(|pair| pair[0] == "packages" && pair[1] == toolchain_name)
}
