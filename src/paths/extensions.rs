//! Module file extension lists and first-match resolution.

use std::path::{Path, PathBuf};

/// Extensions the bundler resolves, in its own precedence order.
pub const MODULE_FILE_EXTENSIONS: [&str; 6] = ["mjs", "js", "ts", "tsx", "json", "jsx"];

/// Extension used for the web entry when no candidate exists.
pub const DEFAULT_EXTENSION: &str = "js";

/// `web.`-prefixed variants first, then the generic list.
pub fn web_module_file_extensions() -> Vec<String> {
    platform_extensions("web")
}

/// `node.`-prefixed variants first, then the generic list.
pub fn node_module_file_extensions() -> Vec<String> {
    platform_extensions("node")
}

fn platform_extensions(platform: &str) -> Vec<String> {
    MODULE_FILE_EXTENSIONS
        .iter()
        .map(|ext| format!("{platform}.{ext}"))
        .chain(MODULE_FILE_EXTENSIONS.iter().map(|ext| ext.to_string()))
        .collect()
}

/// Resolves `base/relative.<ext>` for the first extension whose file exists.
///
/// Candidates are checked in order with one existence check each, stopping at
/// the first hit. When nothing exists, `default_extension` is applied without
/// checking; without a default the result is `None`.
pub fn resolve_extension<S: AsRef<str>>(
    base: &Path,
    candidate_extensions: &[S],
    relative_without_extension: &str,
    default_extension: Option<&str>,
) -> Option<PathBuf> {
    let with_extension =
        |ext: &str| base.join(format!("{relative_without_extension}.{ext}"));

    if let Some(found) = candidate_extensions
        .iter()
        .map(|ext| with_extension(ext.as_ref()))
        .find(|candidate| candidate.exists())
    {
        log::debug!("Resolved module {}", found.display());
        return Some(found);
    }

    match default_extension {
        Some(ext) => {
            log::debug!(
                "No candidate found for {relative_without_extension}; defaulting to .{ext}"
            );
            Some(with_extension(ext))
        }
        None => None,
    }
}
