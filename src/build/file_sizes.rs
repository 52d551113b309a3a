//! Gzip size measurement of emitted scripts and stylesheets.
//!
//! Sizes are keyed by the asset path with its content hash removed, so
//! `static/js/main.1a2b3c.js` from the previous build lines up with
//! `static/js/main.4d5e6f.js` from the next one.

use crate::error::Result;
use flate2::Compression;
use flate2::write::GzEncoder;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Main bundle size above which the reporter suggests code splitting.
pub const WARN_AFTER_BUNDLE_GZIP_SIZE: u64 = 512 * 1024;

/// Chunk size above which the reporter suggests code splitting.
pub const WARN_AFTER_CHUNK_GZIP_SIZE: u64 = 1024 * 1024;

static FILE_NAME_HASH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/?(.*)(\.[0-9a-f]+)(\.chunk)?(\.js|\.css)$").expect("static regex")
});

/// Gzip sizes of a build folder's assets, keyed by hash-free relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSizes {
    sizes: BTreeMap<String, u64>,
}

/// One asset of the finished build, compared with the previous build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSize {
    /// Path relative to the build folder, hash included
    pub name: String,
    /// Gzip size in bytes
    pub size: u64,
    /// Gzip size of the same asset in the previous build
    pub previous: Option<u64>,
}

impl AssetSize {
    /// Size change relative to the previous build.
    pub fn difference(&self) -> Option<i64> {
        self.previous.map(|previous| self.size as i64 - previous as i64)
    }

    /// Whether this asset exceeds its recommended size.
    pub fn is_large(&self) -> bool {
        let file_name = self.name.rsplit('/').next().unwrap_or(&self.name);
        let limit = if file_name.starts_with("main.") {
            WARN_AFTER_BUNDLE_GZIP_SIZE
        } else {
            WARN_AFTER_CHUNK_GZIP_SIZE
        };
        self.size > limit
    }
}

impl FileSizes {
    /// Measures every readable asset under `root`.
    ///
    /// A missing folder yields an empty map.
    pub async fn measure(root: &Path) -> Result<Self> {
        let root_buf = root.to_path_buf();
        let sizes = tokio::task::spawn_blocking(move || measure_tree(&root_buf))
            .await
            .map_err(|e| io::Error::other(format!("Size measurement task panicked: {e}")))??;

        log::debug!("Measured {} asset(s) in {}", sizes.len(), root.display());
        Ok(Self { sizes })
    }

    /// Previous size of an asset, matched without its hash.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.sizes.get(&remove_file_name_hash(name)).copied()
    }

    /// Number of measured assets.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// True when nothing was measured.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Measures the assets of a finished build against `previous`, largest first.
pub fn compare_with_previous(build_folder: &Path, previous: &FileSizes) -> Result<Vec<AssetSize>> {
    let mut assets: Vec<AssetSize> = readable_assets(build_folder)
        .into_iter()
        .map(|(name, path)| -> Result<AssetSize> {
            let size = gzip_size(&path)?;
            Ok(AssetSize {
                previous: previous.get(&name),
                name,
                size,
            })
        })
        .collect::<Result<_>>()?;

    assets.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
    Ok(assets)
}

/// `static/js/main.1a2b3c.chunk.js` → `static/js/main.js`.
pub fn remove_file_name_hash(name: &str) -> String {
    let normalized = name.replace('\\', "/");
    FILE_NAME_HASH.replace(&normalized, "$1$4").into_owned()
}

fn measure_tree(root: &Path) -> io::Result<BTreeMap<String, u64>> {
    readable_assets(root)
        .into_iter()
        .map(|(name, path)| -> io::Result<(String, u64)> {
            Ok((remove_file_name_hash(&name), gzip_size(&path)?))
        })
        .collect()
}

fn readable_assets(root: &Path) -> Vec<(String, PathBuf)> {
    let mut assets: Vec<(String, PathBuf)> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let rel = e.path().strip_prefix(root).ok()?;
            let name = rel.to_string_lossy().replace('\\', "/");
            can_read_asset(&name).then(|| (name, e.path().to_path_buf()))
        })
        .collect();
    assets.sort();
    assets
}

fn can_read_asset(name: &str) -> bool {
    let file_name = name.rsplit('/').next().unwrap_or(name);
    (name.ends_with(".js") || name.ends_with(".css"))
        && !file_name.starts_with("service-worker.js")
        && !file_name.starts_with("precache-manifest.")
}

/// Gzip size of a file at the default compression level.
pub fn gzip_size(path: &Path) -> io::Result<u64> {
    let content = std::fs::read(path)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&content)?;
    Ok(encoder.finish()?.len() as u64)
}

/// Human-readable size in base-2 units, e.g. `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        return format!("{bytes} B");
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}
