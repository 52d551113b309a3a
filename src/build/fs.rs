//! File system steps of a build: clearing output and copying static assets.

use crate::error::Result;
use std::io;
use std::path::Path;
use tokio::fs;

/// Removes everything inside `path` but keeps the directory itself, so a
/// shell sitting in it is not left in a deleted directory.
///
/// Creates the directory when it does not exist.
pub async fn empty_dir(path: &Path) -> Result<()> {
    match fs::read_dir(path).await {
        Ok(mut entries) => {
            while let Some(entry) = entries.next_entry().await? {
                let entry_path = entry.path();
                let file_type = entry.file_type().await?;
                let removed = if file_type.is_dir() {
                    fs::remove_dir_all(&entry_path).await
                } else {
                    fs::remove_file(&entry_path).await
                };
                match removed {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(fs::create_dir_all(path).await?),
        Err(e) => Err(e.into()),
    }
}

/// Recursively copies `from` into `to`, dereferencing symlinks and leaving
/// out `exclude`.
///
/// A missing source directory copies nothing.
pub async fn copy_public_folder(from: &Path, to: &Path, exclude: &Path) -> Result<usize> {
    if !from.is_dir() {
        log::debug!("No public folder at {}; nothing to copy", from.display());
        return Ok(0);
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();
    let exclude = exclude.to_path_buf();

    // Directory walks are blocking; keep them off the runtime threads
    let copied = tokio::task::spawn_blocking(move || copy_tree(&from, &to, &exclude))
        .await
        .map_err(|e| io::Error::other(format!("Public folder copy task panicked: {e}")))??;

    log::debug!("Copied {copied} public file(s)");
    Ok(copied)
}

fn copy_tree(from: &Path, to: &Path, exclude: &Path) -> io::Result<usize> {
    std::fs::create_dir_all(to)?;
    let mut copied = 0;

    for entry in walkdir::WalkDir::new(from).follow_links(true) {
        let entry = entry?;
        if entry.path() == exclude {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path)?;
        } else {
            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &dest_path)?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_dir_keeps_directory() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build");
        std::fs::create_dir_all(build.join("static/js")).unwrap();
        std::fs::write(build.join("static/js/main.js"), "x").unwrap();
        std::fs::write(build.join("index.html"), "x").unwrap();

        empty_dir(&build).await.unwrap();

        assert!(build.is_dir());
        assert_eq!(std::fs::read_dir(&build).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn empty_dir_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build/web");

        empty_dir(&build).await.unwrap();
        assert!(build.is_dir());
    }

    #[tokio::test]
    async fn copy_skips_html_template() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("public");
        std::fs::create_dir_all(public.join("img")).unwrap();
        std::fs::write(public.join("index.html"), "<html>").unwrap();
        std::fs::write(public.join("favicon.ico"), "ico").unwrap();
        std::fs::write(public.join("img/logo.svg"), "svg").unwrap();
        let build = dir.path().join("build");

        let copied = copy_public_folder(&public, &build, &public.join("index.html"))
            .await
            .unwrap();

        assert_eq!(copied, 2);
        assert!(build.join("favicon.ico").is_file());
        assert!(build.join("img/logo.svg").is_file());
        assert!(!build.join("index.html").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn copy_dereferences_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        let public = dir.path().join("public");
        std::fs::create_dir_all(&public).unwrap();
        std::fs::write(dir.path().join("shared.txt"), "shared").unwrap();
        std::os::unix::fs::symlink(dir.path().join("shared.txt"), public.join("link.txt")).unwrap();
        let build = dir.path().join("build");

        copy_public_folder(&public, &build, &public.join("index.html"))
            .await
            .unwrap();

        let copied = build.join("link.txt");
        assert!(!std::fs::symlink_metadata(&copied).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_to_string(copied).unwrap(), "shared");
    }

    #[tokio::test]
    async fn missing_public_folder_copies_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let copied = copy_public_folder(
            &dir.path().join("public"),
            &dir.path().join("build"),
            &dir.path().join("public/index.html"),
        )
        .await
        .unwrap();
        assert_eq!(copied, 0);
    }
}
