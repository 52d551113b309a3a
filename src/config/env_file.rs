//! Project `.env` files, layered by mode.
//!
//! For a `.env` path and mode `production` the files are, highest priority
//! first: `.env.production.local`, `.env.local`, `.env.production`, `.env`.
//! A key set by a higher file is never replaced by a lower one, and missing
//! files are skipped.

use super::Mode;
use crate::error::{Result, ScriptsError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Candidate files for `dotenv`, highest priority first.
pub fn env_file_candidates(dotenv: &Path, mode: Mode) -> Vec<PathBuf> {
    [
        format!(".{mode}.local"),
        ".local".to_string(),
        format!(".{mode}"),
        String::new(),
    ]
    .into_iter()
    .map(|suffix| {
        let mut name = dotenv.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    })
    .collect()
}

/// Reads every existing candidate into one map.
///
/// Values are returned, never exported to the process environment; callers
/// decide how they rank against real variables.
pub fn load_env_files(dotenv: &Path, mode: Mode) -> Result<BTreeMap<String, String>> {
    let mut vars = BTreeMap::new();

    for file in env_file_candidates(dotenv, mode) {
        if !file.is_file() {
            continue;
        }
        log::debug!("Loading environment from {}", file.display());

        let entries = dotenvy::from_path_iter(&file).map_err(|e| env_file_error(&file, e))?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| env_file_error(&file, e))?;
            vars.entry(key).or_insert(value);
        }
    }

    Ok(vars)
}

fn env_file_error(path: &Path, error: dotenvy::Error) -> ScriptsError {
    ScriptsError::EnvFile {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn candidates_follow_mode() {
        let names: Vec<String> = env_file_candidates(Path::new("/app/.env"), Mode::Development)
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "/app/.env.development.local",
                "/app/.env.local",
                "/app/.env.development",
                "/app/.env",
            ]
        );
    }

    #[test]
    fn more_specific_files_win() {
        let dir = tempfile::tempdir().unwrap();
        let dotenv = dir.path().join(".env");
        fs::write(&dotenv, "APP_A=base\nAPP_B=base\nAPP_C=base\n").unwrap();
        fs::write(dir.path().join(".env.production"), "APP_B=production\n").unwrap();
        fs::write(dir.path().join(".env.local"), "APP_C=local\n").unwrap();
        fs::write(dir.path().join(".env.development"), "APP_A=development\n").unwrap();

        let vars = load_env_files(&dotenv, Mode::Production).unwrap();
        assert_eq!(vars["APP_A"], "base");
        assert_eq!(vars["APP_B"], "production");
        assert_eq!(vars["APP_C"], "local");
    }

    #[test]
    fn no_files_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let vars = load_env_files(&dir.path().join(".env"), Mode::Production).unwrap();
        assert!(vars.is_empty());
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let dotenv = dir.path().join(".env");
        fs::write(&dotenv, "APP_OK=1\nnot a valid line\n").unwrap();

        let err = load_env_files(&dotenv, Mode::Production).unwrap_err();
        assert!(matches!(err, ScriptsError::EnvFile { .. }));
        assert!(err.to_string().contains(".env"));
    }
}
