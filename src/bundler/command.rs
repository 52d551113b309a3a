//! Bundler reached through an adapter process.
//!
//! The adapter receives the JSON array of [`BundlerConfig`]s on stdin and
//! prints `{"errors": [...], "warnings": [...]}` on stdout. Anything on
//! stderr is treated as diagnostics.

use super::{Bundler, BundlerConfig, BundlerError, BundlerStats};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Adapter command used when none is configured.
pub const DEFAULT_BUNDLER_COMMAND: &str = "frontend-bundler";

/// Bundler backed by an external adapter command.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    program: PathBuf,
    args: Vec<String>,
    working_dir: PathBuf,
}

impl CommandBundler {
    /// Locates the adapter for `command` (program plus whitespace-separated
    /// arguments).
    ///
    /// Lookup order: a path containing a separator (relative to
    /// `working_dir`), then `local_bin` (the project's `node_modules/.bin`),
    /// then `PATH`.
    pub fn locate(
        command: &str,
        working_dir: &Path,
        local_bin: Option<&Path>,
    ) -> Result<Self, BundlerError> {
        let mut words = command.split_whitespace();
        let name = words.next().ok_or_else(|| BundlerError::NotFound {
            command: command.to_string(),
            reason: "empty command".to_string(),
        })?;
        let args = words.map(str::to_string).collect();

        let program = find_program(name, working_dir, local_bin)?;
        log::debug!("Using bundler at {}", program.display());

        Ok(Self {
            program,
            args,
            working_dir: working_dir.to_path_buf(),
        })
    }

    /// Resolved program path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn run(&self, configs: &[BundlerConfig]) -> Result<BundlerStats, BundlerError> {
        let payload = serde_json::to_vec(configs).map_err(|e| BundlerError::InvalidStats {
            reason: format!("cannot encode configuration: {e}"),
        })?;

        let spawn_error = |source| BundlerError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        // Stdin is fed while stdout and stderr drain, so neither side can
        // stall on a full pipe.
        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            stdin.write_all(&payload).await?;
            stdin.shutdown().await
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        match fed {
            Ok(()) => {}
            // Adapter ignored its input; its exit status still decides.
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                log::debug!("Bundler closed stdin early");
            }
            Err(e) => return Err(spawn_error(e)),
        }
        let output = output.map_err(spawn_error)?;

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            log::debug!("bundler: {line}");
        }

        parse_stats(
            output.status.success(),
            output.status.code(),
            &output.stdout,
            &output.stderr,
        )
    }
}

impl Bundler for CommandBundler {
    fn compile(
        &self,
        configs: &[BundlerConfig],
    ) -> impl Future<Output = Result<BundlerStats, BundlerError>> + Send {
        self.run(configs)
    }
}

fn find_program(
    name: &str,
    working_dir: &Path,
    local_bin: Option<&Path>,
) -> Result<PathBuf, BundlerError> {
    if name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
        let path = working_dir.join(name);
        if path.is_file() {
            return Ok(path);
        }
        return Err(BundlerError::NotFound {
            command: name.to_string(),
            reason: format!("{} does not exist", path.display()),
        });
    }

    if let Some(bin) = local_bin {
        let local = bin.join(name);
        if local.is_file() {
            log::debug!("Found {name} in {}", bin.display());
            return Ok(local);
        }
    }

    which::which(name).map_err(|e| BundlerError::NotFound {
        command: name.to_string(),
        reason: e.to_string(),
    })
}

/// Reads stats from stdout: the whole output first, then its last non-empty
/// line, so adapters may log before printing stats.
fn parse_stats(
    success: bool,
    code: Option<i32>,
    stdout: &[u8],
    stderr: &[u8],
) -> Result<BundlerStats, BundlerError> {
    let stdout = String::from_utf8_lossy(stdout);
    let trimmed = stdout.trim();

    let parsed = serde_json::from_str::<BundlerStats>(trimmed).or_else(|e| {
        trimmed
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| serde_json::from_str::<BundlerStats>(line).ok())
            .ok_or(e)
    });

    match parsed {
        Ok(stats) => Ok(stats),
        Err(e) if success => Err(BundlerError::InvalidStats {
            reason: e.to_string(),
        }),
        Err(_) => {
            let stderr = String::from_utf8_lossy(stderr).trim().to_string();
            let message = if stderr.is_empty() {
                match code {
                    Some(code) => format!("Bundler exited with status {code}"),
                    None => "Bundler was terminated by a signal".to_string(),
                }
            } else {
                stderr
            };
            Ok(BundlerStats::from_error(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stats_after_log_lines() {
        let stats = parse_stats(
            true,
            Some(0),
            b"building...\n{\"errors\": [], \"warnings\": [\"w\"]}\n",
            b"",
        )
        .unwrap();
        assert!(stats.errors.is_empty());
        assert_eq!(stats.warnings.len(), 1);
    }

    #[test]
    fn failed_run_without_stats_becomes_compile_error() {
        let stats = parse_stats(false, Some(2), b"", b"boom\n").unwrap();
        assert_eq!(stats.errors[0].text(), "boom");

        let stats = parse_stats(false, Some(3), b"", b"").unwrap();
        assert_eq!(stats.errors[0].text(), "Bundler exited with status 3");
    }

    #[test]
    fn successful_run_without_stats_is_fatal() {
        let err = parse_stats(true, Some(0), b"not json", b"").unwrap_err();
        assert!(matches!(err, BundlerError::InvalidStats { .. }));
    }

    #[test]
    fn missing_program_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandBundler::locate("./missing-adapter", dir.path(), None).unwrap_err();
        assert!(matches!(err, BundlerError::NotFound { .. }));

        let err = CommandBundler::locate("   ", dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("empty command"));
    }

    #[test]
    fn local_bin_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("node_modules/.bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("my-adapter"), "").unwrap();

        let bundler =
            CommandBundler::locate("my-adapter --json", dir.path(), Some(&bin)).unwrap();
        assert_eq!(bundler.program(), bin.join("my-adapter"));
        assert_eq!(bundler.args, vec!["--json".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_adapter_script() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("adapter.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\ncat > received.json\necho '{\"errors\": [], \"warnings\": [\"careful\"]}'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let bundler = CommandBundler::locate("./adapter.sh", dir.path(), None).unwrap();
        let stats = bundler.compile(&[]).await.unwrap();

        assert_eq!(stats.warnings[0].text(), "careful");
        let received = std::fs::read_to_string(dir.path().join("received.json")).unwrap();
        assert_eq!(received, "[]");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn large_payload_with_chatty_adapter_completes() {
        use crate::config::BuildConfig;
        use crate::paths::{DeploymentLayer, compute_paths};
        use std::os::unix::fs::PermissionsExt;
        use std::time::Duration;

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/index.js"), "").unwrap();

        // Fills the stdout pipe before reading any input.
        let script = dir.path().join("adapter.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\nhead -c 300000 /dev/zero | tr '\\0' x\necho\ncat > received.json\necho '{\"errors\": [], \"warnings\": []}'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = BuildConfig::builder()
            .client_var("APP_BLOB", "y".repeat(300_000))
            .build();
        let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();
        let configs = BundlerConfig::all_targets(&paths, &config);

        let bundler = CommandBundler::locate("./adapter.sh", dir.path(), None).unwrap();
        let stats = tokio::time::timeout(Duration::from_secs(60), bundler.compile(&configs))
            .await
            .expect("adapter did not finish")
            .unwrap();

        assert!(stats.errors.is_empty());
        let received = std::fs::metadata(dir.path().join("received.json")).unwrap();
        assert!(received.len() > 300_000);
    }
}
