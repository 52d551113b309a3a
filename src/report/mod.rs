//! Presentation of a [`BuildOutcome`] and its exit code.

mod hosting;

pub use hosting::{HostingContext, display_build_folder, hosting_instructions};

use crate::build::file_sizes::{AssetSize, compare_with_previous, format_size};
use crate::build::{BuildOutcome, CompileErrorKind, FileSizes};
use crate::cli::OutputManager;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::metadata::load_manifest_or_default;
use crate::paths::ResolvedPaths;

const FIFTY_KILOBYTES: i64 = 50 * 1024;

/// Exit code for an outcome.
///
/// Compile errors exit 0 when `tsc_compile_on_error` is set, including
/// warnings escalated by CI mode.
pub fn exit_code(outcome: &BuildOutcome, config: &BuildConfig) -> i32 {
    match outcome {
        BuildOutcome::Success { .. } => 0,
        BuildOutcome::CompileError { .. } if config.tsc_compile_on_error => 0,
        BuildOutcome::CompileError { .. } | BuildOutcome::Fatal { .. } => 1,
    }
}

/// Prints build outcomes for the user.
#[derive(Debug)]
pub struct Reporter<'a> {
    output: &'a OutputManager,
    paths: &'a ResolvedPaths,
    config: &'a BuildConfig,
}

impl<'a> Reporter<'a> {
    pub fn new(output: &'a OutputManager, paths: &'a ResolvedPaths, config: &'a BuildConfig) -> Self {
        Self {
            output,
            paths,
            config,
        }
    }

    /// Prints `outcome` and returns the process exit code.
    pub fn report(&self, outcome: &BuildOutcome) -> Result<i32> {
        match outcome {
            BuildOutcome::Success {
                warnings,
                previous_sizes,
            } => self.success(warnings, previous_sizes)?,
            BuildOutcome::CompileError { kind, messages } => self.compile_error(*kind, messages)?,
            BuildOutcome::Fatal { cause } => {
                let message = cause.to_string();
                if !message.is_empty() {
                    self.output.error(&message)?;
                }
            }
        }
        Ok(exit_code(outcome, self.config))
    }

    fn success(&self, warnings: &[String], previous_sizes: &FileSizes) -> Result<()> {
        let out = self.output;

        if warnings.is_empty() {
            out.success("Compiled successfully.")?;
            out.blank()?;
        } else {
            out.warn("Compiled with warnings.")?;
            out.blank()?;
            out.println(&warnings.join("\n\n"))?;
            out.blank()?;
            out.println(&format!(
                "Search for the {} to learn more about each warning.",
                out.yellow("keywords")
            ))?;
            out.println(&format!(
                "To ignore, add {} to the line before.",
                out.cyan("// eslint-disable-next-line")
            ))?;
            out.blank()?;
        }

        out.println("File sizes after gzip:")?;
        out.blank()?;
        let assets = compare_with_previous(self.paths.app_web_build(), previous_sizes)?;
        for line in size_lines(&assets, out) {
            out.println(&line)?;
        }
        if assets.iter().any(AssetSize::is_large) {
            out.blank()?;
            out.warn("The bundle size is significantly larger than recommended.")?;
            out.warn("Consider reducing it with code splitting.")?;
            out.warn("You can also analyze the project dependencies to find large modules.")?;
        }
        out.blank()?;

        for line in self.hosting_lines()? {
            out.println(&line)?;
        }
        Ok(())
    }

    fn hosting_lines(&self) -> Result<Vec<String>> {
        let manifest = load_manifest_or_default(self.paths.app_package_json())?;
        let cwd = std::env::current_dir()?;
        let build_folder = display_build_folder(self.paths.app_web_build(), &cwd);

        let ctx = HostingContext {
            manifest: &manifest,
            public_url: self.paths.public_url(),
            public_path: self.paths.served_path(),
            build_folder: &build_folder,
            use_yarn: self.paths.yarn_lock_file().is_file(),
        };
        Ok(hosting_instructions(&ctx, self.output))
    }

    fn compile_error(&self, kind: CompileErrorKind, messages: &[String]) -> Result<()> {
        let out = self.output;

        if kind == CompileErrorKind::WarningsAsErrors {
            out.blank()?;
            out.warn("Treating warnings as errors because CI is set.")?;
            out.warn("Most CI servers set it automatically.")?;
            out.blank()?;
        }

        if self.config.tsc_compile_on_error {
            out.warn(
                "Compiled with the following type errors \
                 (you may want to check these before deploying your app):",
            )?;
        } else {
            out.println(&out.red("Failed to compile."))?;
        }
        out.blank()?;
        out.println(&messages.join("\n\n"))?;
        out.blank()?;
        Ok(())
    }
}

/// One line per asset: padded size label with its change, then the path.
pub fn size_lines(assets: &[AssetSize], out: &OutputManager) -> Vec<String> {
    let labels: Vec<(String, Option<String>)> = assets
        .iter()
        .map(|asset| {
            let change = asset.difference().and_then(difference_label);
            (format_size(asset.size), change)
        })
        .collect();

    let width = labels
        .iter()
        .map(|(size, change)| plain_label(size, change.as_deref()).len())
        .max()
        .unwrap_or(0);

    assets
        .iter()
        .zip(&labels)
        .map(|(asset, (size, change))| {
            let plain_len = plain_label(size, change.as_deref()).len();
            let size = if asset.is_large() {
                out.yellow(size)
            } else {
                size.clone()
            };
            let label = match (change, asset.difference()) {
                (Some(change), Some(diff)) => {
                    format!("{size} ({})", paint_difference(change, diff, out))
                }
                _ => size,
            };
            let padding = " ".repeat(width - plain_len);

            let (dir, file) = match asset.name.rsplit_once('/') {
                Some((dir, file)) => (format!("{dir}/"), file),
                None => (String::new(), asset.name.as_str()),
            };
            format!("  {label}{padding}  {}{}", out.dim(&dir), out.cyan(file))
        })
        .collect()
}

fn plain_label(size: &str, change: Option<&str>) -> String {
    match change {
        Some(change) => format!("{size} ({change})"),
        None => size.to_string(),
    }
}

/// `+1.5 KB`, `-200 B`, or nothing when unchanged.
fn difference_label(diff: i64) -> Option<String> {
    match diff {
        0 => None,
        d if d > 0 => Some(format!("+{}", format_size(d.unsigned_abs()))),
        d => Some(format!("-{}", format_size(d.unsigned_abs()))),
    }
}

fn paint_difference(label: &str, diff: i64, out: &OutputManager) -> String {
    if diff >= FIFTY_KILOBYTES {
        out.red(label)
    } else if diff > 0 {
        out.yellow(label)
    } else {
        out.green(label)
    }
}
