//! Build configuration read once at the process boundary.
//!
//! Nothing below this module reads `std::env` directly. The CLI collects the
//! relevant variables through clap's `env` support and layers the project's
//! `.env` files under them (see [`env_file`]). The resulting [`BuildConfig`]
//! goes to the path resolver and the build driver.

pub mod env_file;

pub use env_file::load_env_files;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Prefix of environment variables forwarded to the bundled application.
pub const CLIENT_ENV_PREFIX: &str = "APP_";

/// Compilation mode passed through to the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Optimized, minified output
    #[default]
    Production,
    /// Unminified output with development checks
    Development,
}

impl Mode {
    /// Value used for `NODE_ENV` in the bundled application.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Production => "production",
            Mode::Development => "development",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit configuration for one build run.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// `PUBLIC_URL` override for the served path
    pub public_url_override: Option<String>,

    /// Treat bundler warnings as errors
    pub ci_mode: bool,

    /// Downgrade compile errors to a printed warning
    pub tsc_compile_on_error: bool,

    /// Skip the manifest preflight check
    pub skip_preflight_check: bool,

    /// Deprecated `NODE_PATH`; only triggers a warning
    pub node_path: Option<String>,

    /// Compilation mode
    pub mode: Mode,

    /// Variables forwarded to the bundled application
    pub client_env: BTreeMap<String, String>,
}

impl BuildConfig {
    /// Creates a config builder with every flag off.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::default()
    }
}

/// Fluent builder for [`BuildConfig`], used by library callers and tests.
#[derive(Debug, Default)]
pub struct BuildConfigBuilder {
    config: BuildConfig,
}

impl BuildConfigBuilder {
    /// Sets the `PUBLIC_URL` override.
    pub fn public_url_override(mut self, url: impl Into<String>) -> Self {
        self.config.public_url_override = Some(url.into());
        self
    }

    /// Enables or disables warnings-as-errors.
    pub fn ci_mode(mut self, enabled: bool) -> Self {
        self.config.ci_mode = enabled;
        self
    }

    /// Enables or disables downgrading compile errors.
    pub fn tsc_compile_on_error(mut self, enabled: bool) -> Self {
        self.config.tsc_compile_on_error = enabled;
        self
    }

    /// Enables or disables the preflight check.
    pub fn skip_preflight_check(mut self, skip: bool) -> Self {
        self.config.skip_preflight_check = skip;
        self
    }

    /// Sets the deprecated `NODE_PATH`.
    pub fn node_path(mut self, node_path: impl Into<String>) -> Self {
        self.config.node_path = Some(node_path.into());
        self
    }

    /// Sets the compilation mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Adds one client environment variable.
    pub fn client_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.client_env.insert(key.into(), value.into());
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> BuildConfig {
        self.config
    }
}

/// Interprets `CI`: set, non-empty and not `"false"` (any case) means on.
pub fn parse_ci_flag(value: Option<&str>) -> bool {
    match value {
        Some(value) => !value.is_empty() && !value.eq_ignore_ascii_case("false"),
        None => false,
    }
}

/// Interprets the strict `"true"` flags (`TSC_COMPILE_ON_ERROR`,
/// `SKIP_PREFLIGHT_CHECK`).
pub fn parse_true_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

/// Keeps only variables carrying [`CLIENT_ENV_PREFIX`].
pub fn collect_client_env<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(key, _)| key.starts_with(CLIENT_ENV_PREFIX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ci_flag_is_on_unless_false() {
        assert!(!parse_ci_flag(None));
        assert!(parse_ci_flag(Some("true")));
        assert!(parse_ci_flag(Some("1")));
        assert!(!parse_ci_flag(Some("")));
        assert!(!parse_ci_flag(Some("false")));
        assert!(!parse_ci_flag(Some("FALSE")));
        assert!(!parse_ci_flag(Some("False")));
    }

    #[test]
    fn strict_flags_need_lowercase_true() {
        assert!(parse_true_flag(Some("true")));
        assert!(!parse_true_flag(Some("TRUE")));
        assert!(!parse_true_flag(Some("1")));
        assert!(!parse_true_flag(None));
    }

    #[test]
    fn client_env_keeps_prefixed_variables() {
        let env = collect_client_env(vec![
            ("APP_API_URL".to_string(), "https://api".to_string()),
            ("HOME".to_string(), "/root".to_string()),
            ("APPDATA".to_string(), "x".to_string()),
        ]);
        assert_eq!(env.len(), 1);
        assert_eq!(env["APP_API_URL"], "https://api");
    }

    #[test]
    fn builder_sets_flags() {
        let config = BuildConfig::builder()
            .ci_mode(true)
            .public_url_override("/app")
            .mode(Mode::Development)
            .build();
        assert!(config.ci_mode);
        assert_eq!(config.public_url_override.as_deref(), Some("/app"));
        assert_eq!(config.mode.to_string(), "development");
        assert!(!config.tsc_compile_on_error);
    }
}
