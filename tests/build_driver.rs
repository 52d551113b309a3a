use frontend_scripts::build::{BuildDriver, BuildOutcome, CompileErrorKind};
use frontend_scripts::bundler::{
    Bundler, BundlerConfig, BundlerError, BundlerMessage, BundlerStats, Target,
};
use frontend_scripts::config::BuildConfig;
use frontend_scripts::paths::{DeploymentLayer, compute_paths};
use frontend_scripts::report::exit_code;
use frontend_scripts::ScriptsError;
use std::future::Future;
use std::path::Path;
use std::sync::Mutex;

/// Returns canned stats and records the targets it was asked to compile.
#[derive(Default)]
struct FakeBundler {
    stats: BundlerStats,
    compiled: Mutex<Vec<Target>>,
}

impl FakeBundler {
    fn with_messages(errors: &[&str], warnings: &[&str]) -> Self {
        let text = |items: &[&str]| -> Vec<BundlerMessage> {
            items
                .iter()
                .map(|s| BundlerMessage::Text(s.to_string()))
                .collect()
        };
        Self {
            stats: BundlerStats {
                errors: text(errors),
                warnings: text(warnings),
            },
            compiled: Mutex::new(Vec::new()),
        }
    }

    fn targets(&self) -> Vec<Target> {
        self.compiled.lock().unwrap().clone()
    }
}

impl Bundler for &FakeBundler {
    fn compile(
        &self,
        configs: &[BundlerConfig],
    ) -> impl Future<Output = Result<BundlerStats, BundlerError>> + Send {
        self.compiled
            .lock()
            .unwrap()
            .extend(configs.iter().map(|c| c.target));
        let stats = self.stats.clone();
        async move { Ok(stats) }
    }
}

struct UnavailableBundler;

impl Bundler for UnavailableBundler {
    fn compile(
        &self,
        _configs: &[BundlerConfig],
    ) -> impl Future<Output = Result<BundlerStats, BundlerError>> + Send {
        async {
            Err(BundlerError::Spawn {
                program: "frontend-bundler".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            })
        }
    }
}

fn write(base: &Path, rel: &str, contents: &str) {
    let path = base.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn web_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "package.json", r#"{"name": "app"}"#);
    write(dir.path(), "public/index.html", "<html></html>");
    write(dir.path(), "public/favicon.ico", "ico");
    write(dir.path(), "src/index.js", "console.log('hi');");
    dir
}

#[tokio::test]
async fn successful_build_prepares_output() {
    let dir = web_project();
    write(dir.path(), "build/stale.txt", "old");
    write(dir.path(), "build/static/js/main.aaa111.js", "console.log('old');");

    let config = BuildConfig::default();
    let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();
    let bundler = FakeBundler::with_messages(&[], &["Line 3: 'x' is unused"]);

    let outcome = BuildDriver::new(&paths, &config, &bundler).run().await;

    match &outcome {
        BuildOutcome::Success {
            warnings,
            previous_sizes,
        } => {
            assert_eq!(warnings.len(), 1);
            assert_eq!(previous_sizes.len(), 1);
            assert!(previous_sizes.get("static/js/main.bbb222.js").is_some());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(exit_code(&outcome, &config), 0);
    assert_eq!(bundler.targets(), vec![Target::Web]);

    let build = paths.app_web_build();
    assert_eq!(build, paths.app_path().join("build"));
    assert!(build.join("favicon.ico").is_file());
    assert!(!build.join("index.html").exists());
    assert!(!build.join("stale.txt").exists());
}

#[tokio::test]
async fn node_entry_adds_node_target() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "package.json", "{}");
    write(dir.path(), "public/index.html", "<html></html>");
    write(dir.path(), "src/index.web.js", "");
    write(dir.path(), "src/index.node.js", "");

    let config = BuildConfig::default();
    let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();
    let bundler = FakeBundler::default();

    let outcome = BuildDriver::new(&paths, &config, &bundler).run().await;

    assert!(outcome.is_success());
    assert_eq!(bundler.targets(), vec![Target::Web, Target::Node]);
    assert!(paths.app_path().join("build/web").is_dir());
    assert!(paths.app_path().join("build/node").is_dir());
}

#[tokio::test]
async fn ci_rejects_warnings() {
    let dir = web_project();
    let config = BuildConfig::builder().ci_mode(true).build();
    let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();
    let bundler = FakeBundler::with_messages(&[], &["Line 3: 'x' is unused"]);

    let outcome = BuildDriver::new(&paths, &config, &bundler).run().await;

    match &outcome {
        BuildOutcome::CompileError { kind, messages } => {
            assert_eq!(*kind, CompileErrorKind::WarningsAsErrors);
            assert_eq!(messages, &vec!["Line 3: 'x' is unused".to_string()]);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(exit_code(&outcome, &config), 1);

    let lenient = BuildConfig::builder()
        .ci_mode(true)
        .tsc_compile_on_error(true)
        .build();
    assert_eq!(exit_code(&outcome, &lenient), 0);
}

#[tokio::test]
async fn only_first_error_is_kept() {
    let dir = web_project();
    let config = BuildConfig::default();
    let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();
    let bundler = FakeBundler::with_messages(&["first problem", "second problem"], &["w"]);

    let outcome = BuildDriver::new(&paths, &config, &bundler).run().await;

    match outcome {
        BuildOutcome::CompileError { kind, messages } => {
            assert_eq!(kind, CompileErrorKind::Errors);
            assert_eq!(messages, vec!["first problem".to_string()]);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn missing_template_is_fatal_before_compiling() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "package.json", "{}");
    write(dir.path(), "src/index.js", "");

    let config = BuildConfig::default();
    let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();
    let bundler = FakeBundler::default();

    let outcome = BuildDriver::new(&paths, &config, &bundler).run().await;

    match &outcome {
        BuildOutcome::Fatal {
            cause: ScriptsError::MissingRequiredFiles { missing },
        } => assert_eq!(missing, &vec![paths.app_html().to_path_buf()]),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(exit_code(&outcome, &config), 1);
    assert!(bundler.targets().is_empty());
    assert!(!paths.app_web_build().exists());
}

#[tokio::test]
async fn unavailable_bundler_is_fatal() {
    let dir = web_project();
    let config = BuildConfig::default();
    let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();

    let outcome = BuildDriver::new(&paths, &config, UnavailableBundler).run().await;

    match outcome {
        BuildOutcome::Fatal { cause } => {
            assert!(cause.to_string().contains("Failed to run bundler"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}
