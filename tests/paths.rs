use frontend_scripts::bundler::{BundlerConfig, Target};
use frontend_scripts::config::BuildConfig;
use frontend_scripts::paths::{DeploymentLayer, TOOLCHAIN_NAME, compute_paths};
use std::path::Path;

fn write(base: &Path, rel: &str, contents: &str) {
    let path = base.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

#[test]
fn web_and_node_entries_produce_two_configs() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/index.web.js", "");
    write(dir.path(), "src/index.node.js", "");
    write(dir.path(), "package.json", r#"{"homepage": "https://example.com/shop"}"#);

    let config = BuildConfig::builder().client_var("APP_FLAG", "on").build();
    let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();
    let root = paths.app_path();

    assert!(paths.has_node_target());
    assert_eq!(paths.app_web_index_js(), root.join("src/index.web.js"));
    assert_eq!(paths.app_node_index_js(), Some(root.join("src/index.node.js").as_path()));
    assert_eq!(paths.app_web_build(), root.join("build/web"));
    assert_eq!(paths.app_node_build(), Some(root.join("build/node").as_path()));
    assert_eq!(paths.served_path(), "/shop/");

    let configs = BundlerConfig::all_targets(&paths, &config);
    let targets: Vec<Target> = configs.iter().map(|c| c.target).collect();
    assert_eq!(targets, vec![Target::Web, Target::Node]);
    assert_eq!(configs[0].public_path, "/shop/");
    assert_eq!(configs[0].client_env["APP_FLAG"], "on");
    assert_eq!(configs[0].client_env["PUBLIC_URL"], "/shop");
    assert!(configs[1].html_template.is_none());
}

#[test]
fn no_homepage_and_no_override_serves_from_root() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/index.js", "");
    write(dir.path(), "package.json", r#"{"name": "plain"}"#);

    let config = BuildConfig::default();
    let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();

    assert_eq!(paths.served_path(), "/");
    assert_eq!(paths.public_url(), None);
    assert!(!paths.has_node_target());
    assert_eq!(paths.app_web_build(), paths.app_path().join("build"));
}

#[test]
fn override_wins_over_homepage() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/index.js", "");
    write(dir.path(), "package.json", r#"{"homepage": "https://example.com/shop"}"#);

    let config = BuildConfig::builder()
        .public_url_override("https://cdn.example.com/assets")
        .build();
    let paths = compute_paths(dir.path(), DeploymentLayer::Standalone, None, &config).unwrap();

    assert_eq!(paths.public_url(), Some("https://cdn.example.com/assets"));
    assert_eq!(paths.served_path(), "https://cdn.example.com/assets/");
}

#[test]
fn template_layer_resolves_inside_toolchain() {
    let dir = tempfile::tempdir().unwrap();
    let own = dir.path().join("packages").join(TOOLCHAIN_NAME);
    write(&own, "template/src/index.js", "");
    write(&own, "package.json", "{}");
    let app = dir.path().join("app");
    std::fs::create_dir_all(&app).unwrap();

    assert_eq!(
        DeploymentLayer::detect(&app, Some(&own), TOOLCHAIN_NAME),
        DeploymentLayer::Template
    );

    let config = BuildConfig::default();
    let paths = compute_paths(&app, DeploymentLayer::Template, Some(&own), &config).unwrap();

    assert_eq!(paths.app_web_index_js(), own.join("template/src/index.js"));
    assert_eq!(paths.app_web_build(), dir.path().join("build"));
    assert_eq!(paths.app_package_json(), own.join("package.json"));
    let toolchain = paths.toolchain().unwrap();
    assert_eq!(toolchain.own_node_modules, own.join("node_modules"));
}
