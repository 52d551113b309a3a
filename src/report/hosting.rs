//! Deployment hints printed after a successful build.

use crate::cli::OutputManager;
use crate::metadata::PackageManifest;
use std::path::Path;

/// Inputs for [`hosting_instructions`].
#[derive(Debug, Clone, Copy)]
pub struct HostingContext<'a> {
    pub manifest: &'a PackageManifest,
    /// Public URL the app was built for, if any
    pub public_url: Option<&'a str>,
    /// Served path the assets were emitted under
    pub public_path: &'a str,
    /// Web build folder as the user should type it
    pub build_folder: &'a str,
    pub use_yarn: bool,
}

/// Lines describing where the build assumes it is hosted and how to serve
/// or publish it.
pub fn hosting_instructions(ctx: &HostingContext<'_>, out: &OutputManager) -> Vec<String> {
    let mut lines = Vec::new();

    match ctx.public_url {
        Some(url) if url.contains(".github.io/") => {
            base_message(&mut lines, ctx, Some(ctx.public_path), out);
            deploy_instructions(&mut lines, url, ctx, out);
        }
        _ if ctx.public_path != "/" => {
            base_message(&mut lines, ctx, Some(ctx.public_path), out);
        }
        public_url => {
            base_message(&mut lines, ctx, public_url.filter(|u| !u.is_empty()), out);
            static_server_instructions(&mut lines, ctx, out);
        }
    }

    lines
}

/// `build` relative to `cwd` when it lies below it, else the full path.
pub fn display_build_folder(build: &Path, cwd: &Path) -> String {
    match build.strip_prefix(cwd) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => build.display().to_string(),
    }
}

fn base_message(
    lines: &mut Vec<String>,
    ctx: &HostingContext<'_>,
    hosting_location: Option<&str>,
    out: &OutputManager,
) {
    let project = match ctx.manifest.name.as_deref() {
        Some(name) => format!("The project {}", out.cyan(name)),
        None => "The project".to_string(),
    };
    lines.push(format!(
        "{project} was built assuming it is hosted at {}.",
        out.green(hosting_location.unwrap_or("the server root"))
    ));
    lines.push(format!(
        "You can control this with the {} field in your {}.",
        out.green("homepage"),
        out.cyan("package.json")
    ));

    if hosting_location.is_none() {
        lines.push("For example, add this to build it for GitHub Pages:".to_string());
        lines.push(String::new());
        lines.push(format!(
            "  {} {} {}{}",
            out.green("\"homepage\""),
            out.cyan(":"),
            out.green("\"http://myname.github.io/myapp\""),
            out.cyan(",")
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "The {} folder is ready to be deployed.",
        out.cyan(ctx.build_folder)
    ));
}

fn deploy_instructions(
    lines: &mut Vec<String>,
    public_url: &str,
    ctx: &HostingContext<'_>,
    out: &OutputManager,
) {
    let runner = if ctx.use_yarn { "yarn" } else { "npm" };

    lines.push(format!("To publish it at {} , run:", out.green(public_url)));
    lines.push(String::new());

    if !ctx.manifest.has_script("deploy") {
        if ctx.use_yarn {
            lines.push(format!("  {} add --dev gh-pages", out.cyan("yarn")));
        } else {
            lines.push(format!("  {} install --save-dev gh-pages", out.cyan("npm")));
        }
        lines.push(String::new());
        lines.push(format!(
            "Add the following script in your {}.",
            out.cyan("package.json")
        ));
        lines.push(String::new());

        let build_command = if ctx.use_yarn { "yarn" } else { "npm run" };
        lines.push(format!("    {}", out.dim("// ...")));
        lines.push(format!("    {}: {{", out.yellow("\"scripts\"")));
        lines.push(format!("      {}", out.dim("// ...")));
        lines.push(format!(
            "      {}: {}",
            out.yellow("\"predeploy\""),
            out.yellow(&format!("\"{build_command} build\","))
        ));
        lines.push(format!(
            "      {}: {}",
            out.yellow("\"deploy\""),
            out.yellow(&format!("\"gh-pages -d {}\"", ctx.build_folder))
        ));
        lines.push("    }".to_string());
        lines.push(String::new());
        lines.push("Then run:".to_string());
        lines.push(String::new());
    }

    lines.push(format!("  {} run deploy", out.cyan(runner)));
}

fn static_server_instructions(lines: &mut Vec<String>, ctx: &HostingContext<'_>, out: &OutputManager) {
    lines.push("You may serve it with a static server:".to_string());
    lines.push(String::new());
    if ctx.use_yarn {
        lines.push(format!("  {} global add serve", out.cyan("yarn")));
    } else {
        lines.push(format!("  {} install -g serve", out.cyan("npm")));
    }
    lines.push(format!("  {} -s {}", out.cyan("serve"), ctx.build_folder));
}
