//! Public URL and served path inference.
//!
//! The served path is the root prefix the built app is hosted under. It is
//! needed up front so the bundler can emit absolute asset URLs that still
//! work for nested client-side routes like `/todos/42`.

use url::Url;

/// Adds or removes a single trailing `/`.
pub fn ensure_slash(path: &str, needs_slash: bool) -> String {
    let has_slash = path.ends_with('/');
    match (has_slash, needs_slash) {
        (true, false) => path[..path.len() - 1].to_string(),
        (false, true) => format!("{path}/"),
        _ => path.to_string(),
    }
}

/// `PUBLIC_URL` override, else the manifest `homepage`.
pub fn public_url(override_url: Option<&str>, homepage: Option<&str>) -> Option<String> {
    non_empty(override_url).or(non_empty(homepage)).map(str::to_string)
}

/// Served path: the override verbatim, else the pathname of `homepage`, else
/// `/`; always ending in `/`.
pub fn served_path(override_url: Option<&str>, homepage: Option<&str>) -> String {
    let served = match (non_empty(override_url), non_empty(homepage)) {
        (Some(url), _) => url.to_string(),
        (None, Some(homepage)) => url_pathname(homepage),
        (None, None) => "/".to_string(),
    };
    ensure_slash(&served, true)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Pathname of an absolute URL, or the input minus query and fragment for
/// relative ones such as `.` or `/app`.
fn url_pathname(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => url.path().to_string(),
        Err(_) => raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
