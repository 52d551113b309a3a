//! Cleanup of raw bundler errors and warnings into readable text.

use super::{BundlerMessage, BundlerStats};
use regex::Regex;
use std::sync::LazyLock;

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("static regex"));

static LOADER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Module [A-Za-z ]+\(from").expect("static regex"));

static PARSING_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Line (\d+):(?:(\d+):)?\s*Parsing error: (.+)$").expect("static regex")
});

static SYNTAX_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SyntaxError\s+\((\d+):(\d+)\)\s*(.+?)\n").expect("static regex")
});

static MISSING_DEFAULT_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^.*export 'default' \(imported as '([^']+)'\) was not found in '([^']+)'.*$")
        .expect("static regex")
});

static MISSING_RENAMED_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^.*export '([^']+)' \(imported as '([^']+)'\) was not found in '([^']+)'.*$")
        .expect("static regex")
});

static MISSING_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^.*export '([^']+)' was not found in '([^']+)'.*$").expect("static regex")
});

static LOCATION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*) \d+:\d+-\d+$").expect("static regex"));

static STACK_FRAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*at\s.*:\d+:\d+[\s)]*$").expect("static regex"));

static ANONYMOUS_FRAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*at\s<anonymous>\s*$").expect("static regex"));

/// Formatted errors and warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedMessages {
    /// Errors; only syntax errors when any are present
    pub errors: Vec<String>,
    /// Warnings
    pub warnings: Vec<String>,
}

/// Formats every message and, when syntax errors exist, keeps only those
/// since the rest are usually follow-on noise.
pub fn format_messages(stats: &BundlerStats) -> FormattedMessages {
    let mut errors: Vec<String> = stats.errors.iter().map(format_message).collect();
    let warnings = stats.warnings.iter().map(format_message).collect();

    if errors.iter().any(|e| is_likely_syntax_error(e)) {
        errors.retain(|e| is_likely_syntax_error(e));
    }

    FormattedMessages { errors, warnings }
}

fn is_likely_syntax_error(message: &str) -> bool {
    message.contains("Syntax error:")
}

fn format_message(message: &BundlerMessage) -> String {
    let raw = ANSI_ESCAPE.replace_all(&message.text(), "").into_owned();

    let joined = raw
        .lines()
        .filter(|line| !LOADER_HEADER.is_match(line))
        .map(rewrite_parsing_error)
        .collect::<Vec<_>>()
        .join("\n");

    // Trailing newline lets the last syntax error line match too.
    let terminated = format!("{joined}\n");
    let smooshed = SYNTAX_ERROR.replace_all(&terminated, "Syntax error: $3 ($1:$2)\n");
    let smooshed = rewrite_export_errors(&smooshed);

    let mut lines: Vec<String> = smooshed.lines().map(str::to_string).collect();

    if lines.len() > 2 && lines[1].trim().is_empty() {
        lines.remove(1);
    }

    if let Some(first) = lines.first_mut() {
        let cleaned = LOCATION_SUFFIX.replace(first.as_str(), "$1").into_owned();
        *first = cleaned;
    }

    if lines.len() > 1 && lines[1].starts_with("Module not found: ") {
        let cleaned = lines[1]
            .replacen("Error: ", "", 1)
            .replacen("Module not found: Cannot find file:", "Cannot find file:", 1);
        lines = vec![lines[0].clone(), cleaned];
    }

    let lines: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| {
            let is_frame = STACK_FRAME.is_match(line) && !line.contains("webpack:");
            !is_frame && !ANONYMOUS_FRAME.is_match(line)
        })
        .collect();

    let mut deduped: Vec<&str> = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let repeated_blank =
            index > 0 && line.trim().is_empty() && lines[index - 1].trim().is_empty();
        if !repeated_blank {
            deduped.push(*line);
        }
    }

    deduped.join("\n").trim().to_string()
}

/// Turns "export 'x' was not found in 'y'" into an import error.
fn rewrite_export_errors(message: &str) -> String {
    let message = MISSING_DEFAULT_EXPORT.replace_all(
        message,
        "Attempted import error: '$2' does not contain a default export (imported as '$1').",
    );
    let message = MISSING_RENAMED_EXPORT.replace_all(
        &message,
        "Attempted import error: '$1' is not exported from '$3' (imported as '$2').",
    );
    MISSING_EXPORT
        .replace_all(&message, "Attempted import error: '$1' is not exported from '$2'.")
        .into_owned()
}

fn rewrite_parsing_error(line: &str) -> String {
    match PARSING_ERROR.captures(line) {
        Some(caps) => {
            let error_line = &caps[1];
            let error_column = caps.get(2).map(|m| m.as_str()).unwrap_or("1");
            let message = caps[3].trim_end_matches('.');
            format!("Syntax error: {message} ({error_line}:{error_column})")
        }
        None => line.to_string(),
    }
}
