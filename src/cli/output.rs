//! User-facing terminal output.
//!
//! Everything the user is meant to read goes through [`OutputManager`];
//! diagnostics go through `log`. Colors are applied only when enabled,
//! which by default means stdout is a terminal.

use owo_colors::OwoColorize;
use std::io::{self, IsTerminal, Write};

/// Colored, verbosity-aware printer.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    color: bool,
}

impl OutputManager {
    /// Creates a manager that colors output when stdout is a terminal.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self::with_color(verbose, quiet, io::stdout().is_terminal())
    }

    /// Creates a manager with colors explicitly on or off.
    pub fn with_color(verbose: bool, quiet: bool, color: bool) -> Self {
        Self {
            verbose,
            quiet,
            color,
        }
    }

    /// Prints a plain line unless quiet.
    pub fn println(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(io::stdout().lock(), "{message}")
    }

    /// Prints an empty line unless quiet.
    pub fn blank(&self) -> io::Result<()> {
        self.println("")
    }

    /// Prints only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        let message = self.dim(message);
        writeln!(io::stdout().lock(), "{message}")
    }

    /// Prints a yellow line unless quiet.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.println(&self.yellow(message))
    }

    /// Prints a green line unless quiet.
    pub fn success(&self, message: &str) -> io::Result<()> {
        self.println(&self.green(message))
    }

    /// Prints a progress line unless quiet.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        self.println(message)
    }

    /// Prints a red line to stderr, even when quiet.
    pub fn error(&self, message: &str) -> io::Result<()> {
        let message = self.red(message);
        writeln!(io::stderr().lock(), "{message}")
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(text, |t| t.green().to_string())
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(text, |t| t.red().to_string())
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan().to_string())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed().to_string())
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}
