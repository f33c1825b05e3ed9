//! The reporting channel: where diagnostics and per-file confirmations go.
//!
//! The runner only talks to a `Reporter`, which keeps it testable and lets an
//! embedding host route messages into its own log.

use std::io::Write;
use std::path::{Path, PathBuf};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::BakeError;

pub trait Reporter {
    /// A warning or error met while baking.
    fn diagnostic(&mut self, error: &BakeError);

    /// An output file was written.
    fn created(&mut self, dest: &Path);
}

// ============================================================================
// CONSOLE
// ============================================================================

/// Diagnostics as miette reports on stderr, confirmations in green on stdout.
pub struct ConsoleReporter {
    stdout: StandardStream,
}

impl ConsoleReporter {
    pub fn new(color: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(color),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

impl Reporter for ConsoleReporter {
    fn diagnostic(&mut self, error: &BakeError) {
        tracing::debug!(code = %error.diagnostic_info.error_code, warning = error.is_warning(), "{error}");
        eprintln!("{:?}", miette::Report::new(error.clone()));
    }

    fn created(&mut self, dest: &Path) {
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
        let _ = write!(self.stdout, ">> ");
        let _ = self.stdout.reset();
        let _ = writeln!(self.stdout, "File \"{}\" created.", dest.display());
    }
}

// ============================================================================
// CAPTURE
// ============================================================================

/// Collects everything for tests or programmatic inspection.
#[derive(Debug, Default)]
pub struct BufferReporter {
    pub diagnostics: Vec<BakeError>,
    pub created: Vec<PathBuf>,
}

impl BufferReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &BakeError> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    pub fn errors(&self) -> impl Iterator<Item = &BakeError> {
        self.diagnostics.iter().filter(|d| !d.is_warning())
    }
}

impl Reporter for BufferReporter {
    fn diagnostic(&mut self, error: &BakeError) {
        self.diagnostics.push(error.clone());
    }

    fn created(&mut self, dest: &Path) {
        self.created.push(dest.to_path_buf());
    }
}
