//! User-facing output for the CLI: the expansion trace tree and the build
//! summary.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::expand::{ExpansionStep, Outcome};
use crate::task::BakeSummary;

// ============================================================================
// TRACE
// ============================================================================

/// Prints the steps as a tree, one line per directive, indented by depth.
pub fn print_trace(steps: &[ExpansionStep]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for step in steps {
        let _ = write!(stdout, "{}", "  ".repeat(step.depth));
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(outcome_color(&step.outcome))).set_bold(true));
        let _ = write!(stdout, "{:<10}", step.outcome.to_string());
        let _ = stdout.reset();
        let _ = writeln!(stdout, " {}", step);
    }
}

fn outcome_color(outcome: &Outcome) -> Color {
    match outcome {
        Outcome::Expanded => Color::Green,
        Outcome::Iterated(_) => Color::Cyan,
        Outcome::Skipped => Color::Yellow,
        Outcome::Missing => Color::Red,
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

pub fn print_summary(summary: &BakeSummary) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if summary.is_success() { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "Done:");
    let _ = stdout.reset();
    let _ = writeln!(
        stdout,
        " {} created, {} failed, {} warnings",
        summary.created.len(),
        summary.failed.len(),
        summary.warnings
    );
}
