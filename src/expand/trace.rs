//! A record of every directive the expander visited, in visiting order.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Inline,
    Include,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Expanded,
    /// The conditional resolved to `false` or was absent.
    Skipped,
    /// Expanded once per item.
    Iterated(usize),
    /// The include target does not exist.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionStep {
    pub depth: usize,
    pub kind: StepKind,
    /// The document the directive was found in.
    pub document: PathBuf,
    /// The resolved include target; `None` for inline blocks.
    pub target: Option<PathBuf>,
    pub outcome: Outcome,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Expanded => write!(f, "expanded"),
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Iterated(n) => write!(f, "iterated {n}x"),
            Outcome::Missing => write!(f, "missing"),
        }
    }
}

impl fmt::Display for ExpansionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.target) {
            (StepKind::Include, Some(target)) => {
                write!(f, "include {}", target.display())
            }
            _ => write!(f, "inline block in {}", self.document.display()),
        }
    }
}
