//! Bake Error Handling - Unified Encapsulated API
//!
//! Every failure the engine can observe is a [`BakeError`]: a kind (what went
//! wrong), source information (which document and where in it), and diagnostic
//! information (code, help, severity). Errors render through `miette`.
//!
//! Most conditions are non-fatal. Missing includes, missing sections and
//! malformed iteration sources are warnings that are collected while a document
//! is expanded; only a missing top-level source, a cycle, the depth limit or an
//! I/O failure abandons an output file. A manifest directory that does not
//! exist is likewise only a warning for its target.

use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, Severity, SourceSpan};
use thiserror::Error;

pub use crate::runtime::source::SourceContext;

/// The single error type - kind, location and diagnostic extras.
#[derive(Debug, Clone)]
pub struct BakeError {
    /// What went wrong (type-specific data)
    pub kind: ErrorKind,
    /// Where it happened
    pub source_info: SourceInfo,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

/// All error types as a clean enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Expansion conditions
    #[error("source file \"{path}\" not found")]
    SourceMissing { path: String },
    #[error("included file \"{path}\" not found")]
    IncludeMissing { path: String },
    #[error("iteration source \"{source_path}\" is a {actual}, expected a list")]
    MalformedIterationSource { source_path: String, actual: String },
    #[error("include cycle detected: {chain}")]
    IncludeCycle { chain: String },
    #[error("include depth exceeded the limit of {limit}")]
    RecursionLimit { limit: usize },

    // Content tree
    #[error("content doesn't have section \"{section}\"")]
    SectionMissing { section: String },
    #[error("failed to parse content \"{path}\": {reason}")]
    ContentParse { path: String, reason: String },

    // Resources
    #[error("failed to {operation} \"{path}\": {reason}")]
    ResourceOperation {
        operation: String,
        path: String,
        reason: String,
    },

    // Configuration
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
    #[error("unknown target \"{name}\"")]
    UnknownTarget { name: String },
    #[error("source directory \"{path}\" not found")]
    SourceDirMissing { path: String },
}

impl ErrorKind {
    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::SourceMissing { .. } => "source_missing",
            Self::IncludeMissing { .. } => "include_missing",
            Self::MalformedIterationSource { .. } => "malformed_iteration_source",
            Self::IncludeCycle { .. } => "include_cycle",
            Self::RecursionLimit { .. } => "recursion_limit",
            Self::SectionMissing { .. } => "section_missing",
            Self::ContentParse { .. } => "content_parse",
            Self::ResourceOperation { .. } => "resource_operation",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::InvalidConfig { .. } => "invalid_config",
            Self::UnknownTarget { .. } => "unknown_target",
            Self::SourceDirMissing { .. } => "source_dir_missing",
        }
    }

    /// Conditions that are reported but never stop a bake.
    pub const fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::IncludeMissing { .. }
                | Self::SectionMissing { .. }
                | Self::MalformedIterationSource { .. }
                | Self::SourceDirMissing { .. }
        )
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::SourceMissing { .. } => "missing source",
            Self::IncludeMissing { .. } => "included here",
            Self::MalformedIterationSource { .. } => "iterated here",
            Self::IncludeCycle { .. } => "cycle closes here",
            Self::RecursionLimit { .. } => "limit reached here",
            Self::SectionMissing { .. } => "missing section",
            Self::ContentParse { .. } => "parse failure",
            Self::ResourceOperation { .. } => "resource failure",
            Self::InvalidPattern { .. } => "invalid pattern",
            Self::InvalidConfig { .. } => "invalid configuration",
            Self::UnknownTarget { .. } => "unknown target",
            Self::SourceDirMissing { .. } => "missing directory",
        }
    }
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// The document the error points into, when there is one.
    pub source: Option<Arc<NamedSource<String>>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

impl BakeError {
    /// Creates an error that is not tied to any document, such as a failed
    /// write or a bad command-line pattern.
    pub fn new(kind: ErrorKind, phase: &str) -> Self {
        let error_code = format!("bake::{}::{}", phase, kind.code_suffix());
        Self {
            kind,
            source_info: SourceInfo {
                source: None,
                primary_span: unspanned(),
                phase: phase.to_string(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }

    /// Wraps an I/O failure on `path`.
    pub fn resource(operation: &str, path: &Path, error: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::ResourceOperation {
                operation: operation.to_string(),
                path: path.display().to_string(),
                reason: error.to_string(),
            },
            "storage",
        )
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic_info.help = Some(help.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.kind.is_warning()
    }
}

impl std::error::Error for BakeError {}

impl fmt::Display for BakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for BakeError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn severity(&self) -> Option<Severity> {
        if self.kind.is_warning() {
            Some(Severity::Warning)
        } else {
            Some(Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.source_info.source.as_ref()?;
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_info
            .source
            .as_ref()
            .map(|s| &**s as &dyn miette::SourceCode)
    }
}

/// Context-aware error creation - each context knows how to create appropriate errors
pub trait ErrorReporting {
    /// Create an error with context-appropriate enhancements
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> BakeError;

    fn include_missing(&self, path: &Path, span: SourceSpan) -> BakeError {
        self.report(
            ErrorKind::IncludeMissing {
                path: path.display().to_string(),
            },
            span,
        )
        .with_help("the directive expands to nothing; check the include path")
    }

    fn malformed_iteration_source(&self, source_path: &str, actual: &str, span: SourceSpan) -> BakeError {
        self.report(
            ErrorKind::MalformedIterationSource {
                source_path: source_path.into(),
                actual: actual.into(),
            },
            span,
        )
    }

    fn include_cycle(&self, chain: &[String], span: SourceSpan) -> BakeError {
        self.report(
            ErrorKind::IncludeCycle {
                chain: chain.join(" -> "),
            },
            span,
        )
        .with_help("a document may not include itself, directly or through other includes")
    }

    fn recursion_limit(&self, limit: usize, span: SourceSpan) -> BakeError {
        self.report(ErrorKind::RecursionLimit { limit }, span)
    }
}

/// General-purpose error creation context: a document plus the pipeline
/// phase that is reading it.
pub struct PhaseContext {
    pub source: SourceContext,
    pub phase: String,
}

impl PhaseContext {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }
}

impl ErrorReporting for PhaseContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> BakeError {
        let error_code = format!("bake::{}::{}", self.phase, kind.code_suffix());

        BakeError {
            kind,
            source_info: SourceInfo {
                source: Some(self.source.to_named_source()),
                primary_span: span,
                phase: self.phase.clone(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }
}

/// Creates a placeholder span for errors not tied to a specific source
/// location.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Converts a byte range inside a document to a miette span.
pub fn to_source_span(range: Range<usize>) -> SourceSpan {
    SourceSpan::from(range)
}

/// Prints a BakeError with full miette diagnostics
pub fn print_error(error: BakeError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_classified_by_kind() {
        let missing = ErrorKind::IncludeMissing { path: "a.html".into() };
        let cycle = ErrorKind::IncludeCycle { chain: "a -> a".into() };
        assert!(missing.is_warning());
        assert!(!cycle.is_warning());
        assert!(ErrorKind::SourceDirMissing { path: "pages".into() }.is_warning());
        assert!(!ErrorKind::UnknownTarget { name: "docs".into() }.is_warning());
    }

    #[test]
    fn phase_context_labels_the_directive() {
        let ctx = PhaseContext::new(
            SourceContext::from_file("page.html", "<!--(bake nope.html)-->"),
            "expand",
        );
        let error = ctx.include_missing(Path::new("nope.html"), to_source_span(0..23));
        assert_eq!(error.diagnostic_info.error_code, "bake::expand::include_missing");
        assert_eq!(error.severity(), Some(Severity::Warning));

        let output = format!("{:?}", miette::Report::new(error));
        assert!(output.contains("nope.html"));
        assert!(output.contains("included here"));
    }

    #[test]
    fn unsourced_errors_have_no_labels() {
        let error = BakeError::new(ErrorKind::UnknownTarget { name: "docs".into() }, "config");
        assert!(error.labels().is_none());
        assert_eq!(error.to_string(), "unknown target \"docs\"");
    }
}
