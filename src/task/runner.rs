//! Batch runner: bakes a list of source/destination pairs with one set of
//! options. Every file is independent; a failure skips that file only.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{BakeError, ErrorKind};
use crate::expand::{Expander, Expansion};
use crate::reporting::Reporter;
use crate::runtime::Scope;
use crate::storage::FileSystem;
use crate::task::options::BakeOptions;

/// One output file and the document it is baked from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub src: PathBuf,
    pub dest: PathBuf,
}

impl FilePair {
    pub fn new(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dest: dest.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct BakeSummary {
    pub created: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, BakeError)>,
    pub warnings: usize,
}

impl BakeSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn absorb(&mut self, other: BakeSummary) {
        self.created.extend(other.created);
        self.failed.extend(other.failed);
        self.warnings += other.warnings;
    }
}

/// Builds the root scope: the content tree if one is configured, narrowed to
/// the configured section. A missing section is a warning and leaves the
/// scope empty.
pub fn load_scope(
    fs: &dyn FileSystem,
    options: &BakeOptions,
) -> Result<(Scope, Vec<BakeError>), BakeError> {
    let Some(content) = &options.content else {
        return Ok((Scope::new(), Vec::new()));
    };

    debug!(content = %content.display(), "loading content tree");
    let root = Scope::from_value(fs.read_value_tree(content)?);

    let Some(section) = &options.section else {
        return Ok((root, Vec::new()));
    };

    match root.section(section) {
        Some(scope) => Ok((scope, Vec::new())),
        None => {
            let warning = BakeError::new(
                ErrorKind::SectionMissing {
                    section: section.clone(),
                },
                "content",
            )
            .with_help(format!("add a \"{section}\" object to {}", content.display()));
            Ok((Scope::new(), vec![warning]))
        }
    }
}

/// Expands one top-level document. A missing source is fatal for that file.
pub fn bake_file(
    fs: &dyn FileSystem,
    options: &BakeOptions,
    scope: &Scope,
    src: &Path,
) -> Result<Expansion, BakeError> {
    if !fs.exists(src) {
        return Err(BakeError::new(
            ErrorKind::SourceMissing {
                path: src.display().to_string(),
            },
            "expand",
        ));
    }
    let text = fs.read_text(src)?;
    Expander::new(fs, options).expand_document(&text, src, scope)
}

/// Bakes every pair in order, reporting as it goes.
pub fn run_target(
    fs: &mut dyn FileSystem,
    options: &BakeOptions,
    files: &[FilePair],
    reporter: &mut dyn Reporter,
) -> BakeSummary {
    let mut summary = BakeSummary::default();

    let scope = match load_scope(&*fs, options) {
        Ok((scope, warnings)) => {
            for warning in &warnings {
                reporter.diagnostic(warning);
            }
            summary.warnings += warnings.len();
            scope
        }
        Err(error) => {
            reporter.diagnostic(&error);
            summary
                .failed
                .extend(files.iter().map(|pair| (pair.dest.clone(), error.clone())));
            return summary;
        }
    };

    for pair in files {
        let result = bake_file(&*fs, options, &scope, &pair.src).and_then(|expansion| {
            for warning in &expansion.warnings {
                reporter.diagnostic(warning);
            }
            summary.warnings += expansion.warnings.len();
            fs.write_text(&pair.dest, &expansion.text)
        });

        match result {
            Ok(()) => {
                info!(src = %pair.src.display(), dest = %pair.dest.display(), "baked");
                reporter.created(&pair.dest);
                summary.created.push(pair.dest.clone());
            }
            Err(error) => {
                reporter.diagnostic(&error);
                summary.failed.push((pair.dest.clone(), error));
            }
        }
    }

    summary
}
