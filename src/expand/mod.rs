//! # Expansion Engine
//!
//! Expands one document into text with no directives left. For a document and
//! a scope the engine runs three passes, always in this order:
//!
//! 1. inline blocks are replaced, each with a scope derived from its attributes;
//! 2. the substitution pass runs over the whole text with the current scope and
//!    the suffix inherited into this call;
//! 3. reference includes in the substituted text are replaced by their target,
//!    indented and expanded recursively with the target as current document.
//!
//! Scopes are persistent values, so every directive works on its own derived
//! scope and nothing leaks to its siblings. The include stack catches
//! documents that include themselves; `max_depth` bounds everything else.
//!
//! Missing includes and malformed iteration sources do not stop expansion.
//! They are collected as warnings, in document order, and the directive
//! contributes empty text.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::errors::{to_source_span, BakeError, ErrorReporting, PhaseContext};
use crate::runtime::{Scope, SourceContext, Value};
use crate::storage::FileSystem;
use crate::syntax::attributes::{Attributes, Iteration};
use crate::syntax::parser::{apply_indent, find_includes, find_inline_blocks, Include, InlineBlock};
use crate::task::options::BakeOptions;

pub mod arrays;
pub mod substitute;
pub mod trace;

pub use arrays::resolve_array;
pub use substitute::{PlaceholderSubstitutor, ProcessFn, Substitutor};
pub use trace::{ExpansionStep, Outcome, StepKind};

/// The result of expanding one top-level document.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub text: String,
    /// Non-fatal conditions met on the way, in the order they were met.
    pub warnings: Vec<BakeError>,
    pub trace: Vec<ExpansionStep>,
}

/// Recursive directive expander over an injected file system.
pub struct Expander<'a> {
    fs: &'a dyn FileSystem,
    options: &'a BakeOptions,
    include_stack: Vec<PathBuf>,
    warnings: Vec<BakeError>,
    trace: Vec<ExpansionStep>,
}

impl<'a> Expander<'a> {
    pub fn new(fs: &'a dyn FileSystem, options: &'a BakeOptions) -> Self {
        Self {
            fs,
            options,
            include_stack: Vec::new(),
            warnings: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// Expands `text`, read from `document`, against `scope`.
    pub fn expand_document(
        mut self,
        text: &str,
        document: &Path,
        scope: &Scope,
    ) -> Result<Expansion, BakeError> {
        debug!(document = %document.display(), "expanding document");
        self.include_stack.push(normalize(document));
        let text = self.expand(text, document, scope, None, 0)?;
        Ok(Expansion {
            text,
            warnings: self.warnings,
            trace: self.trace,
        })
    }

    fn expand(
        &mut self,
        text: &str,
        document: &Path,
        scope: &Scope,
        suffix: Option<&str>,
        depth: usize,
    ) -> Result<String, BakeError> {
        if depth > self.options.max_depth {
            return Err(context(document, text).recursion_limit(self.options.max_depth, to_source_span(0..0)));
        }

        let text = self.replace_inline_blocks(text, document, scope, depth)?;
        let text = self.options.substitutor.substitute(&text, scope, suffix);
        self.replace_includes(&text, document, scope, depth)
    }

    // ========================================================================
    // INLINE BLOCKS
    // ========================================================================

    fn replace_inline_blocks(
        &mut self,
        text: &str,
        document: &Path,
        scope: &Scope,
        depth: usize,
    ) -> Result<String, BakeError> {
        let blocks = find_inline_blocks(text);
        if blocks.is_empty() {
            return Ok(text.to_string());
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for block in &blocks {
            out.push_str(&text[last..block.span.start]);
            out.push_str(&self.expand_inline(block, text, document, scope, depth)?);
            last = block.span.end;
        }
        out.push_str(&text[last..]);
        Ok(out)
    }

    fn expand_inline(
        &mut self,
        block: &InlineBlock<'_>,
        text: &str,
        document: &Path,
        scope: &Scope,
        depth: usize,
    ) -> Result<String, BakeError> {
        let attrs = Attributes::parse(block.attributes);
        let mut step = ExpansionStep {
            depth,
            kind: StepKind::Inline,
            document: document.to_path_buf(),
            target: None,
            outcome: Outcome::Expanded,
        };

        if !condition_holds(&attrs, scope) {
            step.outcome = Outcome::Skipped;
            self.record(step);
            return Ok(String::new());
        }

        let body = block.body.trim_end();
        let local = scope.merge(attrs.overrides.clone());

        let Some(iteration) = &attrs.iteration else {
            self.record(step);
            return self.expand(body, document, &local, attrs.suffix.as_deref(), depth + 1);
        };

        // Iterated bodies only get the substitution pass, once per item.
        let items = self.iteration_items(iteration, scope, document, text, block.span.clone());
        step.outcome = Outcome::Iterated(items.len());
        self.record(step);

        let rendered: Vec<String> = items
            .into_iter()
            .map(|item| {
                let bound = local.bind(&iteration.bound_key, item);
                self.options.substitutor.substitute(body, &bound, None)
            })
            .collect();
        Ok(rendered.join("\n"))
    }

    // ========================================================================
    // REFERENCE INCLUDES
    // ========================================================================

    fn replace_includes(
        &mut self,
        text: &str,
        document: &Path,
        scope: &Scope,
        depth: usize,
    ) -> Result<String, BakeError> {
        let includes = find_includes(text);
        if includes.is_empty() {
            return Ok(text.to_string());
        }

        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for include in &includes {
            out.push_str(&text[last..include.span.start]);
            out.push_str(&self.expand_include(include, text, document, scope, depth)?);
            last = include.span.end;
        }
        out.push_str(&text[last..]);
        Ok(out)
    }

    fn expand_include(
        &mut self,
        include: &Include<'_>,
        text: &str,
        document: &Path,
        scope: &Scope,
        depth: usize,
    ) -> Result<String, BakeError> {
        let target = self.resolve_target(include.target, document);
        let attrs = Attributes::parse(include.attributes);
        let mut step = ExpansionStep {
            depth,
            kind: StepKind::Include,
            document: document.to_path_buf(),
            target: Some(target.clone()),
            outcome: Outcome::Expanded,
        };

        if !condition_holds(&attrs, scope) {
            step.outcome = Outcome::Skipped;
            self.record(step);
            return Ok(String::new());
        }

        if !self.fs.exists(&target) {
            let span = to_source_span(include.span.clone());
            self.warnings.push(context(document, text).include_missing(&target, span));
            step.outcome = Outcome::Missing;
            self.record(step);
            return Ok(String::new());
        }

        if self.include_stack.contains(&target) {
            let chain: Vec<String> = self
                .include_stack
                .iter()
                .chain(std::iter::once(&target))
                .map(|p| p.display().to_string())
                .collect();
            return Err(context(document, text).include_cycle(&chain, to_source_span(include.span.clone())));
        }

        let raw = self.fs.read_text(&target)?;
        let content = apply_indent(include.indent, &raw);
        let local = scope.merge(attrs.overrides.clone());

        self.include_stack.push(target.clone());
        let result = match &attrs.iteration {
            Some(iteration) => {
                let items = self.iteration_items(iteration, scope, document, text, include.span.clone());
                step.outcome = Outcome::Iterated(items.len());
                self.record(step);
                self.expand_each(&content, &target, &local, iteration, items, depth)
            }
            None => {
                self.record(step);
                self.expand(&content, &target, &local, attrs.suffix.as_deref(), depth + 1)
            }
        };
        self.include_stack.pop();
        result
    }

    fn expand_each(
        &mut self,
        content: &str,
        target: &Path,
        scope: &Scope,
        iteration: &Iteration,
        items: Vec<Value>,
        depth: usize,
    ) -> Result<String, BakeError> {
        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            let bound = scope.bind(&iteration.bound_key, item);
            rendered.push(self.expand(content, target, &bound, None, depth + 1)?);
        }
        Ok(rendered.join("\n"))
    }

    /// `/x` is rooted at the base path, anything else is relative to the
    /// directory of the including document.
    fn resolve_target(&self, target: &str, document: &Path) -> PathBuf {
        let joined = match target.strip_prefix('/') {
            Some(rooted) => self.options.base_path.join(rooted),
            None => document.parent().unwrap_or(Path::new("")).join(target),
        };
        normalize(&joined)
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn iteration_items(
        &mut self,
        iteration: &Iteration,
        scope: &Scope,
        document: &Path,
        text: &str,
        span: std::ops::Range<usize>,
    ) -> Vec<Value> {
        match resolve_array(&iteration.source, scope) {
            Ok(items) => items,
            Err(not_a_list) => {
                self.warnings.push(context(document, text).malformed_iteration_source(
                    &not_a_list.path,
                    not_a_list.actual,
                    to_source_span(span),
                ));
                Vec::new()
            }
        }
    }

    fn record(&mut self, step: ExpansionStep) {
        trace!(depth = step.depth, outcome = %step.outcome, "{step}");
        self.trace.push(step);
    }
}

fn condition_holds(attrs: &Attributes, scope: &Scope) -> bool {
    attrs
        .condition
        .as_deref()
        .map_or(true, |key| scope.has_truthy_value(key))
}

fn context(document: &Path, text: &str) -> PhaseContext {
    PhaseContext::new(SourceContext::expanded(document, text), "expand")
}

/// Lexically removes `.` and resolvable `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_dot_segments() {
        assert_eq!(normalize(Path::new("a/./b/../c.html")), PathBuf::from("a/c.html"));
        assert_eq!(normalize(Path::new("../x.html")), PathBuf::from("../x.html"));
        assert_eq!(normalize(Path::new("./page.html")), PathBuf::from("page.html"));
    }

    #[test]
    fn targets_resolve_against_base_or_document() {
        let options = BakeOptions::default().with_base_path("site");
        let fs = crate::storage::MemoryFileSystem::new();
        let expander = Expander::new(&fs, &options);
        assert_eq!(
            expander.resolve_target("/parts/a.html", Path::new("src/page.html")),
            PathBuf::from("site/parts/a.html")
        );
        assert_eq!(
            expander.resolve_target("parts/a.html", Path::new("src/page.html")),
            PathBuf::from("src/parts/a.html")
        );
        assert_eq!(
            expander.resolve_target("parts/a.html", Path::new("page.html")),
            PathBuf::from("parts/a.html")
        );
    }
}
