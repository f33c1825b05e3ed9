//! Per-invocation bake options.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::BakeError;
use crate::expand::substitute::{PlaceholderSubstitutor, ProcessFn, Substitutor};
use crate::runtime::Scope;

/// Default include nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 100;

#[derive(Clone)]
pub struct BakeOptions {
    /// Content tree document (JSON or YAML) the root scope is built from.
    pub content: Option<PathBuf>,
    /// Top-level key of the content tree to narrow the scope to.
    pub section: Option<String>,
    /// Root for include paths that start with `/`.
    pub base_path: PathBuf,
    pub substitutor: Arc<dyn Substitutor>,
    pub max_depth: usize,
}

impl Default for BakeOptions {
    fn default() -> Self {
        Self {
            content: None,
            section: None,
            base_path: PathBuf::new(),
            substitutor: Arc::new(PlaceholderSubstitutor::default()),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl BakeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Into<PathBuf>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Replaces the placeholder pattern of the built-in substitution pass.
    pub fn with_parse_pattern(mut self, pattern: &str) -> Result<Self, BakeError> {
        self.substitutor = Arc::new(PlaceholderSubstitutor::new(pattern)?);
        Ok(self)
    }

    pub fn with_substitutor(mut self, substitutor: impl Substitutor + 'static) -> Self {
        self.substitutor = Arc::new(substitutor);
        self
    }

    /// Installs a process function in place of placeholder substitution.
    pub fn with_process<F>(self, process: F) -> Self
    where
        F: Fn(&str, &Scope) -> String + 'static,
    {
        self.with_substitutor(ProcessFn(process))
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl fmt::Debug for BakeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BakeOptions")
            .field("content", &self.content)
            .field("section", &self.section)
            .field("base_path", &self.base_path)
            .field("substitutor", &self.substitutor.name())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
