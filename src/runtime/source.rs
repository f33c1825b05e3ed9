use miette::NamedSource;
use std::path::Path;
use std::sync::Arc;

/// A document's name and text, kept so diagnostics can point into it.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// A document part-way through expansion. `content` is the intermediate
    /// text the spans index, which may already differ from the file on disk,
    /// so the name says so.
    pub fn expanded(path: &Path, content: &str) -> Self {
        Self::from_file(format!("{} (expanded)", path.display()), content)
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.to_string()))
    }
}
