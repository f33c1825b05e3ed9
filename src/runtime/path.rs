//! A canonical, type-safe representation of a dotted path into the scope.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path(pub Vec<String>);

impl Path {
    /// Splits a dotted key reference such as `home.footer.text`.
    pub fn parse(dotted: &str) -> Self {
        Self(dotted.split('.').map(str::to_string).collect())
    }

    /// Returns the path with `suffix` appended to its first segment, so
    /// `title.short` qualified by `EN` becomes `titleEN.short`.
    pub fn qualified(&self, suffix: &str) -> Self {
        let mut segments = self.0.clone();
        if let Some(head) = segments.first_mut() {
            head.push_str(suffix);
        }
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for Path {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}
