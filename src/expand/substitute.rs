//! Placeholder substitution, as a replaceable strategy.
//!
//! The engine never touches placeholders itself; it hands text and scope to
//! whatever `Substitutor` the options carry. `PlaceholderSubstitutor` is the
//! built-in pass, `ProcessFn` adapts a caller's closure and bypasses the
//! built-in semantics entirely.

use std::fmt;

use regex::{Captures, Regex};

use crate::errors::{BakeError, ErrorKind};
use crate::runtime::Scope;
use crate::syntax::patterns::DEFAULT_PLACEHOLDER_PATTERN;

pub trait Substitutor {
    /// Replaces placeholders in `text`. `suffix` is the qualifier introduced by
    /// the enclosing directive, if any.
    fn substitute(&self, text: &str, scope: &Scope, suffix: Option<&str>) -> String;

    fn name(&self) -> &str {
        "custom"
    }
}

/// Replaces every match of `pattern` with the scope value of its first
/// capture group, in a single pass.
#[derive(Debug, Clone)]
pub struct PlaceholderSubstitutor {
    pattern: Regex,
}

impl PlaceholderSubstitutor {
    /// Compiles a custom placeholder pattern. The pattern must capture the key
    /// in its first group.
    pub fn new(pattern: &str) -> Result<Self, BakeError> {
        let invalid = |reason: String| {
            BakeError::new(
                ErrorKind::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason,
                },
                "config",
            )
        };
        let pattern = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
        if pattern.captures_len() < 2 {
            return Err(invalid("the key must be captured by group 1".to_string()));
        }
        Ok(Self { pattern })
    }
}

impl Default for PlaceholderSubstitutor {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PLACEHOLDER_PATTERN.clone(),
        }
    }
}

impl Substitutor for PlaceholderSubstitutor {
    fn substitute(&self, text: &str, scope: &Scope, suffix: Option<&str>) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let key = caps.get(1).map_or("", |m| m.as_str());
                scope.resolve(key, suffix)
            })
            .into_owned()
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}

/// A caller-supplied process function: receives the current text and scope
/// and returns the replacement text.
pub struct ProcessFn<F>(pub F);

impl<F> Substitutor for ProcessFn<F>
where
    F: Fn(&str, &Scope) -> String,
{
    fn substitute(&self, text: &str, scope: &Scope, _suffix: Option<&str>) -> String {
        (self.0)(text, scope)
    }
}

impl<F> fmt::Debug for ProcessFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProcessFn")
    }
}
