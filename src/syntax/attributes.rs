//! Attribute Resolver - turns a directive's raw attribute text into scope
//! overrides plus the reserved controls.

use std::collections::BTreeMap;

use crate::syntax::patterns::{ATTRIBUTE, SUFFIX};

/// Attribute naming the dotted path a directive is conditional on.
pub const CONDITION_KEY: &str = "_if";
/// Attribute holding an iteration spec, `boundKey:source`.
pub const ITERATION_KEY: &str = "_foreach";

/// `_foreach="item:[a,b]"` or `_foreach="item:nav.items"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub bound_key: String,
    pub source: String,
}

impl Iteration {
    /// Splits on the first `:`; a spec without one has an empty source.
    pub fn parse(spec: &str) -> Self {
        let (bound_key, source) = spec.split_once(':').unwrap_or((spec, ""));
        Self {
            bound_key: bound_key.trim().to_string(),
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    /// Every plain `key="value"` pair; these become scope overrides.
    pub overrides: BTreeMap<String, String>,
    pub condition: Option<String>,
    pub iteration: Option<Iteration>,
    pub suffix: Option<String>,
}

impl Attributes {
    pub fn parse(raw: &str) -> Self {
        let mut overrides: BTreeMap<String, String> = ATTRIBUTE
            .captures_iter(raw)
            .filter_map(|caps| Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string())))
            .collect();

        let condition = overrides.remove(CONDITION_KEY);
        let iteration = overrides.remove(ITERATION_KEY).map(|spec| Iteration::parse(&spec));
        let suffix = parse_suffix(raw);

        Self {
            overrides,
            condition,
            iteration,
            suffix,
        }
    }
}

/// Extracts `suffix{"VALUE"}` from raw attribute text.
pub fn parse_suffix(raw: &str) -> Option<String> {
    SUFFIX
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
