//! Array Resolver - the source side of an iteration.

use crate::runtime::{Scope, Value};
use crate::syntax::patterns::ARRAY_LITERAL;

/// An iteration source path that resolved to something other than a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotAList {
    pub path: String,
    pub actual: &'static str,
}

/// Resolves an iteration source to its ordered items.
///
/// `[a,b,c]` is a literal list of strings; anything else is a dotted path into
/// `scope`. An absent path yields no items.
pub fn resolve_array(token: &str, scope: &Scope) -> Result<Vec<Value>, NotAList> {
    let token: String = token.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(caps) = ARRAY_LITERAL.captures(&token) {
        let inner = caps.get(1).map_or("", |m| m.as_str());
        if inner.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(inner.split(',').map(Value::from).collect());
    }

    match scope.lookup(&token) {
        None => Ok(Vec::new()),
        Some(Value::List(items)) => Ok(items.clone()),
        Some(other) => Err(NotAList {
            path: token,
            actual: other.type_name(),
        }),
    }
}
