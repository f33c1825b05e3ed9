//! The value scope that placeholders and conditions resolve against.
//!
//! A `Scope` is persistent: `merge`, `bind` and `set` return a new scope and
//! leave the receiver untouched. The expansion engine hands each directive its
//! own derived scope, so overrides and iteration bindings are visible only in
//! that directive's subtree and there is nothing to restore afterwards.

use im::HashMap;

use crate::runtime::path::Path;
use crate::runtime::value::Value;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope {
    data: HashMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a scope from a content tree. Anything but a map yields an empty
    /// scope, since only keyed values are addressable.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Map(data) => Self { data },
            _ => Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Map(self.data.clone())
    }

    /// Traverses nested maps (and list indices) left to right. `None` is the
    /// absent sentinel: distinct from an empty string and from `false`.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        let (head, rest) = path.segments().split_first()?;
        let mut current = self.data.get(head)?;
        for key in rest {
            current = match current {
                Value::Map(map) => map.get(key)?,
                Value::List(items) => items.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn lookup(&self, dotted: &str) -> Option<&Value> {
        self.get(&Path::parse(dotted))
    }

    /// Only `false` and absence are falsy; `0`, `""` and `null` count as set.
    pub fn has_truthy_value(&self, dotted: &str) -> bool {
        !matches!(self.lookup(dotted), None | Some(Value::Bool(false)))
    }

    /// Looks `dotted` up with its first segment qualified by `suffix`, falling
    /// back to the unqualified path when the qualified one is absent.
    pub fn suffixed_get(&self, dotted: &str, suffix: Option<&str>) -> Option<&Value> {
        let path = Path::parse(dotted);
        match suffix {
            Some(suffix) if !suffix.is_empty() => {
                self.get(&path.qualified(suffix)).or_else(|| self.get(&path))
            }
            _ => self.get(&path),
        }
    }

    /// Resolves a placeholder key to its replacement text; absent keys
    /// render as an empty string.
    pub fn resolve(&self, dotted: &str, suffix: Option<&str>) -> String {
        self.suffixed_get(dotted, suffix)
            .map(Value::render)
            .unwrap_or_default()
    }

    /// Shallow-merges top-level `overrides` onto a copy of this scope; the
    /// overrides win.
    pub fn merge<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut data = self.data.clone();
        for (key, value) in overrides {
            data.insert(key.into(), value.into());
        }
        Self { data }
    }

    /// Rebinds a single top-level key, as iteration does for its bound key.
    pub fn bind(&self, key: &str, value: Value) -> Self {
        Self {
            data: self.data.update(key.to_string(), value),
        }
    }

    /// Sets a value at a nested path, creating intermediate maps.
    pub fn set(&self, path: &Path, value: Value) -> Self {
        if path.segments().is_empty() {
            return self.clone();
        }
        match set_recursive(&self.to_value(), path.segments(), value) {
            Value::Map(data) => Self { data },
            _ => self.clone(),
        }
    }

    /// Narrows the scope to a named top-level section.
    pub fn section(&self, name: &str) -> Option<Scope> {
        match self.data.get(name)? {
            Value::Map(data) => Some(Self { data: data.clone() }),
            _ => None,
        }
    }
}

// Recursive helper for immutable `set`.
fn set_recursive(current: &Value, path_segments: &[String], val: Value) -> Value {
    let Some((key, remaining)) = path_segments.split_first() else {
        return current.clone();
    };

    let mut map = match current {
        Value::Map(m) => m.clone(),
        _ => HashMap::new(),
    };

    if remaining.is_empty() {
        map.insert(key.clone(), val);
    } else {
        let child = map.get(key).cloned().unwrap_or_default();
        map.insert(key.clone(), set_recursive(&child, remaining, val));
    }

    Value::Map(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(json: &str) -> Scope {
        Scope::from_value(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn get_traverses_nested_maps() {
        let s = scope(r#"{"home": {"footer": {"text": "bye"}}}"#);
        assert_eq!(s.lookup("home.footer.text"), Some(&Value::from("bye")));
        assert_eq!(s.lookup("home.header.text"), None);
        assert_eq!(s.lookup("home.footer.text.more"), None);
    }

    #[test]
    fn get_indexes_lists() {
        let s = scope(r#"{"items": [{"name": "a"}, {"name": "b"}]}"#);
        assert_eq!(s.lookup("items.1.name"), Some(&Value::from("b")));
        assert_eq!(s.lookup("items.7.name"), None);
    }

    #[test]
    fn only_false_and_absent_are_falsy() {
        let s = scope(r#"{"off": false, "zero": 0, "empty": "", "nothing": null, "on": true}"#);
        assert!(!s.has_truthy_value("off"));
        assert!(!s.has_truthy_value("missing"));
        assert!(s.has_truthy_value("zero"));
        assert!(s.has_truthy_value("empty"));
        assert!(s.has_truthy_value("nothing"));
        assert!(s.has_truthy_value("on"));
    }

    #[test]
    fn suffix_prefers_qualified_key_then_falls_back() {
        let both = scope(r#"{"title": "T", "titleEN": "E"}"#);
        assert_eq!(both.resolve("title", Some("EN")), "E");

        let plain = scope(r#"{"title": "T"}"#);
        assert_eq!(plain.resolve("title", Some("EN")), "T");
        assert_eq!(plain.resolve("title", Some("")), "T");
        assert_eq!(plain.resolve("title", None), "T");
        assert_eq!(plain.resolve("subtitle", Some("EN")), "");
    }

    #[test]
    fn suffix_qualifies_only_the_first_segment() {
        let s = scope(r#"{"navDE": {"home": "Start"}, "nav": {"home": "Home"}}"#);
        assert_eq!(s.resolve("nav.home", Some("DE")), "Start");
        assert_eq!(s.resolve("nav.home", Some("FR")), "Home");
    }

    #[test]
    fn merge_and_bind_leave_the_parent_untouched() {
        let parent = scope(r#"{"year": "2023", "name": "site"}"#);
        let child = parent.merge([("year", "2024")]).bind("item", Value::from("x"));

        assert_eq!(child.resolve("year", None), "2024");
        assert_eq!(child.resolve("item", None), "x");
        assert_eq!(parent.resolve("year", None), "2023");
        assert_eq!(parent.lookup("item"), None);
    }

    #[test]
    fn set_creates_intermediate_maps() {
        let s = Scope::new().set(&Path::parse("a.b.c"), Value::from("deep"));
        assert_eq!(s.resolve("a.b.c", None), "deep");
    }

    #[test]
    fn section_narrows_to_a_map() {
        let s = scope(r#"{"en": {"title": "Hello"}, "flag": true}"#);
        assert_eq!(s.section("en").unwrap().resolve("title", None), "Hello");
        assert!(s.section("flag").is_none());
        assert!(s.section("de").is_none());
    }
}
