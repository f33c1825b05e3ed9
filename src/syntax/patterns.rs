//! The directive surface, as compiled regular expressions.
//!
//! Directives live in HTML comments of the form `<!--(bake ...)-->`:
//!
//! ```text
//!   <!--(bake parts/footer.html year="2024")-->        reference include
//! <!--(bake-start _foreach="item:[x,y]")-->             inline block start
//! Item: {{item}}
//! <!--(bake-end)-->                                     inline block end
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// Default placeholder: a dotted key of word, dot and hyphen characters in
/// double curly braces.
pub const DEFAULT_PLACEHOLDER: &str = r"\{\{\s*([\.\-\w]*)\s*\}\}";

/// Groups: 1 = indent, 2 = target path, 3 = attribute text.
pub static INCLUDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([ \t]*)<!--\(\s?bake\s+([\w/.\-]+)\s?([^>]*)\)-->")
        .expect("include pattern is valid")
});

/// Groups: 1 = attribute text, 2 = body. The body is matched lazily up to the
/// first end marker, so inline blocks cannot nest.
pub static INLINE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[ \t]*<!--\(\s?bake-start\s+([^>]*)\)-->\n?([\s\S]+?)[ \t]*<!--\(\s?bake-end\s?\)-->",
    )
    .expect("inline block pattern is valid")
});

/// `key="value"` pairs; values are non-empty and cannot contain a double
/// quote. A pair with an empty value is not an attribute at all.
pub static ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([^\s="]+)="([^"]+)""#).expect("attribute pattern is valid"));

/// `suffix{"EN"}`
pub static SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"suffix\{"([^"]+)"\}"#).expect("suffix pattern is valid"));

/// A literal list such as `[a,b,c]`, whitespace already stripped.
pub static ARRAY_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([\w.,\-]*)\]$").expect("array pattern is valid"));

pub static DEFAULT_PLACEHOLDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_PLACEHOLDER).expect("placeholder pattern is valid"));
