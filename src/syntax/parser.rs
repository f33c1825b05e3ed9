//! Directive Parser - finds the two directive shapes in raw text.
//!
//! Directives are discovered by scanning, not by building a tree: inline blocks
//! and reference includes are found independently on whatever text the engine
//! is currently looking at. Each match keeps its byte span so the engine can
//! splice results back in and diagnostics can point at the directive.

use std::ops::Range;

use crate::syntax::patterns::{INCLUDE, INLINE_BLOCK};

/// `<!--(bake-start attrs)--> body <!--(bake-end)-->`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineBlock<'a> {
    pub span: Range<usize>,
    pub attributes: &'a str,
    pub body: &'a str,
}

/// `<indent><!--(bake target attrs)-->`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include<'a> {
    pub span: Range<usize>,
    pub indent: &'a str,
    pub target: &'a str,
    pub attributes: &'a str,
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// All inline blocks in `text`, left to right.
pub fn find_inline_blocks(text: &str) -> Vec<InlineBlock<'_>> {
    INLINE_BLOCK
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(InlineBlock {
                span: whole.range(),
                attributes: caps.get(1).map_or("", |m| m.as_str()),
                body: caps.get(2).map_or("", |m| m.as_str()),
            })
        })
        .collect()
}

/// All reference includes in `text`, left to right.
pub fn find_includes(text: &str) -> Vec<Include<'_>> {
    INCLUDE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(Include {
                span: whole.range(),
                indent: caps.get(1).map_or("", |m| m.as_str()),
                target: caps.get(2)?.as_str(),
                attributes: caps.get(3).map_or("", |m| m.as_str()),
            })
        })
        .collect()
}

/// Prepends `indent` to every line of `content`, blank lines included.
pub fn apply_indent(indent: &str, content: &str) -> String {
    if indent.is_empty() {
        return content.to_string();
    }
    content
        .split('\n')
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_include_with_indent_and_attributes() {
        let text = "<ul>\n  <!--(bake parts/item.html year=\"2024\")-->\n</ul>";
        let found = find_includes(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].indent, "  ");
        assert_eq!(found[0].target, "parts/item.html");
        assert_eq!(found[0].attributes.trim(), "year=\"2024\"");
        assert_eq!(&text[found[0].span.clone()], "  <!--(bake parts/item.html year=\"2024\")-->");
    }

    #[test]
    fn finds_include_without_attributes() {
        let found = find_includes("<!--(bake /header.html)-->");
        assert_eq!(found[0].target, "/header.html");
        assert_eq!(found[0].attributes, "");
        assert_eq!(found[0].indent, "");
    }

    #[test]
    fn include_pattern_ignores_inline_markers() {
        assert!(find_includes("<!--(bake-start a=\"1\")-->x<!--(bake-end)-->").is_empty());
    }

    #[test]
    fn finds_inline_block_body_without_leading_newline() {
        let text = "<!--(bake-start _foreach=\"item:[x,y]\")-->\nItem: {{item}}\n<!--(bake-end)-->";
        let found = find_inline_blocks(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attributes, "_foreach=\"item:[x,y]\"");
        assert_eq!(found[0].body, "Item: {{item}}\n");
        assert_eq!(found[0].span, 0..text.len());
    }

    #[test]
    fn inline_blocks_end_at_the_first_end_marker() {
        let text = "<!--(bake-start a=\"1\")-->A<!--(bake-end)--> mid <!--(bake-start b=\"2\")-->B<!--(bake-end)-->";
        let found = find_inline_blocks(text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].body, "A");
        assert_eq!(found[1].body, "B");
    }

    #[test]
    fn indent_applies_to_blank_lines_too() {
        assert_eq!(apply_indent("  ", "a\nb"), "  a\n  b");
        assert_eq!(apply_indent("\t", "a\n\nb"), "\ta\n\t\n\tb");
        assert_eq!(apply_indent("", "a\nb"), "a\nb");
    }
}
