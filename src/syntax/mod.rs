//! Directive syntax: the patterns, the scanner that finds directives in text,
//! and the attribute grammar they share.

pub mod attributes;
pub mod parser;
pub mod patterns;

pub use attributes::{Attributes, Iteration};
pub use parser::{find_includes, find_inline_blocks, Include, InlineBlock};
