//! Runtime data for a bake: the value tree, dotted paths into it, the scope
//! that directives read and override, and document sources for diagnostics.

pub mod path;
pub mod scope;
pub mod source;
pub mod value;

pub use path::Path;
pub use scope::Scope;
pub use source::SourceContext;
pub use value::Value;
