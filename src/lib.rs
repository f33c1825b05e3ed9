//! Bake: composes one document from a tree of templates joined by include
//! directives, with per-include scopes, conditionals, iteration and
//! placeholder substitution.

pub use crate::errors::{BakeError, ErrorKind};
pub use crate::expand::{Expander, Expansion, PlaceholderSubstitutor, Substitutor};
pub use crate::reporting::{BufferReporter, ConsoleReporter, Reporter};
pub use crate::runtime::{Scope, Value};
pub use crate::storage::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use crate::task::{bake_file, run_target, BakeOptions, BakeSummary, FilePair, Manifest};

pub mod cli;
pub mod errors;
pub mod expand;
pub mod reporting;
pub mod runtime;
pub mod storage;
pub mod syntax;
pub mod task;
