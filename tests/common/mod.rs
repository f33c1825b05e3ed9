//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::path::Path;

use bake::{bake_file, BakeError, BakeOptions, Expansion, MemoryFileSystem, Scope};

/// Builds an in-memory file system from `(path, text)` pairs.
pub fn files(entries: &[(&str, &str)]) -> MemoryFileSystem {
    entries
        .iter()
        .fold(MemoryFileSystem::new(), |fs, (path, text)| fs.with_file(*path, *text))
}

/// Scope from a JSON object literal.
pub fn scope(json: &str) -> Scope {
    Scope::from_value(serde_json::from_str(json).expect("test scope is valid JSON"))
}

pub fn bake_with(
    fs: &MemoryFileSystem,
    options: &BakeOptions,
    scope: &Scope,
    entry: &str,
) -> Result<Expansion, BakeError> {
    bake_file(fs, options, scope, Path::new(entry))
}

/// Bakes `entry` with default options and an empty scope, returning the text.
pub fn bake(fs: &MemoryFileSystem, entry: &str) -> String {
    bake_with(fs, &BakeOptions::default(), &Scope::new(), entry)
        .expect("bake succeeds")
        .text
}
