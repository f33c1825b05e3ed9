//! Table-driven cases loaded from `tests/fixtures/*.yaml`.
//!
//! ```yaml
//! - name: "case name"
//!   entry: page.html              # document to bake
//!   files: { page.html: "..." }   # in-memory file system
//!   scope: { key: value }         # optional root scope
//!   base_path: site               # optional
//!   expected: "..."               # baked text
//!   warnings: [bake::expand::include_missing]   # optional, in order
//!   expect_error: bake::expand::include_cycle   # instead of `expected`
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bake::{bake_file, BakeOptions, MemoryFileSystem, Scope, Value};
use serde::Deserialize;
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    name: String,
    entry: PathBuf,
    files: BTreeMap<String, String>,
    #[serde(default)]
    scope: Value,
    #[serde(default)]
    base_path: Option<PathBuf>,
    #[serde(default)]
    expected: Option<String>,
    #[serde(default)]
    warnings: Vec<String>,
    #[serde(default)]
    expect_error: Option<String>,
}

fn discover_fixtures() -> Vec<PathBuf> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "yaml"))
        .collect();
    found.sort();
    found
}

/// Runs one case, returning a failure message if it does not hold.
fn run_case(case: &Case) -> Result<(), String> {
    let fs = case
        .files
        .iter()
        .fold(MemoryFileSystem::new(), |fs, (path, text)| fs.with_file(path.as_str(), text.as_str()));
    let mut options = BakeOptions::default();
    if let Some(base) = &case.base_path {
        options = options.with_base_path(base.clone());
    }
    let scope = Scope::from_value(case.scope.clone());

    match (bake_file(&fs, &options, &scope, &case.entry), &case.expect_error) {
        (Ok(expansion), None) => {
            let expected = case.expected.as_deref().unwrap_or("");
            if expansion.text != expected {
                return Err(format!("expected {expected:?}, got {:?}", expansion.text));
            }
            let codes: Vec<&str> = expansion
                .warnings
                .iter()
                .map(|w| w.diagnostic_info.error_code.as_str())
                .collect();
            if codes != case.warnings {
                return Err(format!("expected warnings {:?}, got {codes:?}", case.warnings));
            }
            Ok(())
        }
        (Err(error), Some(code)) if &error.diagnostic_info.error_code == code => Ok(()),
        (Err(error), _) => Err(format!("unexpected error {}: {error}", error.diagnostic_info.error_code)),
        (Ok(expansion), Some(code)) => Err(format!("expected {code}, got {:?}", expansion.text)),
    }
}

#[test]
fn yaml_fixture_cases() {
    let fixtures = discover_fixtures();
    assert!(!fixtures.is_empty(), "no fixtures under tests/fixtures");

    let mut failures = Vec::new();
    let mut total = 0;
    for path in fixtures {
        let text = fs::read_to_string(&path).unwrap();
        let cases: Vec<Case> = serde_yaml::from_str(&text)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        for case in cases {
            total += 1;
            if let Err(message) = run_case(&case) {
                failures.push(format!("{} / {}: {message}", path.display(), case.name));
            }
        }
    }

    assert!(failures.is_empty(), "{} of {total} cases failed:\n{}", failures.len(), failures.join("\n"));
}
