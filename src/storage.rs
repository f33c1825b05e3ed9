//! Storage capabilities the engine is given rather than owns: existence
//! checks, reading text, reading a content tree, writing output.
//!
//! `OsFileSystem` talks to the disk. `MemoryFileSystem` keeps documents in a
//! map, which is what embedders and the test-suite use.

use std::fs;
use std::path::{Path, PathBuf};

use im::OrdMap;
use walkdir::WalkDir;

use crate::errors::{BakeError, ErrorKind};
use crate::runtime::Value;

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn read_text(&self, path: &Path) -> Result<String, BakeError>;

    fn write_text(&mut self, path: &Path, text: &str) -> Result<(), BakeError>;

    /// Every file below `dir`, recursively, sorted.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, BakeError>;

    /// Parses a content tree. YAML for `.yaml`/`.yml`, JSON otherwise.
    fn read_value_tree(&self, path: &Path) -> Result<Value, BakeError> {
        let text = self.read_text(path)?;
        parse_value_tree(path, &text)
    }
}

/// Parses `text` as the content tree stored at `path`.
pub fn parse_value_tree(path: &Path, text: &str) -> Result<Value, BakeError> {
    let content_parse = |reason: String| {
        BakeError::new(
            ErrorKind::ContentParse {
                path: path.display().to_string(),
                reason,
            },
            "content",
        )
    };

    if is_yaml(path) {
        serde_yaml::from_str(text).map_err(|e| content_parse(e.to_string()))
    } else {
        serde_json::from_str(text).map_err(|e| content_parse(e.to_string()))
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false)
}

// ============================================================================
// DISK
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_text(&self, path: &Path) -> Result<String, BakeError> {
        fs::read_to_string(path).map_err(|e| BakeError::resource("read", path, e))
    }

    fn write_text(&mut self, path: &Path, text: &str) -> Result<(), BakeError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| BakeError::resource("create directory", parent, e))?;
        }
        fs::write(path, text).map_err(|e| BakeError::resource("write", path, e))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, BakeError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| BakeError::resource("walk", dir, e))?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

// ============================================================================
// MEMORY
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: OrdMap<PathBuf, String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document, builder style.
    pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Directories are implied by the documents stored below them.
    fn is_dir(&self, path: &Path) -> bool {
        self.files.keys().any(|file| file != path && file.starts_with(path))
    }

    fn read_text(&self, path: &Path) -> Result<String, BakeError> {
        self.get(path)
            .map(str::to_string)
            .ok_or_else(|| BakeError::resource("read", path, "no such file"))
    }

    fn write_text(&mut self, path: &Path, text: &str) -> Result<(), BakeError> {
        self.insert(path, text);
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, BakeError> {
        Ok(self
            .files
            .keys()
            .filter(|path| path.starts_with(dir))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_round_trip() {
        let mut fs = MemoryFileSystem::new().with_file("a/b.html", "hi");
        assert!(fs.exists(Path::new("a/b.html")));
        assert!(!fs.exists(Path::new("a/c.html")));
        fs.write_text(Path::new("out/b.html"), "done").unwrap();
        assert_eq!(fs.get("out/b.html"), Some("done"));
    }

    #[test]
    fn memory_lists_files_below_a_directory() {
        let fs = MemoryFileSystem::new()
            .with_file("site/b.html", "")
            .with_file("site/a/c.html", "")
            .with_file("other/d.html", "");
        let listed = fs.list_files(Path::new("site")).unwrap();
        assert_eq!(listed, vec![PathBuf::from("site/a/c.html"), PathBuf::from("site/b.html")]);
        assert!(fs.is_dir(Path::new("site/a")));
        assert!(!fs.is_dir(Path::new("site/b.html")));
        assert!(!fs.is_dir(Path::new("nope")));
    }

    #[test]
    fn missing_file_is_a_resource_error() {
        let err = MemoryFileSystem::new().read_text(Path::new("nope")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ResourceOperation { .. }));
    }

    #[test]
    fn value_tree_format_follows_extension() {
        let fs = MemoryFileSystem::new()
            .with_file("c.json", r#"{"a": 1}"#)
            .with_file("c.yaml", "a: 1\n")
            .with_file("bad.json", "{");
        assert_eq!(fs.read_value_tree(Path::new("c.json")).unwrap(), fs.read_value_tree(Path::new("c.yaml")).unwrap());
        let err = fs.read_value_tree(Path::new("bad.json")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ContentParse { .. }));
    }
}
