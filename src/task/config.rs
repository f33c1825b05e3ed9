//! Manifest files: default options shared by every target, plus named targets
//! each carrying their own option overrides and file mappings.
//!
//! ```yaml
//! options:
//!   content: content.json
//!   base_path: app
//! targets:
//!   site:
//!     options: { section: en }
//!     files:
//!       - { src: app/index.html, dest: dist/index.html }
//!       - { src_dir: app/pages, dest_dir: dist/pages, extension: html }
//! ```
//!
//! Relative paths are taken relative to the manifest's own directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{BakeError, ErrorKind};
use crate::storage::FileSystem;
use crate::task::options::BakeOptions;
use crate::task::runner::FilePair;

/// Manifest names tried, in order, when none is given.
pub const DEFAULT_MANIFESTS: &[&str] = &["bake.json", "bake.yaml", "bake.yml"];

/// Option fields as written in a manifest. Every field is optional so a
/// target can override only what it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptionsConfig {
    pub content: Option<PathBuf>,
    pub section: Option<String>,
    pub base_path: Option<PathBuf>,
    pub parse_pattern: Option<String>,
    pub max_depth: Option<usize>,
}

impl OptionsConfig {
    /// Field-wise overlay: values set here win over `defaults`.
    pub fn or(&self, defaults: &OptionsConfig) -> OptionsConfig {
        OptionsConfig {
            content: self.content.clone().or_else(|| defaults.content.clone()),
            section: self.section.clone().or_else(|| defaults.section.clone()),
            base_path: self.base_path.clone().or_else(|| defaults.base_path.clone()),
            parse_pattern: self.parse_pattern.clone().or_else(|| defaults.parse_pattern.clone()),
            max_depth: self.max_depth.or(defaults.max_depth),
        }
    }

    pub fn to_options(&self, root: &Path) -> Result<BakeOptions, BakeError> {
        let mut options = BakeOptions::new();
        if let Some(content) = &self.content {
            options = options.with_content(root.join(content));
        }
        if let Some(section) = &self.section {
            options = options.with_section(section.clone());
        }
        options = options.with_base_path(match &self.base_path {
            Some(base) => root.join(base),
            None => root.to_path_buf(),
        });
        if let Some(pattern) = &self.parse_pattern {
            options = options.with_parse_pattern(pattern)?;
        }
        if let Some(max_depth) = self.max_depth {
            options = options.with_max_depth(max_depth);
        }
        Ok(options)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FileMapping {
    File {
        src: PathBuf,
        dest: PathBuf,
    },
    /// Every file below `src_dir` (optionally only one extension), written to
    /// the same relative path below `dest_dir`.
    Tree {
        src_dir: PathBuf,
        dest_dir: PathBuf,
        #[serde(default)]
        extension: Option<String>,
    },
}

impl FileMapping {
    /// Concrete file pairs for this mapping. A `src_dir` that does not exist
    /// comes back as a `SourceDirMissing` warning instead of pairs.
    pub fn expand(&self, fs: &dyn FileSystem, root: &Path) -> Result<Vec<FilePair>, BakeError> {
        match self {
            FileMapping::File { src, dest } => Ok(vec![FilePair::new(root.join(src), root.join(dest))]),
            FileMapping::Tree {
                src_dir,
                dest_dir,
                extension,
            } => {
                let src_dir = root.join(src_dir);
                let dest_dir = root.join(dest_dir);
                if !fs.is_dir(&src_dir) {
                    return Err(BakeError::new(
                        ErrorKind::SourceDirMissing {
                            path: src_dir.display().to_string(),
                        },
                        "config",
                    )
                    .with_help("the mapping contributes no files; check src_dir in the manifest"));
                }
                let wanted = extension.as_deref().map(|ext| ext.trim_start_matches('.'));

                let mut pairs = Vec::new();
                for src in fs.list_files(&src_dir)? {
                    if let Some(ext) = wanted {
                        if src.extension().map_or(true, |e| e != ext) {
                            continue;
                        }
                    }
                    let Ok(relative) = src.strip_prefix(&src_dir) else {
                        continue;
                    };
                    let dest = dest_dir.join(relative);
                    pairs.push(FilePair::new(src, dest));
                }
                Ok(pairs)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    pub options: OptionsConfig,
    pub files: Vec<FileMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    pub options: OptionsConfig,
    pub targets: BTreeMap<String, TargetConfig>,
    /// Directory the manifest was loaded from.
    #[serde(skip)]
    pub root: PathBuf,
}

/// A target ready to run: merged options and concrete file pairs.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub name: String,
    pub options: BakeOptions,
    pub files: Vec<FilePair>,
    /// Mappings that were skipped, such as a missing `src_dir`.
    pub warnings: Vec<BakeError>,
}

impl Manifest {
    /// Reads a manifest. YAML for `.yaml`/`.yml`, JSON otherwise.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, BakeError> {
        let text = fs.read_text(path)?;
        let yaml = path.extension().map_or(false, |ext| ext == "yaml" || ext == "yml");
        let mut manifest = Self::parse(&text, yaml)?;
        manifest.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    /// Finds the first of the default manifest names that exists in `dir`.
    pub fn discover(fs: &dyn FileSystem, dir: &Path) -> Option<PathBuf> {
        DEFAULT_MANIFESTS
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| fs.exists(candidate))
    }

    pub fn parse(text: &str, yaml: bool) -> Result<Self, BakeError> {
        let invalid = |reason: String| BakeError::new(ErrorKind::InvalidConfig { reason }, "config");
        if yaml {
            serde_yaml::from_str(text).map_err(|e| invalid(e.to_string()))
        } else {
            serde_json::from_str(text).map_err(|e| invalid(e.to_string()))
        }
    }

    pub fn target(&self, name: &str) -> Result<&TargetConfig, BakeError> {
        self.targets.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.targets.keys().map(String::as_str).collect();
            BakeError::new(ErrorKind::UnknownTarget { name: name.to_string() }, "config")
                .with_help(format!("known targets: {}", known.join(", ")))
        })
    }

    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Merges the target's options over the manifest defaults and expands its
    /// file mappings.
    pub fn resolve(&self, fs: &dyn FileSystem, name: &str) -> Result<ResolvedTarget, BakeError> {
        let target = self.target(name)?;
        let options = target.options.or(&self.options).to_options(&self.root)?;
        let mut files = Vec::new();
        let mut warnings = Vec::new();
        for mapping in &target.files {
            match mapping.expand(fs, &self.root) {
                Ok(pairs) => files.extend(pairs),
                Err(warning) if warning.is_warning() => warnings.push(warning),
                Err(error) => return Err(error),
            }
        }
        Ok(ResolvedTarget {
            name: name.to_string(),
            options,
            files,
            warnings,
        })
    }
}
