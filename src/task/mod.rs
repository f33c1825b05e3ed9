//! Everything around a single expansion: options, manifests and the batch
//! runner that bakes a list of files.

pub mod config;
pub mod options;
pub mod runner;

pub use config::{FileMapping, Manifest, OptionsConfig, ResolvedTarget, TargetConfig};
pub use options::{BakeOptions, DEFAULT_MAX_DEPTH};
pub use runner::{bake_file, load_scope, run_target, BakeSummary, FilePair};
