//! The `bake` command-line interface.
//!
//! Thin dispatch over the library: every subcommand builds `BakeOptions`,
//! hands the work to the runner or the expander and reports through a
//! `ConsoleReporter`.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::args::{BakeArgs, Command, RenderOptions};
use crate::errors::{print_error, BakeError, ErrorKind};
use crate::reporting::{ConsoleReporter, Reporter};
use crate::runtime::{Path as KeyPath, Scope, Value};
use crate::storage::{FileSystem, OsFileSystem};
use crate::task::{bake_file, load_scope, run_target, BakeOptions, BakeSummary, Manifest};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = BakeArgs::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Command::Build { config, targets } => handle_build(config.as_deref(), &targets),
        Command::Render { src, output, options } => handle_render(&src, output.as_deref(), &options),
        Command::Trace { src, options } => handle_trace(&src, &options),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(error) => {
            print_error(error);
            process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "bake=debug" } else { "bake=warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Runs the named targets, or every target. A target that cannot be resolved
/// is reported and skipped. Returns whether all targets and files baked.
fn handle_build(config: Option<&Path>, targets: &[String]) -> Result<bool, BakeError> {
    let mut fs = OsFileSystem;
    let manifest_path = match config {
        Some(path) => path.to_path_buf(),
        None => Manifest::discover(&fs, Path::new(".")).ok_or_else(|| {
            BakeError::new(
                ErrorKind::InvalidConfig {
                    reason: "no bake.json or bake.yaml in the working directory".to_string(),
                },
                "config",
            )
            .with_help("pass a manifest with --config")
        })?,
    };
    let manifest = Manifest::load(&fs, &manifest_path)?;

    let names: Vec<String> = if targets.is_empty() {
        manifest.target_names().map(str::to_string).collect()
    } else {
        targets.to_vec()
    };

    let mut reporter = ConsoleReporter::default();
    let mut summary = BakeSummary::default();
    for name in &names {
        let target = match manifest.resolve(&fs, name) {
            Ok(target) => target,
            Err(error) => {
                reporter.diagnostic(&error);
                summary.failed.push((PathBuf::from(name), error));
                continue;
            }
        };
        for warning in &target.warnings {
            reporter.diagnostic(warning);
        }
        summary.warnings += target.warnings.len();
        tracing::info!(target = %target.name, files = target.files.len(), "running target");
        summary.absorb(run_target(&mut fs, &target.options, &target.files, &mut reporter));
    }

    output::print_summary(&summary);
    Ok(summary.is_success())
}

fn handle_render(src: &Path, dest: Option<&Path>, options: &RenderOptions) -> Result<bool, BakeError> {
    let mut fs = OsFileSystem;
    let bake_options = to_bake_options(options)?;
    let mut reporter = ConsoleReporter::default();

    let scope = scope_for(&fs, &bake_options, options, &mut reporter)?;
    let expansion = bake_file(&fs, &bake_options, &scope, src)?;
    for warning in &expansion.warnings {
        reporter.diagnostic(warning);
    }

    match dest {
        Some(dest) => {
            fs.write_text(dest, &expansion.text)?;
            reporter.created(dest);
        }
        None => print!("{}", expansion.text),
    }
    Ok(true)
}

fn handle_trace(src: &Path, options: &RenderOptions) -> Result<bool, BakeError> {
    let fs = OsFileSystem;
    let bake_options = to_bake_options(options)?;
    let mut reporter = ConsoleReporter::default();

    let scope = scope_for(&fs, &bake_options, options, &mut reporter)?;
    let expansion = bake_file(&fs, &bake_options, &scope, src)?;
    output::print_trace(&expansion.trace);
    for warning in &expansion.warnings {
        reporter.diagnostic(warning);
    }
    Ok(true)
}

// ============================================================================
// HELPERS
// ============================================================================

fn to_bake_options(options: &RenderOptions) -> Result<BakeOptions, BakeError> {
    let mut bake_options = BakeOptions::new();
    if let Some(content) = &options.content {
        bake_options = bake_options.with_content(content.clone());
    }
    if let Some(section) = &options.section {
        bake_options = bake_options.with_section(section.clone());
    }
    if let Some(base_path) = &options.base_path {
        bake_options = bake_options.with_base_path(base_path.clone());
    }
    if let Some(pattern) = &options.pattern {
        bake_options = bake_options.with_parse_pattern(pattern)?;
    }
    Ok(bake_options)
}

/// The root scope plus any `--set key=value` entries.
fn scope_for(
    fs: &dyn FileSystem,
    bake_options: &BakeOptions,
    options: &RenderOptions,
    reporter: &mut dyn Reporter,
) -> Result<Scope, BakeError> {
    let (mut scope, warnings) = load_scope(fs, bake_options)?;
    for warning in &warnings {
        reporter.diagnostic(warning);
    }
    for entry in &options.set {
        let (key, raw) = parse_assignment(entry)?;
        scope = scope.set(&KeyPath::parse(key), raw);
    }
    Ok(scope)
}

fn parse_assignment(entry: &str) -> Result<(&str, Value), BakeError> {
    let (key, raw) = entry.split_once('=').ok_or_else(|| {
        BakeError::new(
            ErrorKind::InvalidConfig {
                reason: format!("expected KEY=VALUE, got \"{entry}\""),
            },
            "config",
        )
    })?;
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw));
    Ok((key.trim(), value))
}
