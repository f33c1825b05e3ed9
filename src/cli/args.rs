//! Command-line arguments and subcommands for the `bake` CLI.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "bake",
    version,
    about = "Composes documents from includes, inline blocks and placeholders."
)]
pub struct BakeArgs {
    /// Log every directive decision (same as RUST_LOG=bake=debug).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run targets from a manifest (all targets when none are named).
    Build {
        /// Manifest file. Defaults to bake.json / bake.yaml in the working directory.
        #[arg(short, long)]
        config: Option<PathBuf>,
        targets: Vec<String>,
    },
    /// Bake one document to a file or to stdout.
    Render {
        #[arg(required = true)]
        src: PathBuf,
        /// Destination file. Prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        options: RenderOptions,
    },
    /// Print every include and inline block visited while baking a document.
    Trace {
        #[arg(required = true)]
        src: PathBuf,
        #[command(flatten)]
        options: RenderOptions,
    },
}

/// Options shared by `render` and `trace`.
#[derive(Debug, Args)]
pub struct RenderOptions {
    /// Content tree (JSON or YAML) used as the root scope.
    #[arg(long)]
    pub content: Option<PathBuf>,
    /// Top-level key of the content tree to bake with.
    #[arg(long)]
    pub section: Option<String>,
    /// Root for include paths starting with `/`.
    #[arg(long)]
    pub base_path: Option<PathBuf>,
    /// Placeholder regex; capture group 1 is the key.
    #[arg(long)]
    pub pattern: Option<String>,
    /// Extra scope entries, `key=value`. Values are parsed as JSON when they can be.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}
