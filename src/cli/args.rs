//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CONFIG_FILE;

/// Markdown preprocessor for component documentation sites
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (searched upward from the current directory)
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Branch used in source links (default: `[repo].branch`, then the git branch)
    #[arg(short, long, global = true)]
    pub branch: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default config file to the current directory
    #[command(visible_alias = "i")]
    Init {
        /// Print the config instead of writing it
        #[arg(long)]
        dry: bool,
    },

    /// Transform a single file and print the result
    #[command(visible_alias = "t")]
    Transform {
        /// Source file (relative to cwd or the docs root)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Transform the docs tree into the output directory
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Files or directories to process. If omitted, processes the docs root.
    /// Use `-` to read paths from stdin.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Output directory (default: `[build].output`)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Remove the output directory before building
    #[arg(short, long)]
    pub clean: bool,

    /// Keep running and re-process changed files
    #[arg(short, long)]
    pub watch: bool,

    /// Print a JSON report of processed files to stdout
    #[arg(long)]
    pub json: bool,
}
