//! docsplice - markdown preprocessor for component documentation sites.

mod cli;
mod config;
mod logger;
mod transform;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { dry } => cli::init::init_config(&config, *dry),
        Commands::Transform { file, output } => {
            cli::transform::run_transform(&config, file, output.as_deref())
        }
        Commands::Build { args } => cli::build::build_docs(&config, args),
    }
}
