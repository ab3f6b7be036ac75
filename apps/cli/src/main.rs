//! Vitae CLI: content pipeline for an academic portfolio site.
//!
//! Validates one-file-per-record content, orders it for display, and exports
//! it as JSON for the site templates.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
