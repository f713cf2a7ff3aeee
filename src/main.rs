//! Stylesync CLI - incremental stylesheet builds
//!
//! Usage: stylesync [--config PATH] [--watch] [--json] [-v...]

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    let clean = commands::compile::cmd_compile(&cli)?;
    if !clean {
        std::process::exit(1);
    }
    Ok(())
}
