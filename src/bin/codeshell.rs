//! Codeshell CLI Binary
//!
//! Command-line driver for the codeshell editor core.

use anyhow::Context;
use clap::Parser;
use codeshell::logging::init_logging;
use codeshell::tooling::cli::{Cli, CliContext};
use std::process;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CliContext::load_config(cli.config.as_deref()).context("loading configuration")?;
    init_logging(Some(&cli.logging_config(&config.logging))).context("initializing logging")?;
    let mut context =
        CliContext::new(config, cli.store.clone()).context("initializing workbench")?;

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
