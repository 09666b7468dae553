//! tsbundle CLI - Summarize NDO tech-support bundles.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();

    let cli = cli::Cli::parse();
    let formatter = output::create_formatter();

    commands::report::execute(&cli, &*formatter)
}
