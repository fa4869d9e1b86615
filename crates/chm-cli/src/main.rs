//! chm CLI - apply versioned SQL migrations to ClickHouse exactly once

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{applied, common, migrate};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging(cli.global.log_level);

    match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        cli::Commands::Applied(args) => applied::execute(args, &cli.global).await,
    }
}
