//! Stepwise CLI - structured migrations for SQLite databases

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{backup, create_db, enroll, run, status};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match &cli.command {
        cli::Commands::Run(args) => run::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::CreateDb => create_db::execute(&cli.global).await,
        cli::Commands::Enroll(args) => enroll::execute(args, &cli.global).await,
        cli::Commands::Backup => backup::execute(&cli.global).await,
    }
}
