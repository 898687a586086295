//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Stepwise - structured migrations for SQLite databases
#[derive(Parser, Debug)]
#[command(name = "sw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the SQLite database file
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Path to the migrations directory
    #[arg(short, long, global = true)]
    pub migrations: Option<String>,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations to the database
    Run(RunArgs),

    /// Show tool version, database version, and pending migrations
    Status(StatusArgs),

    /// Create a new managed database at version 0
    CreateDb,

    /// Stamp an existing database with version tracking
    Enroll(EnrollArgs),

    /// Take a timestamped backup of the database file
    Backup,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Show which migrations would run without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Prompt for confirmation before each migration
    #[arg(short, long)]
    pub interactive: bool,

    /// Take an extra backup before the first migration runs
    #[arg(long)]
    pub backup_first: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable listing
    Table,
    /// JSON output
    Json,
}

/// Arguments for the enroll command
#[derive(Args, Debug)]
pub struct EnrollArgs {
    /// Do not generate a baseline schema script in the migrations directory
    #[arg(long)]
    pub no_baseline: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
