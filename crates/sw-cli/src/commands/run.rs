//! Run command implementation

use anyhow::Result;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use sw_core::{ConfirmGate, RunOptions, Script};

use crate::cli::{GlobalArgs, RunArgs};
use crate::context::ResolvedPaths;

/// Gate that asks on stdin before each migration
struct StdinGate;

impl ConfirmGate for StdinGate {
    fn confirm(&self, script: &Script) -> bool {
        print!(
            "Apply migration {:04} ({})? [y/N] ",
            script.ordinal,
            script.file_name()
        );
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes")
    }
}

/// Execute the run command
pub(crate) async fn execute(args: &RunArgs, global: &GlobalArgs) -> Result<()> {
    let paths = ResolvedPaths::resolve(global)?;

    if global.verbose {
        eprintln!("[verbose] database: {}", paths.db.display());
        eprintln!("[verbose] migrations: {}", paths.migrations.display());
    }

    let options = RunOptions {
        dry_run: args.dry_run,
        backup_before_run: args.backup_first,
        gate: args
            .interactive
            .then(|| Arc::new(StdinGate) as Arc<dyn ConfirmGate>),
    };

    let outcome = sw_core::run_migrations(&paths.db, &paths.migrations, &options).await?;

    if args.dry_run {
        if outcome.pending.is_empty() {
            println!(
                "Database is up to date (version {})",
                outcome.final_version
            );
        } else {
            println!("{} pending migrations:", outcome.pending.len());
            for script in &outcome.pending {
                println!("  {:04}  {}", script.ordinal, script.file_name());
            }
        }
        return Ok(());
    }

    if let Some(ordinal) = outcome.declined {
        println!(
            "Stopped before migration {:04}; database remains at version {}",
            ordinal, outcome.final_version
        );
    } else if outcome.applied.is_empty() {
        println!(
            "Database is up to date (version {})",
            outcome.final_version
        );
    } else {
        println!(
            "Applied {} migrations, database now at version {}",
            outcome.applied.len(),
            outcome.final_version
        );
    }
    Ok(())
}
