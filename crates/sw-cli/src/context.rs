//! Path resolution shared by CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use sw_core::Config;

use crate::cli::GlobalArgs;

/// Database and migrations paths resolved for a command invocation.
///
/// CLI flags override the config file, which overrides built-in defaults.
pub struct ResolvedPaths {
    pub db: PathBuf,
    pub migrations: PathBuf,
}

impl ResolvedPaths {
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(Path::new(".")).context("Failed to load configuration")?
        };

        let paths = Self {
            db: args
                .db
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or(config.database),
            migrations: args
                .migrations
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or(config.migrations),
        };
        log::debug!(
            "resolved paths: db={} migrations={}",
            paths.db.display(),
            paths.migrations.display()
        );
        Ok(paths)
    }
}
