//! Migration runner - the apply loop and the programmatic surface

use crate::backup;
use crate::catalog;
use crate::error::{MigrateError, MigrateResult};
use crate::executor;
use crate::script::Script;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sw_db::{Backend, SqliteBackend};

/// Per-script confirmation gate for interactive runs
pub trait ConfirmGate: Send + Sync {
    /// Return false to stop the run cleanly before this script
    fn confirm(&self, script: &Script) -> bool;
}

/// Gate that approves every script
pub struct AutoApprove;

impl ConfirmGate for AutoApprove {
    fn confirm(&self, _script: &Script) -> bool {
        true
    }
}

/// Options controlling a migration run
#[derive(Default)]
pub struct RunOptions {
    /// Report pending scripts without applying anything
    pub dry_run: bool,
    /// Take one extra backup before the first script, independent of the
    /// per-script backups
    pub backup_before_run: bool,
    /// Per-script confirmation gate; None applies every pending script
    pub gate: Option<Arc<dyn ConfirmGate>>,
}

/// Outcome of a migration run that did not halt on an error
#[derive(Debug)]
pub struct RunOutcome {
    /// Version before the run
    pub starting_version: u32,
    /// Ordinals applied, in order
    pub applied: Vec<u32>,
    /// Version after the run
    pub final_version: u32,
    /// Scripts left pending: the full list on a dry run, the remainder
    /// when the gate declined one
    pub pending: Vec<Script>,
    /// Ordinal the interactive gate declined, if any
    pub declined: Option<u32>,
}

/// Tool and database versions reported by [`current_versions`]
#[derive(Debug, Serialize)]
pub struct Versions {
    /// Version of this crate
    pub tool_version: String,
    /// Stored database version; None when the database is unmanaged
    pub db_version: Option<u32>,
}

/// Apply all pending migrations to a SQLite database file.
///
/// The database must already exist and be managed. Each script gets a
/// fresh file backup beforehand; a failed script triggers a restore and
/// halts the run with the script's error.
pub async fn run_migrations(
    db_path: &Path,
    migrations_dir: &Path,
    options: &RunOptions,
) -> MigrateResult<RunOutcome> {
    if !db_path.is_file() {
        return Err(MigrateError::DatabaseNotFound {
            path: db_path.display().to_string(),
        });
    }
    let backend = SqliteBackend::open(db_path)?;
    run_with(&backend, db_path, migrations_dir, options, true).await
}

/// Apply all pending migrations through a caller-supplied backend.
///
/// The backend owns version storage and declarative execution; file-level
/// backup and restore are skipped because an externally managed store has
/// its own durability story. `db_path` is still handed to process-invoked
/// scripts. The backend is borrowed only for the duration of the run.
pub async fn run_migrations_with_backend(
    backend: &dyn Backend,
    db_path: &Path,
    migrations_dir: &Path,
    options: &RunOptions,
) -> MigrateResult<RunOutcome> {
    run_with(backend, db_path, migrations_dir, options, false).await
}

async fn run_with(
    backend: &dyn Backend,
    db_path: &Path,
    migrations_dir: &Path,
    options: &RunOptions,
    file_backend: bool,
) -> MigrateResult<RunOutcome> {
    let current = match backend.read_version().await? {
        Some(v) => v,
        None => {
            return Err(MigrateError::UnmanagedDatabase {
                path: db_path.display().to_string(),
            })
        }
    };
    log::debug!(
        "database {} is at version {} ({} backend)",
        db_path.display(),
        current,
        backend.backend_type()
    );

    let scripts = catalog::discover(migrations_dir)?;
    let pending = catalog::pending(&scripts, current);

    if pending.is_empty() {
        log::info!("database is up to date (version {})", current);
        backend.close().await?;
        return Ok(RunOutcome {
            starting_version: current,
            applied: Vec::new(),
            final_version: current,
            pending: Vec::new(),
            declined: None,
        });
    }

    if options.dry_run {
        log::info!("dry run: {} migrations pending", pending.len());
        backend.close().await?;
        return Ok(RunOutcome {
            starting_version: current,
            applied: Vec::new(),
            final_version: current,
            pending,
            declined: None,
        });
    }

    if options.backup_before_run && file_backend {
        let path = backup::create_backup(db_path)?;
        log::info!("pre-run backup written to {}", path.display());
    }

    let mut applied = Vec::new();
    let mut version = current;

    for (i, script) in pending.iter().enumerate() {
        if let Some(gate) = &options.gate {
            if !gate.confirm(script) {
                log::info!(
                    "stopped before migration {} at operator request",
                    script.ordinal
                );
                backend.close().await?;
                return Ok(RunOutcome {
                    starting_version: current,
                    applied,
                    final_version: version,
                    pending: pending[i..].to_vec(),
                    declined: Some(script.ordinal),
                });
            }
        }

        log::info!("applying migration {}: {}", script.ordinal, script.file_name());

        let backup_path = if file_backend {
            Some(backup::create_backup(db_path)?)
        } else {
            None
        };

        match executor::execute_script(backend, db_path, script).await {
            Ok(()) => {
                backend.write_version(script.ordinal).await?;
                version = script.ordinal;
                applied.push(script.ordinal);
                log::info!("database updated to version {}", version);
                if let Some(backup_path) = backup_path {
                    // Only failure backups are audit artifacts
                    if let Err(e) = fs::remove_file(&backup_path) {
                        log::warn!("could not remove backup {}: {}", backup_path.display(), e);
                    }
                }
            }
            Err(err) => {
                log::error!("{}", err);
                if let Some(backup_path) = backup_path {
                    log::warn!(
                        "restoring {} from {}",
                        db_path.display(),
                        backup_path.display()
                    );
                    backup::restore_backup(&backup_path, db_path)?;
                    log::warn!("database restored to its pre-migration state");
                }
                backend.close().await?;
                return Err(err);
            }
        }
    }

    backend.close().await?;
    Ok(RunOutcome {
        starting_version: current,
        applied,
        final_version: version,
        pending: Vec::new(),
        declined: None,
    })
}

/// Create a managed database at `path`, with version storage stamped 0.
///
/// Opening an already-managed database returns its current version;
/// an existing unmanaged file is an error (enroll it instead).
pub async fn create_db(db_path: &Path) -> MigrateResult<u32> {
    if db_path.is_file() {
        let backend = SqliteBackend::open(db_path)?;
        return match backend.read_version().await? {
            Some(version) => Ok(version),
            None => Err(MigrateError::UnmanagedDatabase {
                path: db_path.display().to_string(),
            }),
        };
    }

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| MigrateError::io(parent, e))?;
        }
    }
    let backend = SqliteBackend::open_or_create(db_path)?;
    backend.ensure_version_storage().await?;
    log::info!("created managed database {} at version 0", db_path.display());
    Ok(0)
}

/// Enroll an existing, unmanaged database: create version storage and
/// stamp it with version 1.
///
/// When `migrations_dir` is given and holds no ordinal-1 script, the live
/// schema is captured into `0001-baseline-schema.sql` so the stamped
/// version has a matching script on disk.
pub async fn enroll_db(db_path: &Path, migrations_dir: Option<&Path>) -> MigrateResult<u32> {
    if !db_path.is_file() {
        return Err(MigrateError::DatabaseNotFound {
            path: db_path.display().to_string(),
        });
    }
    let backend = SqliteBackend::open(db_path)?;
    if let Some(version) = backend.read_version().await? {
        return Err(MigrateError::AlreadyManaged {
            path: db_path.display().to_string(),
            version,
        });
    }

    backend.ensure_version_storage().await?;
    backend.write_version(1).await?;
    if let Some(dir) = migrations_dir {
        write_baseline_script(&backend, dir)?;
    }
    log::info!("enrolled {} at version 1", db_path.display());
    Ok(1)
}

fn write_baseline_script(backend: &SqliteBackend, migrations_dir: &Path) -> MigrateResult<()> {
    let scripts = catalog::discover(migrations_dir)?;
    if scripts.iter().any(|s| s.ordinal == 1) {
        log::debug!("migration 0001 already exists, skipping baseline generation");
        return Ok(());
    }

    let mut body = String::from(
        "-- Baseline schema captured at enrollment.\n\
         -- The database was stamped version 1 with this schema already in place.\n",
    );
    for stmt in backend.schema_sql()? {
        body.push_str(&stmt);
        body.push_str(";\n");
    }

    fs::create_dir_all(migrations_dir).map_err(|e| MigrateError::io(migrations_dir, e))?;
    let path = migrations_dir.join("0001-baseline-schema.sql");
    fs::write(&path, body).map_err(|e| MigrateError::io(&path, e))?;
    log::info!("wrote baseline migration {}", path.display());
    Ok(())
}

/// Take a timestamped backup of the database file and return its path
pub fn backup_db(db_path: &Path) -> MigrateResult<PathBuf> {
    if !db_path.is_file() {
        return Err(MigrateError::DatabaseNotFound {
            path: db_path.display().to_string(),
        });
    }
    backup::create_backup(db_path)
}

/// Report the tool version together with the database's stored version
pub async fn current_versions(db_path: &Path) -> MigrateResult<Versions> {
    if !db_path.is_file() {
        return Err(MigrateError::DatabaseNotFound {
            path: db_path.display().to_string(),
        });
    }
    let backend = SqliteBackend::open(db_path)?;
    let db_version = backend.read_version().await?;
    Ok(Versions {
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        db_version,
    })
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
