//! Database file backup and restore

use crate::error::{MigrateError, MigrateResult};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed suffix carried by every backup file
const BACKUP_SUFFIX: &str = "backup";

/// Copy the database file byte-for-byte to a timestamped sibling path and
/// return that path.
///
/// A migration is never attempted without a viable backup, so any failure
/// here aborts the run before the script executes.
pub fn create_backup(db_path: &Path) -> MigrateResult<PathBuf> {
    let stamp = Local::now().format("%Y%m%d-%H%M%S%3f").to_string();
    let mut backup_path = PathBuf::from(format!(
        "{}.{}.{}",
        db_path.display(),
        stamp,
        BACKUP_SUFFIX
    ));

    // Consecutive scripts can back up within the same millisecond
    let mut n = 1;
    while backup_path.exists() {
        backup_path = PathBuf::from(format!(
            "{}.{}-{}.{}",
            db_path.display(),
            stamp,
            n,
            BACKUP_SUFFIX
        ));
        n += 1;
    }

    fs::copy(db_path, &backup_path).map_err(|e| MigrateError::BackupFailed {
        path: db_path.display().to_string(),
        source: e,
    })?;
    log::debug!(
        "backed up {} to {}",
        db_path.display(),
        backup_path.display()
    );
    Ok(backup_path)
}

/// Overwrite the database file with the backup's bytes.
///
/// Copies to a temporary sibling first and renames it over the target, so a
/// crash mid-restore leaves either the old file or the fully restored one,
/// never a torn write.
pub fn restore_backup(backup_path: &Path, db_path: &Path) -> MigrateResult<()> {
    let failed = |message: String| MigrateError::RestoreFailed {
        path: db_path.display().to_string(),
        message,
    };

    let tmp = PathBuf::from(format!("{}.restore-tmp", db_path.display()));
    fs::copy(backup_path, &tmp)
        .map_err(|e| failed(format!("copying {}: {}", backup_path.display(), e)))?;
    fs::rename(&tmp, db_path).map_err(|e| failed(format!("replacing target: {}", e)))?;

    log::debug!(
        "restored {} from {}",
        db_path.display(),
        backup_path.display()
    );
    Ok(())
}
