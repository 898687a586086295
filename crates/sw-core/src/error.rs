//! Error types for sw-core

use sw_db::DbError;
use thiserror::Error;

/// Core error type for the Stepwise migration engine
#[derive(Error, Debug)]
pub enum MigrateError {
    /// M001: Target database file missing
    #[error("[M001] Database file not found: {path}")]
    DatabaseNotFound { path: String },

    /// M002: Database exists but carries no version record
    #[error("[M002] Database is not managed (no version record): {path}. Enroll it with `sw enroll` or create a fresh one with `sw create-db`.")]
    UnmanagedDatabase { path: String },

    /// M003: Migration filename violates the naming rule
    #[error("[M003] Invalid migration filename '{file}': {reason}")]
    NamingViolation { file: String, reason: String },

    /// M004: Two migrations share an ordinal
    #[error("[M004] Duplicate migration ordinal {ordinal}: {first} and {second}")]
    DuplicateOrdinal {
        ordinal: u32,
        first: String,
        second: String,
    },

    /// M005: Pre-script backup could not be taken
    #[error("[M005] Backup of {path} failed: {source}")]
    BackupFailed {
        path: String,
        source: std::io::Error,
    },

    /// M006: Declarative script aborted, batch rolled back
    #[error("[M006] Migration {ordinal} ({script}) failed: {message}")]
    SqlScriptFailed {
        ordinal: u32,
        script: String,
        message: String,
    },

    /// M007: Process script exited nonzero or failed to launch
    #[error("[M007] Migration {ordinal} ({script}) failed: {detail}")]
    ScriptProcessFailed {
        ordinal: u32,
        script: String,
        detail: String,
    },

    /// M008: Restore after a failed script did not complete
    #[error("[M008] Restore of {path} failed, database state is unknown: {message}")]
    RestoreFailed { path: String, message: String },

    /// M009: Enrollment of an already-managed database
    #[error("[M009] Database is already managed (version {version}): {path}")]
    AlreadyManaged { path: String, version: u32 },

    /// M010: IO error with file path context
    #[error("[M010] Failed to access '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// M011: Failed to parse configuration file
    #[error("[M011] Failed to parse config {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Backend-level error outside a script batch
    #[error("Database error: {0}")]
    Db(#[from] DbError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    /// IO error carrying the offending path
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        MigrateError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
