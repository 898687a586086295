//! sw-core - Core migration engine for Stepwise
//!
//! This crate provides version bookkeeping, migration script discovery,
//! database backup/restore, per-script execution, and the migration runner
//! that ties them together. The CLI in sw-cli is a thin layer over the
//! functions re-exported here.

pub mod backup;
pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod runner;
pub mod script;

pub use config::Config;
pub use error::{MigrateError, MigrateResult};
pub use runner::{
    backup_db, create_db, current_versions, enroll_db, run_migrations,
    run_migrations_with_backend, AutoApprove, ConfirmGate, RunOptions, RunOutcome, Versions,
};
pub use script::{Script, ScriptKind};
