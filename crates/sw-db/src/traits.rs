//! Backend trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Storage backend abstraction for Stepwise
///
/// The migration runner drives version bookkeeping and declarative script
/// execution exclusively through this trait, so the same orchestration can
/// target stores other than the built-in SQLite backend. Implementations
/// must be Send + Sync; a synchronous backend simply returns ready results.
/// The runner awaits every hook before issuing the next, so no two hooks
/// are ever in flight at once.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Create the version storage with a version-0 record if it is absent.
    /// Idempotent.
    async fn ensure_version_storage(&self) -> DbResult<()>;

    /// Read the current version. `None` means the store carries no version
    /// record at all; the built-in backend never creates one here.
    async fn read_version(&self) -> DbResult<Option<u32>>;

    /// Persist `version` as the new current version. Must be an upsert:
    /// a concurrent reader may never observe more than one version record.
    async fn write_version(&self, version: u32) -> DbResult<()>;

    /// Execute a batch of SQL statements inside a single transaction.
    /// Any statement error rolls the whole batch back with zero partial
    /// effect visible afterwards.
    async fn execute_script(&self, sql: &str) -> DbResult<()>;

    /// Release any resources held by the backend.
    async fn close(&self) -> DbResult<()> {
        Ok(())
    }

    /// Backend type identifier for logging
    fn backend_type(&self) -> &'static str;
}
