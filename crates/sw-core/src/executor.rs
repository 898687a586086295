//! Per-script execution strategies

use crate::error::{MigrateError, MigrateResult};
use crate::script::{Script, ScriptKind};
use std::path::Path;
use sw_db::Backend;
use tokio::process::Command;

/// Execute one migration script against the database.
///
/// Declarative scripts go through the backend's transactional batch hook,
/// so adapter-backed runs target their own engine. Process scripts always
/// receive the database's filesystem path as their sole argument and are
/// unaffected by adapter presence; whatever they do outside the database
/// file is invisible to the engine and cannot be rolled back.
pub async fn execute_script(
    backend: &dyn Backend,
    db_path: &Path,
    script: &Script,
) -> MigrateResult<()> {
    match script.kind {
        ScriptKind::Sql => execute_sql(backend, script).await,
        ScriptKind::Python => execute_process("python3", db_path, script).await,
        ScriptKind::Shell => execute_process("sh", db_path, script).await,
    }
}

async fn execute_sql(backend: &dyn Backend, script: &Script) -> MigrateResult<()> {
    let sql =
        std::fs::read_to_string(&script.path).map_err(|e| MigrateError::io(&script.path, e))?;
    backend
        .execute_script(&sql)
        .await
        .map_err(|e| MigrateError::SqlScriptFailed {
            ordinal: script.ordinal,
            script: script.file_name(),
            message: e.to_string(),
        })
}

async fn execute_process(interpreter: &str, db_path: &Path, script: &Script) -> MigrateResult<()> {
    let output = Command::new(interpreter)
        .arg(&script.path)
        .arg(db_path)
        .output()
        .await
        .map_err(|e| MigrateError::ScriptProcessFailed {
            ordinal: script.ordinal,
            script: script.file_name(),
            detail: format!("failed to launch {}: {}", interpreter, e),
        })?;

    if output.status.success() {
        if !output.stdout.is_empty() {
            log::debug!(
                "{} stdout: {}",
                script.file_name(),
                String::from_utf8_lossy(&output.stdout).trim_end()
            );
        }
        return Ok(());
    }

    // Exit code 0 is the only success signal, whatever the process printed
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = match output.status.code() {
        Some(code) => format!("exit status {}: {}", code, stderr.trim_end()),
        None => format!("terminated by signal: {}", stderr.trim_end()),
    };
    Err(MigrateError::ScriptProcessFailed {
        ordinal: script.ordinal,
        script: script.file_name(),
        detail,
    })
}
