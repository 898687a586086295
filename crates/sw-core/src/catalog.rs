//! Migration script discovery and pending-set selection

use crate::error::{MigrateError, MigrateResult};
use crate::script::Script;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Scan one level of the migrations directory and return every migration
/// script, ordered by ordinal ascending.
///
/// Subdirectories are not descended into. A missing directory yields an
/// empty catalog. Two entries sharing an ordinal fail discovery before any
/// script is considered for execution.
pub fn discover(dir: &Path) -> MigrateResult<Vec<Script>> {
    let mut by_ordinal: BTreeMap<u32, Script> = BTreeMap::new();

    if !dir.is_dir() {
        log::warn!("migrations directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    for entry in fs::read_dir(dir).map_err(|e| MigrateError::io(dir, e))? {
        let entry = entry.map_err(|e| MigrateError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        match Script::parse(&path)? {
            None => log::debug!("ignoring non-migration file {}", path.display()),
            Some(script) => {
                if let Some(existing) = by_ordinal.get(&script.ordinal) {
                    return Err(MigrateError::DuplicateOrdinal {
                        ordinal: script.ordinal,
                        first: existing.file_name(),
                        second: script.file_name(),
                    });
                }
                by_ordinal.insert(script.ordinal, script);
            }
        }
    }

    Ok(by_ordinal.into_values().collect())
}

/// Filter a discovered catalog down to the scripts with ordinals strictly
/// greater than `current_version`, preserving ascending order.
pub fn pending(scripts: &[Script], current_version: u32) -> Vec<Script> {
    scripts
        .iter()
        .filter(|s| s.ordinal > current_version)
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
