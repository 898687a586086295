//! Backup command implementation

use anyhow::Result;
use sw_core::backup_db;

use crate::cli::GlobalArgs;
use crate::context::ResolvedPaths;

/// Execute the backup command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let paths = ResolvedPaths::resolve(global)?;
    let backup_path = backup_db(&paths.db)?;
    println!("Backup written to {}", backup_path.display());
    Ok(())
}
