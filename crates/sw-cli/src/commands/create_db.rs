//! Create-db command implementation

use anyhow::Result;
use sw_core::create_db;

use crate::cli::GlobalArgs;
use crate::context::ResolvedPaths;

/// Execute the create-db command
pub(crate) async fn execute(global: &GlobalArgs) -> Result<()> {
    let paths = ResolvedPaths::resolve(global)?;
    let version = create_db(&paths.db).await?;
    println!(
        "Managed database {} is at version {}",
        paths.db.display(),
        version
    );
    Ok(())
}
