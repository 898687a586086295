//! Enroll command implementation

use anyhow::Result;
use sw_core::enroll_db;

use crate::cli::{EnrollArgs, GlobalArgs};
use crate::context::ResolvedPaths;

/// Execute the enroll command
pub(crate) async fn execute(args: &EnrollArgs, global: &GlobalArgs) -> Result<()> {
    let paths = ResolvedPaths::resolve(global)?;
    let migrations = (!args.no_baseline).then_some(paths.migrations.as_path());
    let version = enroll_db(&paths.db, migrations).await?;
    println!(
        "Enrolled {} at version {}",
        paths.db.display(),
        version
    );
    Ok(())
}
