//! Status command implementation

use anyhow::Result;
use serde::Serialize;
use sw_core::{catalog, current_versions};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::context::ResolvedPaths;

/// JSON shape of the status report
#[derive(Debug, Serialize)]
struct StatusReport {
    tool_version: String,
    db_version: Option<u32>,
    pending: Vec<PendingScript>,
}

#[derive(Debug, Serialize)]
struct PendingScript {
    ordinal: u32,
    file: String,
}

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let paths = ResolvedPaths::resolve(global)?;

    let versions = current_versions(&paths.db).await?;
    let scripts = catalog::discover(&paths.migrations)?;
    let pending = catalog::pending(&scripts, versions.db_version.unwrap_or(0));

    match args.output {
        StatusOutput::Json => {
            let report = StatusReport {
                tool_version: versions.tool_version,
                db_version: versions.db_version,
                pending: pending
                    .iter()
                    .map(|s| PendingScript {
                        ordinal: s.ordinal,
                        file: s.file_name(),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatusOutput::Table => {
            println!("Stepwise {}", versions.tool_version);
            match versions.db_version {
                Some(version) => println!("Database version: {}", version),
                None => println!("Database version: unmanaged (run `sw enroll`)"),
            }
            if pending.is_empty() {
                println!("No pending migrations");
            } else {
                println!("Pending migrations:");
                for script in &pending {
                    println!("  {:04}  {}", script.ordinal, script.file_name());
                }
            }
        }
    }
    Ok(())
}
