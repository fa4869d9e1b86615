//! Applied command implementation

use anyhow::{Context, Result};
use chm_engine::ClickHouseCluster;

use crate::cli::{AppliedArgs, AppliedOutput, GlobalArgs};
use crate::commands::common::db_settings;

/// Execute the applied command
pub async fn execute(args: &AppliedArgs, global: &GlobalArgs) -> Result<()> {
    let cluster = ClickHouseCluster::new(db_settings(global)?);
    let entries = cluster
        .applied()
        .await
        .context("Failed to read the migration ledger")?;

    match args.output {
        AppliedOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        AppliedOutput::Table => {
            println!("{:>8}  {:<32}  APPLIED AT", "VERSION", "CHECKSUM");
            for entry in &entries {
                let applied_at = entry
                    .applied_at
                    .map(|ts| ts.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>8}  {:<32}  {}", entry.version, entry.checksum, applied_at);
            }
            println!();
            println!("{} migration(s) applied", entries.len());
        }
    }

    Ok(())
}
