//! Migrate command implementation

use anyhow::{Context, Result};
use chm_core::MigrationSource;
use chm_engine::{ClickHouseCluster, ExecutionMode};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{db_settings, migrate_options, selector};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    // Everything that can be rejected locally is checked before connecting.
    let settings = db_settings(global)?;
    let selector = selector(args)?;
    let options = migrate_options(args);

    let source = MigrationSource::new(&args.migrations_dir);
    if !selector.is_all() {
        log::debug!("Explicit migrations: {}", selector.entries().join(", "));
    }
    let incoming = source.migrations(&selector).with_context(|| {
        format!("Failed to load migrations from {}", source.dir().display())
    })?;
    log::info!(
        "Loaded {} migration(s) from {}",
        incoming.len(),
        source.dir().display()
    );

    let cluster = ClickHouseCluster::new(settings);
    let processed = cluster
        .migrate(&incoming, &options)
        .await
        .context("Migration run failed")?;

    let verb = match options.mode() {
        ExecutionMode::Normal => "Applied",
        ExecutionMode::DryRun => "Would apply",
        ExecutionMode::Fake => "Marked as applied",
    };
    if processed.is_empty() {
        println!("Nothing to migrate");
    }
    for migration in &processed {
        match &migration.file_name {
            Some(file) => println!("{verb}: {} ({file})", migration.version),
            None => println!("{verb}: {}", migration.version),
        }
    }

    Ok(())
}
