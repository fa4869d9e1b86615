//! Shared helpers for commands: logging and settings resolution

use anyhow::{Context, Result};
use chm_core::MigrationSelector;
use chm_db::DbSettings;
use chm_engine::MigrateOptions;
use log::LevelFilter;
use std::io::Write;

use crate::cli::{GlobalArgs, MigrateArgs};

/// Initialise `env_logger` at `level`; `RUST_LOG` still takes precedence
pub fn init_logging(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}:{}", record.level(), record.args()))
        .try_init();
}

/// Connection settings from the global options.
///
/// `--db-url` replaces host, port and credentials; `--db-name` still
/// overrides a database named in the URL.
pub fn db_settings(global: &GlobalArgs) -> Result<DbSettings> {
    let mut settings = match &global.db_url {
        Some(url) => DbSettings::from_url(url, global.secure())
            .context("Failed to parse database URL")?,
        None => DbSettings {
            host: global.db_host.clone(),
            port: global.db_port,
            user: global.db_user.clone(),
            password: global.db_password.clone(),
            secure: global.secure(),
            ..DbSettings::default()
        },
    };
    if let Some(name) = &global.db_name {
        settings.database = Some(name.clone());
    }
    Ok(settings)
}

/// Explicit migration selector from `--migrations`
pub fn selector(args: &MigrateArgs) -> Result<MigrationSelector> {
    MigrationSelector::new(&args.migrations).context("Invalid --migrations selection")
}

/// Run options from the migrate flags
pub fn migrate_options(args: &MigrateArgs) -> MigrateOptions {
    MigrateOptions {
        multi_statement: args.multi_statement(),
        dry_run: args.dry_run(),
        fake: args.fake(),
        cluster_name: args.cluster_name.clone(),
        create_db_if_not_exists: args.create_db_if_not_exists(),
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
