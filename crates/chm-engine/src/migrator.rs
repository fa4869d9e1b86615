//! Migration run orchestration

use crate::error::EngineResult;
use crate::executor::{ExecutionMode, Executor};
use crate::ledger::LedgerStore;
use crate::schema::SchemaInitializer;
use chm_core::{pending, LedgerEntry, Migration};
use chm_db::Database;

/// Options for one migration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateOptions {
    /// Split scripts on `;` into separate statements
    pub multi_statement: bool,

    /// Preview only
    pub dry_run: bool,

    /// Record without executing
    pub fake: bool,

    /// Cluster for replicated DDL
    pub cluster_name: Option<String>,

    /// Create the target database before migrating
    pub create_db_if_not_exists: bool,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            multi_statement: true,
            dry_run: false,
            fake: false,
            cluster_name: None,
            create_db_if_not_exists: true,
        }
    }
}

impl MigrateOptions {
    /// Execution mode implied by the flags
    pub fn mode(&self) -> ExecutionMode {
        ExecutionMode::from_flags(self.dry_run, self.fake)
    }
}

/// Runs migrations against one database
pub struct Migrator<'a> {
    db: &'a dyn Database,
    ledger: &'a dyn LedgerStore,
}

impl<'a> Migrator<'a> {
    /// Create a migrator; `ledger` must store its rows in `db`'s database
    pub fn new(db: &'a dyn Database, ledger: &'a dyn LedgerStore) -> Self {
        Self { db, ledger }
    }

    /// Ensure the ledger table exists
    pub async fn init_schema(&self, cluster: Option<&str>) -> EngineResult<()> {
        SchemaInitializer::new(self.db).ensure_ledger(cluster).await
    }

    /// Consolidated ledger contents
    pub async fn applied(&self) -> EngineResult<Vec<LedgerEntry>> {
        self.ledger.query_applied().await
    }

    /// Bring the database up to date with `incoming`.
    ///
    /// Returns the migrations processed in version order. Integrity errors
    /// surface before any migration statement runs. Fake mode skips
    /// reconciliation and re-marks every incoming migration.
    pub async fn migrate(
        &self,
        incoming: &[Migration],
        options: &MigrateOptions,
    ) -> EngineResult<Vec<Migration>> {
        self.init_schema(options.cluster_name.as_deref()).await?;

        let mode = options.mode();
        let candidates = match mode {
            ExecutionMode::Fake => {
                let mut all = incoming.to_vec();
                all.sort_by_key(|m| m.version);
                all
            }
            ExecutionMode::Normal | ExecutionMode::DryRun => {
                let applied = self.applied().await?;
                log::info!(
                    "Total migrations: {}, already applied: {}",
                    incoming.len(),
                    applied.len()
                );
                pending(incoming, &applied)?
            }
        };

        if candidates.is_empty() {
            log::info!("No pending migrations");
            return Ok(candidates);
        }
        log::info!("Migrations to apply: {}", candidates.len());

        Executor::new(self.db, self.ledger, options.multi_statement, mode)
            .apply(&candidates)
            .await
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
