//! Statement execution for pending migrations

use crate::error::{EngineError, EngineResult};
use crate::ledger::LedgerStore;
use chm_core::{script_to_statements, Migration};
use chm_db::Database;

/// How migrations are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Execute statements and record each migration
    #[default]
    Normal,
    /// Log statements only; nothing is executed or recorded
    DryRun,
    /// Record migrations without executing their statements
    Fake,
}

impl ExecutionMode {
    /// Resolve mode flags; dry run wins so that a preview never writes
    pub fn from_flags(dry_run: bool, fake: bool) -> Self {
        match (dry_run, fake) {
            (true, _) => ExecutionMode::DryRun,
            (false, true) => ExecutionMode::Fake,
            (false, false) => ExecutionMode::Normal,
        }
    }
}

/// Applies migrations one at a time, in version order
pub struct Executor<'a> {
    db: &'a dyn Database,
    ledger: &'a dyn LedgerStore,
    multi_statement: bool,
    mode: ExecutionMode,
}

impl<'a> Executor<'a> {
    /// Create an executor
    pub fn new(
        db: &'a dyn Database,
        ledger: &'a dyn LedgerStore,
        multi_statement: bool,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            db,
            ledger,
            multi_statement,
            mode,
        }
    }

    /// Apply `migrations` ascending by version.
    ///
    /// Stops at the first failing statement. Migrations committed before the
    /// failure stay committed; the failing one gets no ledger entry.
    pub async fn apply(&self, migrations: &[Migration]) -> EngineResult<Vec<Migration>> {
        let mut ordered = migrations.to_vec();
        ordered.sort_by_key(|m| m.version);

        let mut applied = Vec::with_capacity(ordered.len());
        for migration in ordered {
            self.apply_one(&migration).await?;
            applied.push(migration);
        }
        Ok(applied)
    }

    async fn apply_one(&self, migration: &Migration) -> EngineResult<()> {
        let version = migration.version;
        match self.mode {
            ExecutionMode::Fake => {
                log::info!("Fake mode, marking migration {version} as applied");
                self.ledger
                    .overwrite(version, &migration.to_ledger_entry())
                    .await
            }
            ExecutionMode::DryRun => {
                for statement in script_to_statements(&migration.script, self.multi_statement) {
                    log::info!("Dry run mode, would have executed: {statement}");
                }
                Ok(())
            }
            ExecutionMode::Normal => {
                log::info!("Executing migration {version}");
                for statement in script_to_statements(&migration.script, self.multi_statement) {
                    self.db
                        .execute(&statement)
                        .await
                        .map_err(|source| EngineError::MigrationFailed { version, source })?;
                }
                self.ledger.insert(&migration.to_ledger_entry()).await?;
                log::info!("Migration {version} applied");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
