//! ClickHouse server entry point
//!
//! Opens the HTTP connections a run needs: a server-level one for database
//! creation and one defaulting to the target database for everything else.

use crate::error::EngineResult;
use crate::ledger::{ClickHouseLedger, LedgerStore};
use crate::migrator::{MigrateOptions, Migrator};
use crate::schema::SchemaInitializer;
use chm_core::{LedgerEntry, Migration};
use chm_db::{ClickHouseBackend, Database, DbSettings};

/// A ClickHouse server (or cluster entry node) to migrate
pub struct ClickHouseCluster {
    settings: DbSettings,
}

impl ClickHouseCluster {
    /// Create from connection settings; `settings.database` is the target
    pub fn new(settings: DbSettings) -> Self {
        Self { settings }
    }

    /// Target database, if one was configured
    pub fn database(&self) -> Option<&str> {
        self.settings.database.as_deref()
    }

    /// Connection defaulting to `database` (`None` for the server default)
    pub fn connection(&self, database: Option<&str>) -> EngineResult<ClickHouseBackend> {
        Ok(ClickHouseBackend::new(self.settings.with_database(database))?)
    }

    /// Create the target database as requested, then migrate it
    pub async fn migrate(
        &self,
        incoming: &[Migration],
        options: &MigrateOptions,
    ) -> EngineResult<Vec<Migration>> {
        let server = self.connection(None)?;
        let conn = self.connection(self.database())?;
        let ledger = ClickHouseLedger::new(&conn);
        migrate_database(&server, &conn, &ledger, self.database(), incoming, options).await
    }

    /// Consolidated ledger of the target database
    pub async fn applied(&self) -> EngineResult<Vec<LedgerEntry>> {
        let conn = self.connection(self.database())?;
        let ledger = ClickHouseLedger::new(&conn);
        Migrator::new(&conn, &ledger).applied().await
    }
}

/// Create `database` through `server` when the options ask for it, then run
/// the migrations through `target`, whose default database is `database`.
pub async fn migrate_database(
    server: &dyn Database,
    target: &dyn Database,
    ledger: &dyn LedgerStore,
    database: Option<&str>,
    incoming: &[Migration],
    options: &MigrateOptions,
) -> EngineResult<Vec<Migration>> {
    if options.create_db_if_not_exists {
        if let Some(database) = database {
            SchemaInitializer::new(server)
                .ensure_database(database, options.cluster_name.as_deref())
                .await?;
        }
    }
    Migrator::new(target, ledger).migrate(incoming, options).await
}

#[cfg(test)]
#[path = "cluster_test.rs"]
mod tests;
