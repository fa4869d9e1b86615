//! Ledger table and target database DDL
//!
//! All statements are idempotent (`IF NOT EXISTS`) and are issued on every
//! run before the ledger is read.

use crate::error::EngineResult;
use chm_core::sql_utils::quote_ident;
use chm_db::Database;

/// Name of the ledger table
pub const LEDGER_TABLE: &str = "schema_versions";

const LEDGER_COLUMNS: &str =
    "version UInt32, md5 String, script String, created_at DateTime DEFAULT now()";

/// Keeper path and replica macros for the replicated ledger
const REPLICATED_ENGINE: &str =
    "ReplicatedMergeTree('/clickhouse/tables/{database}/{table}', '{replica}')";

/// DDL for the ledger table, single-node or replicated across `cluster`
pub fn ledger_ddl(cluster: Option<&str>) -> String {
    match cluster {
        None => format!(
            "CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} ({LEDGER_COLUMNS}) \
             ENGINE = MergeTree ORDER BY tuple(created_at)"
        ),
        Some(cluster) => format!(
            "CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} ON CLUSTER {} ({LEDGER_COLUMNS}) \
             ENGINE = {REPLICATED_ENGINE} ORDER BY tuple(created_at)",
            quote_ident(cluster)
        ),
    }
}

/// DDL creating the target database, optionally on every node of `cluster`
pub fn database_ddl(database: &str, cluster: Option<&str>) -> String {
    match cluster {
        None => format!("CREATE DATABASE IF NOT EXISTS {}", quote_ident(database)),
        Some(cluster) => format!(
            "CREATE DATABASE IF NOT EXISTS {} ON CLUSTER {}",
            quote_ident(database),
            quote_ident(cluster)
        ),
    }
}

/// Issues the bootstrap DDL
pub struct SchemaInitializer<'a> {
    db: &'a dyn Database,
}

impl<'a> SchemaInitializer<'a> {
    /// Create an initializer issuing DDL through `db`
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Make sure the ledger table exists
    pub async fn ensure_ledger(&self, cluster: Option<&str>) -> EngineResult<()> {
        let ddl = ledger_ddl(cluster);
        log::debug!("Ensuring ledger table on {}: {ddl}", self.db.db_type());
        self.db.execute(&ddl).await?;
        Ok(())
    }

    /// Make sure `database` exists; `db` must not default to that database
    pub async fn ensure_database(&self, database: &str, cluster: Option<&str>) -> EngineResult<()> {
        let ddl = database_ddl(database, cluster);
        log::debug!("Ensuring database on {}: {ddl}", self.db.db_type());
        self.db.execute(&ddl).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
