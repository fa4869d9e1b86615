//! chm-engine - Migration engine for chm
//!
//! Ties the core reconciliation to a database: bootstraps the ledger table,
//! reads and writes ledger entries, and executes pending migrations with
//! dry-run and fake modes.

pub mod cluster;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod migrator;
pub mod schema;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use cluster::{migrate_database, ClickHouseCluster};
pub use error::{EngineError, EngineResult};
pub use executor::{ExecutionMode, Executor};
pub use ledger::{consolidate, ClickHouseLedger, LedgerStore};
pub use migrator::{MigrateOptions, Migrator};
pub use schema::{SchemaInitializer, LEDGER_TABLE};
