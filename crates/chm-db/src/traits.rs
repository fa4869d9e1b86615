//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// A result row, keyed by column name
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Database abstraction trait for chm
///
/// Callers issue one statement at a time and await it before the next;
/// implementations need no internal ordering guarantees beyond that.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a statement, discarding any output
    async fn execute(&self, sql: &str) -> DbResult<()>;

    /// Execute a row-returning query
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Insert rows into `table`; each row is a column-name-keyed object
    async fn insert_rows(&self, table: &str, rows: &[Row]) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
