//! Ledger of applied migrations
//!
//! The ledger table lives on a merge-on-read engine, so a read may return
//! duplicate or unmerged rows for one version. Reads are consolidated in
//! memory instead of relying on `OPTIMIZE ... FINAL`.

use crate::error::{EngineError, EngineResult};
use crate::schema::LEDGER_TABLE;
use async_trait::async_trait;
use chm_core::sql_utils::quote_string;
use chm_core::LedgerEntry;
use chm_db::{Database, Row};
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::BTreeMap;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read and write access to the ledger
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Applied entries, one per version, ascending by version
    async fn query_applied(&self) -> EngineResult<Vec<LedgerEntry>>;

    /// Append one ledger row
    async fn insert(&self, entry: &LedgerEntry) -> EngineResult<()>;

    /// Replace whatever is recorded for `version` with `entry`
    async fn overwrite(&self, version: u32, entry: &LedgerEntry) -> EngineResult<()>;
}

/// Collapse rows to one entry per version, ascending by version.
///
/// For duplicated versions the entry with the newest `applied_at` wins; on a
/// tie the later row wins. Rows without a timestamp sort oldest.
pub fn consolidate(rows: impl IntoIterator<Item = LedgerEntry>) -> Vec<LedgerEntry> {
    let mut by_version: BTreeMap<u32, LedgerEntry> = BTreeMap::new();
    for row in rows {
        match by_version.get(&row.version) {
            Some(existing) if existing.applied_at > row.applied_at => {}
            _ => {
                by_version.insert(row.version, row);
            }
        }
    }
    by_version.into_values().collect()
}

/// Ledger stored in the `schema_versions` table
pub struct ClickHouseLedger<'a> {
    db: &'a dyn Database,
}

impl<'a> ClickHouseLedger<'a> {
    /// Create a ledger reading and writing through `db`
    pub fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }
}

fn select_sql() -> String {
    format!(
        "SELECT version, md5, script, toString(created_at) AS created_at \
         FROM {LEDGER_TABLE} ORDER BY version, created_at"
    )
}

fn select_version_sql(version: u32) -> String {
    format!(
        "SELECT version, md5, script, toString(created_at) AS created_at \
         FROM {LEDGER_TABLE} WHERE version = {version} ORDER BY created_at"
    )
}

/// Mutations are asynchronous by default; wait for every replica
fn delete_stale_sql(version: u32, checksum: &str) -> String {
    format!(
        "ALTER TABLE {LEDGER_TABLE} DELETE WHERE version = {version} AND md5 != {} \
         SETTINGS mutations_sync = 2",
        quote_string(checksum)
    )
}

fn entry_to_row(entry: &LedgerEntry) -> Row {
    let mut row = Row::new();
    row.insert("version".to_string(), Value::from(entry.version));
    row.insert("md5".to_string(), Value::from(entry.checksum.clone()));
    row.insert("script".to_string(), Value::from(entry.script.clone()));
    row
}

fn row_to_entry(row: &Row) -> EngineResult<LedgerEntry> {
    let malformed = |what: &str| EngineError::MalformedLedgerRow(format!("{what}: {row:?}"));

    let version = match row.get("version") {
        Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(s)) => s.parse::<u32>().ok(),
        _ => None,
    }
    .ok_or_else(|| malformed("invalid version"))?;

    let text = |column: &str| match row.get(column) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(malformed(&format!("missing {column}"))),
    };

    let applied_at = match row.get("created_at") {
        Some(Value::String(s)) => Some(
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .map_err(|_| malformed("invalid created_at"))?,
        ),
        _ => None,
    };

    Ok(LedgerEntry {
        version,
        checksum: text("md5")?,
        script: text("script")?,
        applied_at,
    })
}

#[async_trait]
impl<'a> LedgerStore for ClickHouseLedger<'a> {
    async fn query_applied(&self) -> EngineResult<Vec<LedgerEntry>> {
        let rows = self.db.query_rows(&select_sql()).await?;
        let entries = rows.iter().map(row_to_entry).collect::<EngineResult<Vec<_>>>()?;
        let raw = entries.len();
        let consolidated = consolidate(entries);
        if consolidated.len() != raw {
            log::debug!(
                "Consolidated {raw} ledger row(s) into {} entries",
                consolidated.len()
            );
        }
        Ok(consolidated)
    }

    async fn insert(&self, entry: &LedgerEntry) -> EngineResult<()> {
        self.db
            .insert_rows(LEDGER_TABLE, &[entry_to_row(entry)])
            .await?;
        Ok(())
    }

    /// No-op when every row for `version` already carries `entry`'s checksum.
    /// Otherwise the new row is inserted before the stale rows are deleted, so
    /// a reader always finds a row for `version`. The delete waits for every
    /// replica, so once this returns only the new row is left. A reader racing
    /// the delete may still pick the stale row when both share a `created_at`
    /// second; runs against one schema are assumed not to overlap.
    async fn overwrite(&self, version: u32, entry: &LedgerEntry) -> EngineResult<()> {
        let existing = self
            .db
            .query_rows(&select_version_sql(version))
            .await?
            .iter()
            .map(row_to_entry)
            .collect::<EngineResult<Vec<_>>>()?;
        if !existing.is_empty() && existing.iter().all(|row| row.checksum == entry.checksum) {
            log::debug!("Ledger already records version {version} with this checksum");
            return Ok(());
        }

        let row = entry_to_row(&LedgerEntry {
            version,
            ..entry.clone()
        });
        self.db.insert_rows(LEDGER_TABLE, &[row]).await?;
        if !existing.is_empty() {
            self.db
                .execute(&delete_stale_sql(version, &entry.checksum))
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
