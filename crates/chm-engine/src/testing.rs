//! In-memory test doubles for the database and the ledger

use crate::error::EngineResult;
use crate::ledger::{consolidate, LedgerStore};
use async_trait::async_trait;
use chm_core::LedgerEntry;
use chm_db::{Database, DbError, DbResult, Row};
use chrono::{DateTime, NaiveDateTime};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Database that records every statement instead of running it
#[derive(Default)]
pub struct RecordingDatabase {
    executed: Mutex<Vec<String>>,
    queries: Mutex<Vec<String>>,
    inserted: Mutex<Vec<(String, Row)>>,
    query_result: Mutex<Vec<Row>>,
    fail_on: Option<String>,
}

impl RecordingDatabase {
    /// Empty recorder; every query returns no rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any executed statement containing `needle`
    pub fn fail_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// Rows returned by every `query_rows` call
    pub fn with_query_result(self, rows: Vec<Row>) -> Self {
        *self.query_result.lock().unwrap() = rows;
        self
    }

    /// Statements passed to `execute`, including the failing one
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    /// Queries passed to `query_rows`
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// `(table, row)` pairs passed to `insert_rows`
    pub fn inserted(&self) -> Vec<(String, Row)> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Database for RecordingDatabase {
    async fn execute(&self, sql: &str) -> DbResult<()> {
        self.executed.lock().unwrap().push(sql.to_string());
        match &self.fail_on {
            Some(needle) if sql.contains(needle.as_str()) => Err(DbError::ExecutionError(
                format!("simulated failure: {sql}"),
            )),
            _ => Ok(()),
        }
    }

    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.queries.lock().unwrap().push(sql.to_string());
        Ok(self.query_result.lock().unwrap().clone())
    }

    async fn insert_rows(&self, table: &str, rows: &[Row]) -> DbResult<()> {
        let mut inserted = self.inserted.lock().unwrap();
        for row in rows {
            inserted.push((table.to_string(), row.clone()));
        }
        Ok(())
    }

    fn db_type(&self) -> &'static str {
        "recording"
    }
}

/// Append-only in-memory ledger with a monotonically advancing clock
pub struct MemoryLedger {
    rows: Mutex<Vec<LedgerEntry>>,
    clock: AtomicI64,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            clock: AtomicI64::new(1_700_000_000),
        }
    }
}

impl MemoryLedger {
    /// Empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-seeded with raw rows, duplicates included
    pub fn with_rows(rows: Vec<LedgerEntry>) -> Self {
        let ledger = Self::default();
        for row in rows {
            ledger.push(row);
        }
        ledger
    }

    /// Stored rows before consolidation
    pub fn raw_rows(&self) -> Vec<LedgerEntry> {
        self.rows.lock().unwrap().clone()
    }

    fn tick(&self) -> Option<NaiveDateTime> {
        let secs = self.clock.fetch_add(1, Ordering::SeqCst);
        DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc())
    }

    fn push(&self, mut entry: LedgerEntry) {
        if entry.applied_at.is_none() {
            entry.applied_at = self.tick();
        }
        self.rows.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn query_applied(&self) -> EngineResult<Vec<LedgerEntry>> {
        Ok(consolidate(self.raw_rows()))
    }

    async fn insert(&self, entry: &LedgerEntry) -> EngineResult<()> {
        self.push(LedgerEntry {
            applied_at: None,
            ..entry.clone()
        });
        Ok(())
    }

    async fn overwrite(&self, version: u32, entry: &LedgerEntry) -> EngineResult<()> {
        let existing: Vec<LedgerEntry> = self
            .raw_rows()
            .into_iter()
            .filter(|row| row.version == version)
            .collect();
        if !existing.is_empty() && existing.iter().all(|row| row.checksum == entry.checksum) {
            return Ok(());
        }

        self.push(LedgerEntry {
            version,
            applied_at: None,
            ..entry.clone()
        });
        self.rows
            .lock()
            .unwrap()
            .retain(|row| row.version != version || row.checksum == entry.checksum);
        Ok(())
    }
}

/// Logger that keeps every formatted record in memory
struct CapturingLogger {
    records: Mutex<Vec<String>>,
}

impl log::Log for CapturingLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        self.records
            .lock()
            .unwrap()
            .push(format!("{}:{}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

static CAPTURE: std::sync::OnceLock<&'static CapturingLogger> = std::sync::OnceLock::new();

/// Install the capturing logger for this process (idempotent).
///
/// Tests share one process-wide logger, so assertions should look for
/// messages unique to the test.
pub fn capture_logs() {
    CAPTURE.get_or_init(|| {
        let logger: &'static CapturingLogger = Box::leak(Box::new(CapturingLogger {
            records: Mutex::new(Vec::new()),
        }));
        if log::set_logger(logger).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
        logger
    });
}

/// Every record captured so far, formatted as `LEVEL:message`
pub fn captured_logs() -> Vec<String> {
    CAPTURE
        .get()
        .map(|logger| logger.records.lock().unwrap().clone())
        .unwrap_or_default()
}
