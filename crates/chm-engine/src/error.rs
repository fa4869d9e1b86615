//! Error types for chm-engine

use chm_core::CoreError;
use chm_db::DbError;
use thiserror::Error;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration or integrity error from the core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database error outside of a migration's own statements
    #[error(transparent)]
    Db(#[from] DbError),

    /// A statement of a migration failed; the batch stopped here (E001)
    #[error("[E001] Migration {version} failed: {source}")]
    MigrationFailed {
        version: u32,
        #[source]
        source: DbError,
    },

    /// Ledger row could not be decoded (L001)
    #[error("[L001] Malformed ledger row: {0}")]
    MalformedLedgerRow(String),
}

impl EngineError {
    /// True for reconciliation invariant violations
    pub fn is_integrity(&self) -> bool {
        matches!(self, EngineError::Core(e) if e.is_integrity())
    }

    /// Version of the migration that failed to execute, if any
    pub fn failed_version(&self) -> Option<u32> {
        match self {
            EngineError::MigrationFailed { version, .. } => Some(*version),
            _ => None,
        }
    }
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
