//! Error types for chm-core

use thiserror::Error;

/// Core error type for chm
///
/// `C*` codes are configuration errors raised while building the incoming
/// migration set; `I*` codes are ledger integrity violations found during
/// reconciliation.
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Migration file name does not start with a valid version
    #[error("[C001] Malformed version '{token}' in migration file {file}")]
    MalformedVersion { file: String, token: String },

    /// C002: Two migration files share a version
    #[error("[C002] Duplicate migration version {version}: {first} and {second}")]
    DuplicateVersion {
        version: u32,
        first: String,
        second: String,
    },

    /// C003: Explicit migration selector entry is unusable
    #[error("[C003] Invalid migration selector '{entry}': {reason}")]
    InvalidSelector { entry: String, reason: String },

    /// C004: IO error with file path context
    #[error("[C004] IO error at {path}: {source}")]
    IoWithPath {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// I001: Fewer incoming migrations than applied ones
    #[error("[I001] Migrations missing: {applied} applied but only {incoming} found")]
    MigrationsMissing { incoming: usize, applied: usize },

    /// I002: Applied script was edited after application
    #[error("[I002] Checksum mismatch at version {version}: ledger has {applied}, file has {incoming}")]
    ChecksumMismatch {
        version: u32,
        incoming: String,
        applied: String,
    },

    /// I003: Ledger references a migration that no longer exists
    #[error("[I003] Unknown applied migration at version {version}")]
    UnknownAppliedMigration { version: u32 },
}

impl CoreError {
    /// True for reconciliation invariant violations
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            CoreError::MigrationsMissing { .. }
                | CoreError::ChecksumMismatch { .. }
                | CoreError::UnknownAppliedMigration { .. }
        )
    }

    /// True for errors raised while loading or selecting migrations
    pub fn is_configuration(&self) -> bool {
        !self.is_integrity()
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
