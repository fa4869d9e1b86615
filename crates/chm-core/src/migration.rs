//! Migration and ledger entry types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::checksum::compute_checksum;

/// A versioned migration script known to this run
///
/// Immutable once loaded; the checksum always describes `script`'s bytes
/// as they were read from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Migration {
    /// Numeric version, unique within a source set
    pub version: u32,

    /// Hex MD5 of the script bytes
    pub checksum: String,

    /// Full script text
    pub script: String,

    /// File the migration was loaded from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Migration {
    /// Build a migration from script text, computing its checksum
    pub fn new(version: u32, script: impl Into<String>) -> Self {
        let script = script.into();
        Self {
            version,
            checksum: compute_checksum(script.as_bytes()),
            script,
            file_name: None,
        }
    }

    /// Build a migration with an explicit checksum
    pub fn with_checksum(
        version: u32,
        checksum: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            version,
            checksum: checksum.into(),
            script: script.into(),
            file_name: None,
        }
    }

    /// Attach the originating file name
    pub fn from_file(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Ledger entry recording this migration; the server assigns `applied_at`
    pub fn to_ledger_entry(&self) -> LedgerEntry {
        LedgerEntry {
            version: self.version,
            checksum: self.checksum.clone(),
            script: self.script.clone(),
            applied_at: None,
        }
    }
}

/// One row of the `schema_versions` ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Applied migration version
    pub version: u32,

    /// Checksum recorded at application time
    pub checksum: String,

    /// Script recorded at application time
    pub script: String,

    /// Server-assigned application timestamp; `None` until written
    #[serde(default)]
    pub applied_at: Option<NaiveDateTime>,
}
