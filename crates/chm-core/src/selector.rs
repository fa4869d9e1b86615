//! Explicit migration subset selection
//!
//! An entry selects a migration by exact file name (`001_init.sql`), file stem
//! (`001_init`), version token as written (`001`), or numeric version (`1`).

use crate::error::{CoreError, CoreResult};

/// Explicit list of migrations to consider; empty selects everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSelector {
    entries: Vec<String>,
}

/// Identity of a candidate migration file, as seen by the selector
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub file_name: &'a str,
    pub stem: &'a str,
    pub version_token: &'a str,
    pub version: u32,
}

impl MigrationSelector {
    /// Selector that matches every migration
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a selector from raw entries.
    ///
    /// Entries are trimmed; a blank entry is rejected rather than ignored.
    pub fn new<I, S>(entries: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for entry in entries {
            let raw = entry.as_ref();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(CoreError::InvalidSelector {
                    entry: raw.to_string(),
                    reason: "entry is empty".to_string(),
                });
            }
            if trimmed.contains('/') || trimmed.contains('\\') {
                return Err(CoreError::InvalidSelector {
                    entry: raw.to_string(),
                    reason: "entries name files inside the migrations directory, not paths"
                        .to_string(),
                });
            }
            parsed.push(trimmed.to_string());
        }
        Ok(Self { entries: parsed })
    }

    /// True when no explicit entries were given
    pub fn is_all(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw entries after trimming
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Check whether a candidate migration is selected
    pub fn matches(&self, candidate: &Candidate<'_>) -> bool {
        if self.is_all() {
            return true;
        }
        self.entries.iter().any(|entry| {
            entry == candidate.file_name
                || entry == candidate.stem
                || entry == candidate.version_token
                || entry.parse::<u32>().ok() == Some(candidate.version)
        })
    }
}

#[cfg(test)]
#[path = "selector_test.rs"]
mod tests;
