//! Reconciliation of incoming migrations against the applied ledger
//!
//! Computes which migrations still need to run and rejects any ledger state
//! that the incoming set cannot explain.

use crate::error::{CoreError, CoreResult};
use crate::migration::{LedgerEntry, Migration};
use std::collections::BTreeMap;

/// Both sides of the outer join for one version
#[derive(Debug, Default)]
struct Sides<'a> {
    incoming: Option<&'a Migration>,
    applied: Option<&'a LedgerEntry>,
}

/// Return the migrations from `incoming` that are not yet in `applied`,
/// ascending by version.
///
/// Fails when the ledger contains versions that are no longer present in
/// `incoming`, or when an applied script's checksum no longer matches.
/// Violations are reported lowest version first.
pub fn pending(incoming: &[Migration], applied: &[LedgerEntry]) -> CoreResult<Vec<Migration>> {
    if applied.is_empty() {
        let mut all = incoming.to_vec();
        all.sort_by_key(|m| m.version);
        return Ok(all);
    }

    if incoming.len() < applied.len() {
        return Err(CoreError::MigrationsMissing {
            incoming: incoming.len(),
            applied: applied.len(),
        });
    }

    let mut joined: BTreeMap<u32, Sides<'_>> = BTreeMap::new();
    for migration in incoming {
        joined.entry(migration.version).or_default().incoming = Some(migration);
    }
    for entry in applied {
        joined.entry(entry.version).or_default().applied = Some(entry);
    }

    for (version, sides) in &joined {
        match (sides.incoming, sides.applied) {
            (Some(migration), Some(entry)) if migration.checksum != entry.checksum => {
                return Err(CoreError::ChecksumMismatch {
                    version: *version,
                    incoming: migration.checksum.clone(),
                    applied: entry.checksum.clone(),
                });
            }
            (None, Some(_)) => {
                return Err(CoreError::UnknownAppliedMigration { version: *version });
            }
            _ => {}
        }
    }

    Ok(joined
        .into_values()
        .filter_map(|sides| match sides {
            Sides {
                incoming: Some(migration),
                applied: None,
            } => Some(migration.clone()),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
