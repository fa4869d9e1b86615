use super::*;

fn migration(version: u32, checksum: &str) -> Migration {
    Migration::with_checksum(version, checksum, "SHOW TABLES")
}

fn applied(version: u32, checksum: &str) -> LedgerEntry {
    migration(version, checksum).to_ledger_entry()
}

#[test]
fn test_fresh_install_returns_everything_sorted() {
    let incoming = vec![migration(3, "c"), migration(1, "a"), migration(2, "b")];
    let result = pending(&incoming, &[]).unwrap();
    let versions: Vec<u32> = result.iter().map(|m| m.version).collect();
    assert_eq!(versions, vec![1, 2, 3]);
}

#[test]
fn test_empty_incoming_and_empty_ledger() {
    assert!(pending(&[], &[]).unwrap().is_empty());
}

#[test]
fn test_returns_only_new_versions() {
    let incoming = vec![
        migration(1, "111"),
        migration(2, "222"),
        migration(3, "333"),
        migration(4, "444"),
        migration(5, "444"),
    ];
    let ledger = vec![applied(1, "111"), applied(2, "222")];

    let result = pending(&incoming, &ledger).unwrap();
    assert_eq!(result, incoming[2..].to_vec());
}

#[test]
fn test_fully_applied_is_idempotent() {
    let incoming = vec![migration(1, "a"), migration(2, "b")];
    let ledger: Vec<LedgerEntry> = incoming.iter().map(Migration::to_ledger_entry).collect();
    assert!(pending(&incoming, &ledger).unwrap().is_empty());
}

#[test]
fn test_deleted_migrations_fail() {
    let ledger = vec![applied(1, "1234")];
    let err = pending(&[], &ledger).unwrap_err();
    assert!(matches!(
        err,
        CoreError::MigrationsMissing {
            incoming: 0,
            applied: 1
        }
    ));
    assert!(err.is_integrity());
}

#[test]
fn test_unknown_applied_version_fails() {
    let incoming = vec![migration(2, "12345")];
    let ledger = vec![applied(1, "1234")];
    let err = pending(&incoming, &ledger).unwrap_err();
    assert!(matches!(
        err,
        CoreError::UnknownAppliedMigration { version: 1 }
    ));
}

#[test]
fn test_gap_in_incoming_fails_even_with_more_files() {
    let incoming = vec![migration(1, "a"), migration(2, "b"), migration(4, "d")];
    let ledger = vec![applied(1, "a"), applied(3, "c")];
    let err = pending(&incoming, &ledger).unwrap_err();
    assert!(matches!(
        err,
        CoreError::UnknownAppliedMigration { version: 3 }
    ));
}

#[test]
fn test_checksum_mismatch_fails() {
    let incoming = vec![migration(1, "a"), migration(2, "abc")];
    let ledger = vec![applied(1, "a"), applied(2, "xyz")];
    let err = pending(&incoming, &ledger).unwrap_err();
    match err {
        CoreError::ChecksumMismatch {
            version,
            incoming,
            applied,
        } => {
            assert_eq!(version, 2);
            assert_eq!(incoming, "abc");
            assert_eq!(applied, "xyz");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_lowest_violation_reported_first() {
    let incoming = vec![migration(1, "changed"), migration(2, "b")];
    let ledger = vec![applied(1, "a"), applied(5, "e")];
    let err = pending(&incoming, &ledger).unwrap_err();
    assert!(matches!(err, CoreError::ChecksumMismatch { version: 1, .. }));
}

#[test]
fn test_pending_is_sorted_regardless_of_input_order() {
    let incoming = vec![migration(4, "d"), migration(1, "a"), migration(3, "c")];
    let ledger = vec![applied(1, "a")];
    let versions: Vec<u32> = pending(&incoming, &ledger)
        .unwrap()
        .iter()
        .map(|m| m.version)
        .collect();
    assert_eq!(versions, vec![3, 4]);
}
