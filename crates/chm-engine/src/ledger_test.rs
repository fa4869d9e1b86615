use super::*;
use crate::testing::RecordingDatabase;
use serde_json::json;

fn row(version: u32, md5: &str, created_at: &str) -> Row {
    let mut row = Row::new();
    row.insert("version".to_string(), json!(version));
    row.insert("md5".to_string(), json!(md5));
    row.insert("script".to_string(), json!("SHOW TABLES"));
    row.insert("created_at".to_string(), json!(created_at));
    row
}

fn entry(version: u32, checksum: &str, secs: Option<u32>) -> LedgerEntry {
    LedgerEntry {
        version,
        checksum: checksum.to_string(),
        script: "SHOW TABLES".to_string(),
        applied_at: secs.map(|s| {
            NaiveDateTime::parse_from_str("2024-01-01 00:00:00", DATETIME_FORMAT).unwrap()
                + chrono::Duration::seconds(s as i64)
        }),
    }
}

#[test]
fn test_consolidate_dedupes_and_sorts() {
    let rows = vec![
        entry(2, "b", Some(1)),
        entry(1, "a", Some(0)),
        entry(2, "b", Some(1)),
        entry(1, "a", Some(5)),
    ];
    let result = consolidate(rows);
    let versions: Vec<u32> = result.iter().map(|e| e.version).collect();
    assert_eq!(versions, vec![1, 2]);
}

#[test]
fn test_consolidate_prefers_newest_row() {
    let rows = vec![entry(3, "new", Some(10)), entry(3, "old", Some(2))];
    assert_eq!(consolidate(rows)[0].checksum, "new");

    let rows = vec![entry(3, "old", None), entry(3, "new", Some(0))];
    assert_eq!(consolidate(rows)[0].checksum, "new");
}

#[test]
fn test_consolidate_tie_keeps_later_row() {
    let rows = vec![entry(3, "first", Some(1)), entry(3, "second", Some(1))];
    assert_eq!(consolidate(rows)[0].checksum, "second");
}

#[tokio::test]
async fn test_query_applied_decodes_and_consolidates() {
    let db = RecordingDatabase::new().with_query_result(vec![
        row(1, "111", "2024-01-01 00:00:00"),
        row(2, "222", "2024-01-01 00:00:01"),
        row(1, "111", "2024-01-01 00:00:00"),
    ]);
    let ledger = ClickHouseLedger::new(&db);

    let applied = ledger.query_applied().await.unwrap();
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[0].version, 1);
    assert_eq!(applied[1].checksum, "222");
    assert!(applied[0].applied_at.is_some());
    assert_eq!(db.queries(), vec![select_sql()]);
}

#[tokio::test]
async fn test_query_applied_accepts_string_versions() {
    let mut r = row(1, "111", "2024-01-01 00:00:00");
    r.insert("version".to_string(), json!("7"));
    let db = RecordingDatabase::new().with_query_result(vec![r]);

    let applied = ClickHouseLedger::new(&db).query_applied().await.unwrap();
    assert_eq!(applied[0].version, 7);
}

#[tokio::test]
async fn test_query_applied_rejects_malformed_rows() {
    let mut r = row(1, "111", "2024-01-01 00:00:00");
    r.remove("md5");
    let db = RecordingDatabase::new().with_query_result(vec![r]);

    let err = ClickHouseLedger::new(&db).query_applied().await.unwrap_err();
    assert!(matches!(err, EngineError::MalformedLedgerRow(_)));
}

#[tokio::test]
async fn test_insert_writes_one_row_without_timestamp() {
    let db = RecordingDatabase::new();
    let ledger = ClickHouseLedger::new(&db);
    ledger.insert(&entry(4, "444", None)).await.unwrap();

    let inserted = db.inserted();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].0, LEDGER_TABLE);
    assert_eq!(inserted[0].1["version"], json!(4));
    assert_eq!(inserted[0].1["md5"], json!("444"));
    assert!(!inserted[0].1.contains_key("created_at"));
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn test_overwrite_replaces_changed_checksum() {
    let db = RecordingDatabase::new()
        .with_query_result(vec![row(2, "stale", "2024-01-01 00:00:00")]);
    let ledger = ClickHouseLedger::new(&db);
    ledger.overwrite(2, &entry(2, "fresh", None)).await.unwrap();

    assert_eq!(db.queries(), vec![select_version_sql(2)]);
    assert_eq!(db.inserted().len(), 1);
    assert_eq!(db.inserted()[0].1["md5"], json!("fresh"));
    assert_eq!(
        db.executed(),
        vec![
            "ALTER TABLE schema_versions DELETE WHERE version = 2 AND md5 != 'fresh' \
             SETTINGS mutations_sync = 2"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_overwrite_unchanged_checksum_writes_nothing() {
    let db = RecordingDatabase::new()
        .with_query_result(vec![row(1, "same", "2024-01-01 00:00:00")]);
    let ledger = ClickHouseLedger::new(&db);
    ledger.overwrite(1, &entry(1, "same", None)).await.unwrap();

    assert!(db.inserted().is_empty());
    assert!(db.executed().is_empty());
}

#[tokio::test]
async fn test_overwrite_unrecorded_version_only_inserts() {
    let db = RecordingDatabase::new();
    let ledger = ClickHouseLedger::new(&db);
    ledger.overwrite(5, &entry(5, "new", None)).await.unwrap();

    assert_eq!(db.inserted().len(), 1);
    assert!(db.executed().is_empty());
}
