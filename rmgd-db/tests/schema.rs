use rmgd_db::schema::{get_schema_version, SchemaError, CURRENT_VERSION};
use rmgd_db::{open_database, open_memory};
use tempfile::TempDir;

#[test]
fn memory_database_has_current_version() {
    let conn = open_memory().unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn open_database_creates_parent_dirs() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("catalog.db");
    let conn = open_database(&path).unwrap();
    assert!(path.exists());
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn reopening_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.db");
    drop(open_database(&path).unwrap());
    let conn = open_database(&path).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("newer.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER NOT NULL, applied_at TEXT NOT NULL DEFAULT (datetime('now')));
             INSERT INTO schema_version (version) VALUES (7);",
        )
        .unwrap();
    }

    let err = open_database(&path).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::VersionMismatch { expected: CURRENT_VERSION, found: 7 }
    ));
}

#[test]
fn fresh_schema_is_version_one_with_skip_counts() {
    let conn = open_memory().unwrap();
    assert_eq!(CURRENT_VERSION, 1);
    let skipped: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('import_log') WHERE name = 'records_skipped'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(skipped, 1);
}
