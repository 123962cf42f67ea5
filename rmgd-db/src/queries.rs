//! Read queries for the catalog database.

use rmgd_catalog::Record;
use rmgd_core::{RecordKind, RecordStatus, Role};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::operations::{ImportLog, OperationError, UserAccount};

const RECORD_COLUMNS: &str = "id, name, category, maker, year, description, images,
                              status, submitted_by, created_at, updated_at";

/// Row to record; the images column is decoded by the caller so JSON errors
/// surface as `OperationError::Images` instead of a SQLite conversion error.
fn row_to_record(row: &Row) -> rusqlite::Result<(Record, String)> {
    let status: String = row.get(7)?;
    let record = Record {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        maker: row.get(3)?,
        year: row.get(4)?,
        description: row.get(5)?,
        images: Vec::new(),
        status: RecordStatus::from_str_loose(&status),
        submitted_by: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    };
    Ok((record, row.get(6)?))
}

fn decode_images((mut record, images): (Record, String)) -> Result<Record, OperationError> {
    record.images = serde_json::from_str(&images).map_err(|e| OperationError::Images {
        id: record.id.clone(),
        source: e,
    })?;
    Ok(record)
}

/// All records of a kind, in insertion order.
pub fn list_records(conn: &Connection, kind: RecordKind) -> Result<Vec<Record>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM records WHERE kind = ?1 ORDER BY rowid"
    ))?;
    let rows = stmt.query_map(params![kind.collection()], row_to_record)?;
    rows.map(|row| decode_images(row?)).collect()
}

/// Records a contributor submitted, in insertion order.
pub fn records_by_submitter(
    conn: &Connection,
    kind: RecordKind,
    username: &str,
) -> Result<Vec<Record>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM records
         WHERE kind = ?1 AND submitted_by = ?2 ORDER BY rowid"
    ))?;
    let rows = stmt.query_map(params![kind.collection(), username], row_to_record)?;
    rows.map(|row| decode_images(row?)).collect()
}

/// Look up one record by id.
pub fn find_record(
    conn: &Connection,
    kind: RecordKind,
    id: &str,
) -> Result<Option<Record>, OperationError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM records WHERE kind = ?1 AND id = ?2"
    ))?;
    let row = stmt
        .query_row(params![kind.collection(), id], row_to_record)
        .optional()?;
    row.map(decode_images).transpose()
}

fn row_to_user(row: &Row) -> rusqlite::Result<UserAccount> {
    let role: String = row.get(1)?;
    Ok(UserAccount {
        username: row.get(0)?,
        role: role.parse().unwrap_or(Role::Contributor),
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn find_user(conn: &Connection, username: &str) -> Result<Option<UserAccount>, OperationError> {
    conn.query_row(
        "SELECT username, role, password_hash, created_at
         FROM users WHERE username = ?1",
        params![username],
        row_to_user,
    )
    .optional()
    .map_err(Into::into)
}

pub fn list_users(conn: &Connection) -> Result<Vec<UserAccount>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT username, role, password_hash, created_at
         FROM users ORDER BY username",
    )?;
    let rows = stmt.query_map([], row_to_user)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

pub fn count_users(conn: &Connection) -> Result<i64, OperationError> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
        .map_err(Into::into)
}

/// Most recent imports first.
pub fn list_import_logs(conn: &Connection) -> Result<Vec<ImportLog>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, source_name, imported_at, records_created,
                records_updated, records_skipped
         FROM import_log ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        let kind: String = row.get(1)?;
        Ok(ImportLog {
            id: row.get(0)?,
            kind: kind.parse().unwrap_or(RecordKind::Games),
            source_name: row.get(2)?,
            imported_at: row.get(3)?,
            records_created: row.get(4)?,
            records_updated: row.get(5)?,
            records_skipped: row.get(6)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Row counts for the database summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub games: i64,
    pub devices: i64,
    pub pending: i64,
    pub users: i64,
    pub imports: i64,
}

pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let count = |sql: &str| -> Result<i64, OperationError> {
        Ok(conn.query_row(sql, [], |row| row.get(0))?)
    };

    Ok(CatalogStats {
        games: count("SELECT COUNT(*) FROM records WHERE kind = 'games'")?,
        devices: count("SELECT COUNT(*) FROM records WHERE kind = 'devices'")?,
        pending: count("SELECT COUNT(*) FROM records WHERE status = 'pending'")?,
        users: count("SELECT COUNT(*) FROM users")?,
        imports: count("SELECT COUNT(*) FROM import_log")?,
    })
}
