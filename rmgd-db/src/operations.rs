//! Write operations for records, users and the import log.

use rmgd_catalog::{Record, RecordPatch};
use rmgd_core::{RecordKind, RecordStatus, Role};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::queries::find_record;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
    #[error("Duplicate {entity_type} id '{id}'")]
    Duplicate { entity_type: String, id: String },
    #[error("Corrupt image list for '{id}': {source}")]
    Images {
        id: String,
        source: serde_json::Error,
    },
}

impl OperationError {
    pub(crate) fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

/// Current time as an RFC 3339 UTC timestamp.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub(crate) fn images_to_json(record: &Record) -> Result<String, OperationError> {
    serde_json::to_string(&record.images).map_err(|e| OperationError::Images {
        id: record.id.clone(),
        source: e,
    })
}

// ── Record Operations ───────────────────────────────────────────────────────

/// Insert a new record. Fails with `Duplicate` if the id is taken.
pub fn insert_record(
    conn: &Connection,
    kind: RecordKind,
    record: &Record,
) -> Result<(), OperationError> {
    if find_record(conn, kind, &record.id)?.is_some() {
        return Err(OperationError::Duplicate {
            entity_type: kind.display_name().to_string(),
            id: record.id.clone(),
        });
    }
    conn.execute(
        "INSERT INTO records (kind, id, name, category, maker, year, description,
                              images, status, submitted_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            kind.collection(),
            record.id,
            record.name,
            record.category,
            record.maker,
            record.year,
            record.description,
            images_to_json(record)?,
            record.status.as_str(),
            record.submitted_by,
            record.created_at,
            record.updated_at,
        ],
    )?;
    Ok(())
}

/// Whether an upsert created a new row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Insert or fully replace a record, keeping its list position on update.
pub fn upsert_record(
    conn: &Connection,
    kind: RecordKind,
    record: &Record,
) -> Result<UpsertOutcome, OperationError> {
    let updated = conn.execute(
        "UPDATE records SET name = ?3, category = ?4, maker = ?5, year = ?6,
                description = ?7, images = ?8, status = ?9, submitted_by = ?10,
                created_at = ?11, updated_at = ?12
         WHERE kind = ?1 AND id = ?2",
        params![
            kind.collection(),
            record.id,
            record.name,
            record.category,
            record.maker,
            record.year,
            record.description,
            images_to_json(record)?,
            record.status.as_str(),
            record.submitted_by,
            record.created_at,
            record.updated_at,
        ],
    )?;
    if updated > 0 {
        return Ok(UpsertOutcome::Updated);
    }
    insert_record(conn, kind, record)?;
    Ok(UpsertOutcome::Created)
}

/// Merge a partial update into a stored record and return the result.
pub fn update_record(
    conn: &Connection,
    kind: RecordKind,
    id: &str,
    patch: &RecordPatch,
) -> Result<Record, OperationError> {
    let mut record = find_record(conn, kind, id)?
        .ok_or_else(|| OperationError::not_found(kind.display_name(), id))?;
    patch.apply(&mut record, &now_timestamp());
    upsert_record(conn, kind, &record)?;
    Ok(record)
}

/// Change only the status of a record.
pub fn set_record_status(
    conn: &Connection,
    kind: RecordKind,
    id: &str,
    status: RecordStatus,
) -> Result<Record, OperationError> {
    let patch = RecordPatch {
        status: Some(status),
        ..RecordPatch::default()
    };
    update_record(conn, kind, id, &patch)
}

/// Delete a record by id.
pub fn delete_record(conn: &Connection, kind: RecordKind, id: &str) -> Result<(), OperationError> {
    let deleted = conn.execute(
        "DELETE FROM records WHERE kind = ?1 AND id = ?2",
        params![kind.collection(), id],
    )?;
    if deleted == 0 {
        return Err(OperationError::not_found(kind.display_name(), id));
    }
    Ok(())
}

// ── User Operations ─────────────────────────────────────────────────────────

/// A dashboard account. `password_hash` is a PHC string carrying its own salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: String,
    pub role: Role,
    pub password_hash: String,
    pub created_at: String,
}

/// Insert a new user. Fails with `Duplicate` if the username is taken.
pub fn insert_user(conn: &Connection, user: &UserAccount) -> Result<(), OperationError> {
    let exists: Option<String> = conn
        .query_row(
            "SELECT username FROM users WHERE username = ?1",
            params![user.username],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(OperationError::Duplicate {
            entity_type: "user".to_string(),
            id: user.username.clone(),
        });
    }
    conn.execute(
        "INSERT INTO users (username, role, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            user.username,
            user.role.as_str(),
            user.password_hash,
            user.created_at,
        ],
    )?;
    Ok(())
}

pub fn set_user_role(conn: &Connection, username: &str, role: Role) -> Result<(), OperationError> {
    let updated = conn.execute(
        "UPDATE users SET role = ?2 WHERE username = ?1",
        params![username, role.as_str()],
    )?;
    if updated == 0 {
        return Err(OperationError::not_found("user", username));
    }
    Ok(())
}

pub fn delete_user(conn: &Connection, username: &str) -> Result<(), OperationError> {
    let deleted = conn.execute("DELETE FROM users WHERE username = ?1", params![username])?;
    if deleted == 0 {
        return Err(OperationError::not_found("user", username));
    }
    Ok(())
}

// ── Import Tracking ─────────────────────────────────────────────────────────

/// Log entry for a bulk import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportLog {
    pub id: i64,
    pub kind: RecordKind,
    pub source_name: String,
    pub imported_at: String,
    pub records_created: i64,
    pub records_updated: i64,
    pub records_skipped: i64,
}

/// Record an import run. Returns the new log id.
pub fn insert_import_log(conn: &Connection, log: &ImportLog) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT INTO import_log (kind, source_name, imported_at, records_created,
                                 records_updated, records_skipped)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            log.kind.collection(),
            log.source_name,
            log.imported_at,
            log.records_created,
            log.records_updated,
            log.records_skipped,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}
