//! Bulk import of raw records into the catalog database.
//!
//! Raw input goes through the same normalizer as every other source, so an
//! export from the hosted store, a hand-written YAML seed file and a JSON
//! array all land the same way. Existing ids are overwritten in place.

use rmgd_catalog::normalize_all;
use rmgd_core::RecordKind;
use rmgd_db::{ImportLog, OperationError, UpsertOutcome};
use rusqlite::Connection;
use serde_json::Value;
use thiserror::Error;

use crate::progress::ImportProgress;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] OperationError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Statistics from a single import run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    /// Raw values that were not objects.
    pub skipped: usize,
    pub log_id: i64,
}

impl ImportStats {
    pub fn summary(&self) -> String {
        format!(
            "{} created, {} updated, {} skipped ({} total)",
            self.created, self.updated, self.skipped, self.total
        )
    }
}

/// Import `raws` as records of `kind` inside one transaction.
///
/// Non-object values are skipped. Records missing timestamps get `now`.
pub fn import_records(
    conn: &Connection,
    kind: RecordKind,
    raws: &[Value],
    source_name: &str,
    progress: Option<&dyn ImportProgress>,
) -> Result<ImportStats, ImportError> {
    let mut stats = ImportStats {
        total: raws.len(),
        ..Default::default()
    };
    let now = rmgd_db::now_timestamp();

    let objects: Vec<Value> = raws
        .iter()
        .filter(|raw| raw.is_object())
        .cloned()
        .collect();
    stats.skipped = raws.len() - objects.len();
    if stats.skipped > 0 {
        log::warn!("Skipping {} non-object entries in {}", stats.skipped, source_name);
    }

    let tx = conn.unchecked_transaction()?;

    let records = normalize_all(&objects);
    let total = records.len();
    for (i, mut record) in records.into_iter().enumerate() {
        if record.created_at.is_none() {
            record.created_at = Some(now.clone());
        }
        if record.updated_at.is_none() {
            record.updated_at = Some(now.clone());
        }
        match rmgd_db::upsert_record(&tx, kind, &record)? {
            UpsertOutcome::Created => stats.created += 1,
            UpsertOutcome::Updated => stats.updated += 1,
        }
        if let Some(p) = progress {
            p.on_record(i + 1, total, &record.id);
        }
    }

    stats.log_id = rmgd_db::insert_import_log(
        &tx,
        &ImportLog {
            id: 0,
            kind,
            source_name: source_name.to_string(),
            imported_at: now,
            records_created: stats.created as i64,
            records_updated: stats.updated as i64,
            records_skipped: stats.skipped as i64,
        },
    )?;

    tx.commit()?;

    if let Some(p) = progress {
        p.on_complete(&format!("Imported {} {}: {}", total, kind, stats.summary()));
    }
    Ok(stats)
}

#[cfg(test)]
#[path = "tests/import_tests.rs"]
mod tests;
