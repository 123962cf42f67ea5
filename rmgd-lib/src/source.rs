//! Record sources and stores.
//!
//! A [`RecordSource`] returns the raw records of one catalog kind; the
//! engine normalizes them. A [`RecordStore`] also accepts single-record
//! mutations. Failures are reported as human-readable messages and are
//! never retried here.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use rmgd_catalog::{extract_records, normalize, Record, RecordPatch};
use rmgd_core::RecordKind;
use rmgd_db::{OperationError, SchemaError};
use rusqlite::Connection;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Database error: {0}")]
    Database(#[from] OperationError),
    #[error("Database error: {0}")]
    Schema(#[from] SchemaError),
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Unexpected response: {0}")]
    Parse(String),
}

/// Anything that can deliver the full raw record set of a kind.
pub trait RecordSource {
    fn fetch(&self, kind: RecordKind) -> Result<Vec<Value>, SourceError>;
}

/// A record source that also accepts single-record mutations.
pub trait RecordStore: RecordSource {
    /// Persist a new record and return it as stored.
    fn create(&self, kind: RecordKind, record: &Record) -> Result<Record, SourceError>;
    /// Merge a partial update and return the updated record.
    fn update(&self, kind: RecordKind, id: &str, patch: &RecordPatch)
    -> Result<Record, SourceError>;
    fn delete(&self, kind: RecordKind, id: &str) -> Result<(), SourceError>;
}

// ── SQLite ──────────────────────────────────────────────────────────────────

/// Record store backed by the local catalog database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        Ok(Self::new(rmgd_db::open_database(path)?))
    }

    pub fn memory() -> Result<Self, SourceError> {
        Ok(Self::new(rmgd_db::open_memory()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl RecordSource for SqliteStore {
    fn fetch(&self, kind: RecordKind) -> Result<Vec<Value>, SourceError> {
        let records = rmgd_db::list_records(&self.conn, kind)?;
        Ok(records.iter().map(Record::to_value).collect())
    }
}

impl RecordStore for SqliteStore {
    fn create(&self, kind: RecordKind, record: &Record) -> Result<Record, SourceError> {
        rmgd_db::insert_record(&self.conn, kind, record)?;
        Ok(record.clone())
    }

    fn update(
        &self,
        kind: RecordKind,
        id: &str,
        patch: &RecordPatch,
    ) -> Result<Record, SourceError> {
        Ok(rmgd_db::update_record(&self.conn, kind, id, patch)?)
    }

    fn delete(&self, kind: RecordKind, id: &str) -> Result<(), SourceError> {
        Ok(rmgd_db::delete_record(&self.conn, kind, id)?)
    }
}

// ── REST API ────────────────────────────────────────────────────────────────

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY: usize = 200;

/// Record store backed by the dashboard's REST API.
///
/// Endpoints: `GET/POST {base}/{kind}` and `PUT/DELETE {base}/{kind}/{id}`.
pub struct HttpRecordSource {
    base: Url,
    http: Client,
}

impl HttpRecordSource {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        let base = Url::parse(base_url).map_err(|e| SourceError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".to_string(),
            });
        }
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { base, http })
    }

    /// URL of a collection, or of one item when `id` is given.
    pub fn endpoint(&self, kind: RecordKind, id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(kind.collection());
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Turn a non-success response into `SourceError::Status`.
    fn check(resp: Response) -> Result<Response, SourceError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        let body: String = body.chars().take(MAX_ERROR_BODY).collect();
        Err(SourceError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Parse a response body as JSON; `None` for an empty body.
    fn read_json(resp: Response) -> Result<Option<Value>, SourceError> {
        let text = resp.text()?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text).map(Some).map_err(|e| {
            let snippet: String = text.chars().take(MAX_ERROR_BODY).collect();
            SourceError::Parse(format!("{e}. Response: {snippet}"))
        })
    }

    fn json_body(value: &impl serde::Serialize) -> Result<String, SourceError> {
        serde_json::to_string(value).map_err(|e| SourceError::Parse(e.to_string()))
    }

    /// Fetch one record, used when a mutation response carries no body.
    fn fetch_one(&self, kind: RecordKind, id: &str) -> Result<Record, SourceError> {
        let url = self.endpoint(kind, Some(id));
        log::debug!("GET {url}");
        let resp = Self::check(self.http.get(url).send()?)?;
        Self::read_json(resp)?
            .map(|value| normalize(&value))
            .ok_or_else(|| SourceError::Parse(format!("empty response for {kind}/{id}")))
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch(&self, kind: RecordKind) -> Result<Vec<Value>, SourceError> {
        let url = self.endpoint(kind, None);
        log::debug!("GET {url}");
        let resp = Self::check(self.http.get(url).send()?)?;
        Ok(Self::read_json(resp)?.map(extract_records).unwrap_or_default())
    }
}

impl RecordStore for HttpRecordSource {
    fn create(&self, kind: RecordKind, record: &Record) -> Result<Record, SourceError> {
        let url = self.endpoint(kind, None);
        log::debug!("POST {url}");
        let resp = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(Self::json_body(&record.to_value())?)
            .send()?;
        let created = Self::read_json(Self::check(resp)?)?;
        Ok(created
            .filter(Value::is_object)
            .map(|value| normalize(&value))
            .unwrap_or_else(|| record.clone()))
    }

    fn update(
        &self,
        kind: RecordKind,
        id: &str,
        patch: &RecordPatch,
    ) -> Result<Record, SourceError> {
        let url = self.endpoint(kind, Some(id));
        log::debug!("PUT {url}");
        let resp = self
            .http
            .put(url)
            .header(CONTENT_TYPE, "application/json")
            .body(Self::json_body(patch)?)
            .send()?;
        match Self::read_json(Self::check(resp)?)?.filter(Value::is_object) {
            Some(value) => Ok(normalize(&value)),
            None => self.fetch_one(kind, id),
        }
    }

    fn delete(&self, kind: RecordKind, id: &str) -> Result<(), SourceError> {
        let url = self.endpoint(kind, Some(id));
        log::debug!("DELETE {url}");
        Self::check(self.http.delete(url).send()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_append_kind_and_id() {
        let source = HttpRecordSource::new("https://api.example/v1/").unwrap();
        assert_eq!(
            source.endpoint(RecordKind::Games, None).as_str(),
            "https://api.example/v1/games"
        );
        assert_eq!(
            source.endpoint(RecordKind::Devices, Some("d 1/x")).as_str(),
            "https://api.example/v1/devices/d%201%2Fx"
        );
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(
            HttpRecordSource::new("not a url"),
            Err(SourceError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpRecordSource::new("mailto:someone@example.com"),
            Err(SourceError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn sqlite_store_round_trip() {
        let store = SqliteStore::memory().unwrap();
        let mut record = Record::new("snake", "Snake");
        record.images = vec!["1.png".to_string()];
        store.create(RecordKind::Games, &record).unwrap();

        let raws = store.fetch(RecordKind::Games).unwrap();
        assert_eq!(raws.len(), 1);
        assert_eq!(normalize(&raws[0]), record);

        let patch = RecordPatch {
            maker: Some("Nokia".to_string()),
            ..RecordPatch::default()
        };
        let updated = store.update(RecordKind::Games, "snake", &patch).unwrap();
        assert_eq!(updated.maker, "Nokia");

        store.delete(RecordKind::Games, "snake").unwrap();
        assert!(store.fetch(RecordKind::Games).unwrap().is_empty());
        assert!(store.delete(RecordKind::Games, "snake").is_err());
    }
}
