//! Record normalization.
//!
//! Input records come from several generations of the dashboard and from a
//! key-value store that wraps scalars in type tags. Each canonical field is
//! resolved through [`FIELD_KEYS`]: candidate source keys are tried in order
//! and the first one holding a usable value wins. Normalization never fails;
//! malformed input degrades to a record with default fields.

use std::collections::HashSet;

use rmgd_core::RecordStatus;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::types::{Record, DEFAULT_CATEGORY, UNTITLED};

/// Canonical record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Category,
    Maker,
    Year,
    Description,
    Images,
    Status,
    SubmittedBy,
    CreatedAt,
    UpdatedAt,
}

/// Candidate source keys per canonical field, highest priority first.
///
/// The canonical key always comes first so already-normalized records
/// resolve to themselves.
pub const FIELD_KEYS: &[(Field, &[&str])] = &[
    (
        Field::Id,
        &["id", "ID", "Id", "_id", "key", "Key", "gameId", "deviceId"],
    ),
    (
        Field::Name,
        &[
            "name",
            "title",
            "Name",
            "Title",
            "Name of Product",
            "Product Name",
            "gameName",
            "deviceName",
            "game_name",
            "device_name",
        ],
    ),
    (
        Field::Category,
        &["category", "genre", "Category", "Genre", "Type", "type", "deviceType"],
    ),
    (
        Field::Maker,
        &[
            "maker",
            "developer",
            "manufacturer",
            "publisher",
            "Maker",
            "Developer",
            "Manufacturer",
            "Publisher",
            "Company",
        ],
    ),
    (
        Field::Year,
        &[
            "year",
            "releaseYear",
            "release_year",
            "Year",
            "Release Year",
            "Year of Release",
            "Year Released",
        ],
    ),
    (
        Field::Description,
        &["description", "Description", "notes", "Notes", "details"],
    ),
    (
        Field::Images,
        &[
            "images",
            "Images",
            "imageUrls",
            "image_urls",
            "imageUrl",
            "image",
            "Image",
        ],
    ),
    (Field::Status, &["status", "Status", "state"]),
    (
        Field::SubmittedBy,
        &[
            "submittedBy",
            "submitted_by",
            "Submitted By",
            "contributor",
            "createdBy",
            "userId",
        ],
    ),
    (
        Field::CreatedAt,
        &["createdAt", "created_at", "Created At", "dateAdded"],
    ),
    (
        Field::UpdatedAt,
        &["updatedAt", "updated_at", "Updated At", "lastModified"],
    ),
];

/// Type tags that wrap a single scalar (`{"S": "Snake"}`, `{"N": "1997"}`).
const SCALAR_TAGS: &[&str] = &["S", "N"];
/// Type tags that wrap a list (`{"SS": [..]}`, `{"L": [{"S": ..}]}`).
const LIST_TAGS: &[&str] = &["SS", "L"];
/// Envelope keys that wrap a whole record.
const RECORD_ENVELOPES: &[&str] = &["Item", "M"];

const PLACEHOLDER_PREFIX: &str = "pending-";

fn keys_for(field: Field) -> &'static [&'static str] {
    FIELD_KEYS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, keys)| *keys)
        .unwrap_or(&[])
}

/// Normalize one raw record into the canonical shape.
pub fn normalize(raw: &Value) -> Record {
    let Some(obj) = unwrap_envelope(raw) else {
        return Record::new(placeholder_id(raw), UNTITLED);
    };

    let text = |field: Field| first_of(obj, field, scalar);

    let id = text(Field::Id).unwrap_or_else(|| placeholder_id(raw));
    let name = text(Field::Name).unwrap_or_else(|| UNTITLED.to_string());
    let category = text(Field::Category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let status = text(Field::Status)
        .map(|s| RecordStatus::from_str_loose(&s))
        .unwrap_or_default();

    Record {
        id,
        name,
        category,
        maker: text(Field::Maker).unwrap_or_default(),
        year: text(Field::Year),
        description: first_of(obj, Field::Description, raw_text).unwrap_or_default(),
        images: first_of(obj, Field::Images, |v| Some(list(v)).filter(|l| !l.is_empty()))
            .unwrap_or_default(),
        status,
        submitted_by: text(Field::SubmittedBy),
        created_at: text(Field::CreatedAt),
        updated_at: text(Field::UpdatedAt),
    }
}

/// Normalize a whole collection, keeping input order.
///
/// Ids that collide with an earlier record get a numeric suffix so every id
/// in the result is unique.
pub fn normalize_all(raws: &[Value]) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raws.len());
    raws.iter()
        .map(|raw| {
            let mut record = normalize(raw);
            if !seen.insert(record.id.clone()) {
                let base = record.id.clone();
                let mut n = 2;
                while seen.contains(&format!("{base}-{n}")) {
                    n += 1;
                }
                record.id = format!("{base}-{n}");
                log::warn!("Duplicate record id '{}' renamed to '{}'", base, record.id);
                seen.insert(record.id.clone());
            }
            record
        })
        .collect()
}

/// Deterministic id for a record that arrived without one.
///
/// Derived from the raw content, so the same input always maps to the
/// same placeholder.
pub fn placeholder_id(raw: &Value) -> String {
    let digest = Sha256::digest(raw.to_string().as_bytes());
    let hex: String = digest[..6].iter().map(|b| format!("{b:02x}")).collect();
    format!("{PLACEHOLDER_PREFIX}{hex}")
}

/// Borrow the record's field map, looking through `Item`/`M` envelopes.
fn unwrap_envelope(raw: &Value) -> Option<&Map<String, Value>> {
    let mut obj = raw.as_object()?;
    while obj.len() == 1 {
        let inner = RECORD_ENVELOPES
            .iter()
            .find_map(|key| obj.get(*key))
            .and_then(Value::as_object);
        match inner {
            Some(inner) => obj = inner,
            None => break,
        }
    }
    Some(obj)
}

/// First candidate key for `field` whose value `extract` accepts.
fn first_of<T>(
    obj: &Map<String, Value>,
    field: Field,
    extract: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    keys_for(field)
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(extract)
}

/// Single-tag wrapper contents, if `value` is `{tag: inner}` for one of `tags`.
fn tagged<'a>(value: &'a Value, tags: &[&str]) -> Option<&'a Value> {
    let obj = value.as_object()?;
    if obj.len() != 1 {
        return None;
    }
    tags.iter().find_map(|tag| obj.get(*tag))
}

/// Trimmed, non-empty scalar text.
fn scalar(value: &Value) -> Option<String> {
    raw_text(value)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Scalar text without trimming; empty strings count as missing.
fn raw_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Object(_) => tagged(value, SCALAR_TAGS).and_then(raw_text),
        _ => None,
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// String list, unwrapping `SS`/`L` tags and accepting a lone string.
fn list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar).collect(),
        Value::Object(_) => tagged(value, LIST_TAGS).map(list).unwrap_or_default(),
        other => scalar(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_field_has_keys_led_by_canonical_name() {
        let canonical = [
            (Field::Id, "id"),
            (Field::Name, "name"),
            (Field::Category, "category"),
            (Field::Maker, "maker"),
            (Field::Year, "year"),
            (Field::Description, "description"),
            (Field::Images, "images"),
            (Field::Status, "status"),
            (Field::SubmittedBy, "submittedBy"),
            (Field::CreatedAt, "createdAt"),
            (Field::UpdatedAt, "updatedAt"),
        ];
        for (field, key) in canonical {
            assert_eq!(keys_for(field).first(), Some(&key), "{:?}", field);
        }
    }

    #[test]
    fn scalar_unwraps_tags() {
        assert_eq!(scalar(&json!({"S": " Snake "})), Some("Snake".to_string()));
        assert_eq!(scalar(&json!({"N": "1997"})), Some("1997".to_string()));
        assert_eq!(scalar(&json!({"N": 1997})), Some("1997".to_string()));
        assert_eq!(scalar(&json!({"S": "a", "N": "1"})), None);
        assert_eq!(scalar(&json!(null)), None);
        assert_eq!(scalar(&json!(true)), None);
    }

    #[test]
    fn numbers_render_as_integers() {
        assert_eq!(scalar(&json!(1997)), Some("1997".to_string()));
        assert_eq!(scalar(&json!(1997.0)), Some("1997".to_string()));
        assert_eq!(scalar(&json!(19.5)), Some("19.5".to_string()));
    }

    #[test]
    fn list_unwraps_tags() {
        assert_eq!(list(&json!({"SS": ["a", "b"]})), vec!["a", "b"]);
        assert_eq!(list(&json!({"L": [{"S": "a"}, {"S": ""}, {"S": "b"}]})), vec!["a", "b"]);
        assert_eq!(list(&json!("only.png")), vec!["only.png"]);
        assert!(list(&json!({"M": {}})).is_empty());
    }

    #[test]
    fn envelopes_are_unwrapped() {
        let raw = json!({"Item": {"id": {"S": "g1"}, "name": {"S": "Snake"}}});
        let record = normalize(&raw);
        assert_eq!(record.id, "g1");
        assert_eq!(record.name, "Snake");
    }

    #[test]
    fn placeholder_is_deterministic() {
        let raw = json!({"name": "Snake"});
        assert_eq!(placeholder_id(&raw), placeholder_id(&raw));
        assert!(placeholder_id(&raw).starts_with(PLACEHOLDER_PREFIX));
        assert_ne!(placeholder_id(&raw), placeholder_id(&json!({"name": "Tetris"})));
    }
}
