//! Loading raw record documents from disk.
//!
//! Seed data and exports are accepted as YAML or JSON. A document may be a
//! sequence of records, a single record, or a store export object that
//! keeps its records under `Items`, `items` or `records`.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YamlError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("JSON parse error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("Directory not found: {0}")]
    DirNotFound(String),
}

const EXPORT_KEYS: &[&str] = &["Items", "items", "records"];

/// Flatten a parsed document into its list of raw records.
pub fn extract_records(doc: Value) -> Vec<Value> {
    match doc {
        Value::Array(items) => items,
        Value::Object(mut obj) => {
            let key = EXPORT_KEYS
                .iter()
                .find(|key| obj.get(**key).is_some_and(Value::is_array));
            match key {
                Some(key) => match obj.remove(*key) {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                },
                None => vec![Value::Object(obj)],
            }
        }
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

fn is_record_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml" || ext == "json")
}

/// Load the raw records in one `.json`, `.yaml` or `.yml` file.
pub fn load_records_file(path: &Path) -> Result<Vec<Value>, YamlError> {
    let contents = std::fs::read_to_string(path).map_err(|e| YamlError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let doc: Value = if is_json(path) {
        serde_json::from_str(&contents).map_err(|e| YamlError::Json {
            path: path.display().to_string(),
            source: e,
        })?
    } else {
        serde_yml::from_str(&contents).map_err(|e| YamlError::Parse {
            path: path.display().to_string(),
            source: e,
        })?
    };
    Ok(extract_records(doc))
}

/// Load every record file in a directory, in file-name order.
///
/// A missing directory yields no records.
pub fn load_seed_dir(dir: &Path) -> Result<Vec<Value>, YamlError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(YamlError::DirNotFound(dir.display().to_string()));
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| YamlError::Io {
            path: dir.display().to_string(),
            source: e,
        })?
        .filter_map(|e| e.ok())
        .filter(|e| is_record_file(&e.path()))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut all = Vec::new();
    for entry in entries {
        all.extend(load_records_file(&entry.path())?);
    }
    Ok(all)
}
