//! Application settings.
//!
//! The settings file is `~/.config/rmgd/settings.toml`. Each value is
//! resolved with the priority chain: CLI override > environment variable >
//! settings file > built-in default.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_DATABASE: &str = "RMGD_DATABASE";
pub const ENV_API_URL: &str = "RMGD_API_URL";
pub const ENV_STORAGE_ROOT: &str = "RMGD_STORAGE_ROOT";
pub const ENV_PUBLIC_URL: &str = "RMGD_PUBLIC_URL";

/// Keys accepted by [`set_setting`].
pub const SETTING_KEYS: &[&str] = &[
    "store.database",
    "store.api_url",
    "storage.root",
    "storage.public_base_url",
];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error on {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Unknown setting '{0}' (expected one of: store.database, store.api_url, storage.root, storage.public_base_url)")]
    UnknownKey(String),
    #[error("{0}")]
    Malformed(String),
}

/// On-disk layout of `settings.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    pub database: Option<PathBuf>,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSection {
    pub root: Option<PathBuf>,
    pub public_base_url: Option<String>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub database: Option<PathBuf>,
    pub api_url: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: PathBuf,
    /// When set, records are read from and written to this REST API
    /// instead of the local database.
    pub api_url: Option<String>,
    pub storage_root: PathBuf,
    pub public_base_url: String,
}

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Directory holding the settings file and session.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rmgd")
}

/// Directory holding the default database and image storage.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rmgd")
}

/// Read the settings file; a missing file is an empty one.
pub fn read_settings_file(path: &Path) -> Result<SettingsFile, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            source: e,
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(SettingsFile::default()),
        Err(e) => Err(SettingsError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

/// Merge overrides, environment, file and defaults.
pub fn resolve(
    file: SettingsFile,
    overrides: SettingsOverrides,
    env: impl Fn(&str) -> Option<String>,
    data_dir: &Path,
) -> Settings {
    let env_nonempty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let database = overrides
        .database
        .or_else(|| env_nonempty(ENV_DATABASE).map(PathBuf::from))
        .or(file.store.database)
        .unwrap_or_else(|| data_dir.join("catalog.db"));

    let api_url = overrides
        .api_url
        .or_else(|| env_nonempty(ENV_API_URL))
        .or(file.store.api_url)
        .filter(|url| !url.trim().is_empty());

    let storage_root = env_nonempty(ENV_STORAGE_ROOT)
        .map(PathBuf::from)
        .or(file.storage.root)
        .unwrap_or_else(|| data_dir.join("storage"));

    let public_base_url = env_nonempty(ENV_PUBLIC_URL)
        .or(file.storage.public_base_url)
        .unwrap_or_else(|| format!("file://{}", storage_root.display()));

    Settings {
        database,
        api_url,
        storage_root,
        public_base_url: public_base_url.trim_end_matches('/').to_string(),
    }
}

impl Settings {
    /// Load settings from the standard file and the process environment.
    pub fn load(overrides: SettingsOverrides) -> Result<Self, SettingsError> {
        let file = read_settings_file(&settings_path())?;
        Ok(resolve(
            file,
            overrides,
            |key| std::env::var(key).ok(),
            &data_dir(),
        ))
    }
}

/// Set (or clear, with an empty value) one key in the settings file.
///
/// Uses `toml::Value` for a surgical update so unknown sections written by
/// other tools are preserved. Writes atomically.
pub fn set_setting(path: &Path, key: &str, value: &str) -> Result<(), SettingsError> {
    if !SETTING_KEYS.contains(&key) {
        return Err(SettingsError::UnknownKey(key.to_string()));
    }
    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;

    let mut doc: toml::Value = match std::fs::read_to_string(path) {
        Ok(contents) => contents.parse().map_err(|e| SettingsError::Parse {
            path: path.display().to_string(),
            source: e,
        })?,
        Err(_) => toml::Value::Table(Default::default()),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| SettingsError::Malformed("settings.toml root is not a table".into()))?;
    let section_value = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section_table = section_value
        .as_table_mut()
        .ok_or_else(|| SettingsError::Malformed(format!("[{section}] is not a table")))?;

    if value.trim().is_empty() {
        section_table.remove(field);
    } else {
        section_table.insert(field.to_string(), toml::Value::String(value.to_string()));
    }

    let io_err = |e: io::Error| SettingsError::Io {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let serialized = toml::to_string_pretty(&doc)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
