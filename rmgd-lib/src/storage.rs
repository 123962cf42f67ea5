//! Image object storage.
//!
//! Uploaded images land under `{root}/{folder}/` and are addressed by a
//! public URL of the form `{public_base_url}/{folder}/{file}`. Records keep
//! only those URLs.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::submit::slugify;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Suffixes tried before giving up on a free object name.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Accepted image extensions, lowercase.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Unsupported image type '{0}' (expected jpg, jpeg, png, gif or webp)")]
    UnsupportedType(String),
    #[error("Image is {size} bytes; the limit is {}", MAX_UPLOAD_BYTES)]
    TooLarge { size: u64 },
    #[error("Invalid storage folder '{0}'")]
    InvalidFolder(String),
    #[error("URL is not managed by this storage: {0}")]
    ForeignUrl(String),
}

/// Stores image bytes and hands back public URLs.
pub trait ObjectStorage {
    /// Copy a local file into `folder`, returning its public URL.
    fn upload(&self, folder: &str, source: &Path) -> Result<String, StorageError>;
    /// Remove a previously uploaded object by URL.
    fn delete(&self, url: &str) -> Result<(), StorageError>;
}

/// Filesystem-backed storage, usually served by a static file host.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

fn io_err(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn validate_folder(folder: &str) -> Result<&str, StorageError> {
    let ok = !folder.is_empty()
        && folder
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(folder)
    } else {
        Err(StorageError::InvalidFolder(folder.to_string()))
    }
}

/// Create a file under `dir` that did not exist before. `base.ext` is tried
/// first, then `base-1.ext`, `base-2.ext` and so on.
fn create_unique(dir: &Path, base: &str, ext: &str) -> Result<(String, PathBuf, File), StorageError> {
    let mut last = dir.join(format!("{base}.{ext}"));
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let file_name = if attempt == 0 {
            format!("{base}.{ext}")
        } else {
            format!("{base}-{attempt}.{ext}")
        };
        let target = dir.join(&file_name);
        match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(file) => return Ok((file_name, target, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => last = target,
            Err(e) => return Err(io_err(&target, e)),
        }
    }
    Err(io_err(
        &last,
        io::Error::new(io::ErrorKind::AlreadyExists, "no free object name"),
    ))
}

/// Lowercased extension if it is an accepted image type.
pub fn image_extension(path: &Path) -> Result<String, StorageError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(StorageError::UnsupportedType(ext))
    }
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL for an object key such as `game-images/123-tetris.png`.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    /// Map a public URL back to a path under the root.
    fn path_for_url(&self, url: &str) -> Result<PathBuf, StorageError> {
        let key = url
            .strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StorageError::ForeignUrl(url.to_string()))?;
        let mut parts = key.split('/');
        let (Some(folder), Some(file), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(StorageError::ForeignUrl(url.to_string()));
        };
        validate_folder(folder)?;
        if file.is_empty() || file.starts_with('.') || file.contains('\\') {
            return Err(StorageError::ForeignUrl(url.to_string()));
        }
        Ok(self.root.join(folder).join(file))
    }
}

impl ObjectStorage for LocalObjectStorage {
    fn upload(&self, folder: &str, source: &Path) -> Result<String, StorageError> {
        let folder = validate_folder(folder)?;
        let ext = image_extension(source)?;
        let size = std::fs::metadata(source)
            .map_err(|e| io_err(source, e))?
            .len();
        if size > MAX_UPLOAD_BYTES {
            return Err(StorageError::TooLarge { size });
        }

        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "image".to_string());
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        let dir = self.root.join(folder);
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        let mut input = File::open(source).map_err(|e| io_err(source, e))?;
        let (file_name, target, mut file) = create_unique(&dir, &format!("{millis}-{stem}"), &ext)?;
        if let Err(e) = io::copy(&mut input, &mut file) {
            // Leave no half-written object behind.
            let _ = std::fs::remove_file(&target);
            return Err(io_err(&target, e));
        }
        log::debug!("Stored {} as {}", source.display(), target.display());

        Ok(self.url_for(&format!("{folder}/{file_name}")))
    }

    /// Deleting an object that is already gone is not an error.
    fn delete(&self, url: &str) -> Result<(), StorageError> {
        let path = self.path_for_url(url)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Image already removed: {}", path.display());
                Ok(())
            }
            Err(e) => Err(io_err(&path, e)),
        }
    }
}
