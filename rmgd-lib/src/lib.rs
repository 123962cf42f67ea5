//! Collaborators around the Catalog View Engine: record sources and stores,
//! the explicit catalog state container, sessions and roles, image storage,
//! settings, bulk import, submissions and CSV reports.

pub mod import;
pub mod progress;
pub mod report;
pub mod session;
pub mod settings;
pub mod source;
pub mod state;
pub mod storage;
pub mod submit;

pub use import::{import_records, ImportError, ImportStats};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use report::{write_aggregates_csv, write_records_csv, ReportError};
pub use session::{Actor, IdentityProvider, LocalIdentity, SessionError};
pub use settings::{Settings, SettingsError, SettingsOverrides};
pub use source::{HttpRecordSource, RecordSource, RecordStore, SourceError, SqliteStore};
pub use state::CatalogState;
pub use storage::{LocalObjectStorage, ObjectStorage, StorageError};
pub use submit::{check_edit, new_submission, slugify, SubmitError};

pub use rmgd_catalog as catalog;
pub use rmgd_core as core;
