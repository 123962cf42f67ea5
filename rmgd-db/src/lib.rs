//! SQLite persistence layer for the RMGD catalog.
//!
//! Provides schema creation, record and user CRUD, and query APIs
//! backed by SQLite (via rusqlite with bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;

pub use operations::{
    delete_record, delete_user, insert_import_log, insert_record, insert_user, now_timestamp,
    set_record_status, set_user_role, update_record, upsert_record, ImportLog, OperationError,
    UpsertOutcome, UserAccount,
};
pub use queries::{
    catalog_stats, count_users, find_record, find_user, list_import_logs, list_records,
    list_users, records_by_submitter, CatalogStats,
};
pub use schema::{open_database, open_memory, SchemaError};
