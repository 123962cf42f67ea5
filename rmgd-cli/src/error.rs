use rmgd_catalog::YamlError;
use rmgd_core::{RecordKind, Role};
use rmgd_lib::{
    ImportError, ReportError, SessionError, SettingsError, SourceError, StorageError, SubmitError,
};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// No session
    #[error("Not signed in. Run 'rmgd login <username>' first")]
    NotSignedIn,

    /// The signed-in role lacks the needed capability
    #[error("Your role ({role}) is not allowed to {what}")]
    Forbidden { role: Role, what: String },

    #[error("No {kind} record with id '{id}'")]
    NotFound { kind: RecordKind, id: String },

    /// Failed to read an import file
    #[error("Failed to load {path}: {source}")]
    Load { path: String, source: YamlError },

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("{0}")]
    Submit(#[from] SubmitError),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn forbidden(role: Role, what: impl Into<String>) -> Self {
        Self::Forbidden {
            role,
            what: what.into(),
        }
    }

    pub(crate) fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
