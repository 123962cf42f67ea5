use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kind::RecordKind;

/// Lifecycle / inventory status of a catalog record.
///
/// Games use the moderation subset; devices also carry inventory states.
/// `Unknown` is what the normalizer produces for unrecognized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Pending,
    Approved,
    Rejected,
    Archived,
    Maintenance,
    Missing,
    OnLoan,
    Damaged,
    Unknown,
}

const ALL_STATUSES: &[RecordStatus] = &[
    RecordStatus::Active,
    RecordStatus::Pending,
    RecordStatus::Approved,
    RecordStatus::Rejected,
    RecordStatus::Archived,
    RecordStatus::Maintenance,
    RecordStatus::Missing,
    RecordStatus::OnLoan,
    RecordStatus::Damaged,
    RecordStatus::Unknown,
];

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Archived => "archived",
            Self::Maintenance => "maintenance",
            Self::Missing => "missing",
            Self::OnLoan => "on_loan",
            Self::Damaged => "damaged",
            Self::Unknown => "unknown",
        }
    }

    /// Lenient parse used by the normalizer: never fails.
    ///
    /// Blank input means the record predates moderation and is `Active`;
    /// anything unrecognized becomes `Unknown`.
    pub fn from_str_loose(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Self::Active;
        }
        trimmed.parse().unwrap_or(Self::Unknown)
    }

    /// Statuses a record of `kind` may be set to.
    pub fn allowed_for(kind: RecordKind) -> &'static [RecordStatus] {
        match kind {
            RecordKind::Games => &ALL_STATUSES[..5],
            RecordKind::Devices => &ALL_STATUSES[..9],
        }
    }

    pub fn is_allowed_for(&self, kind: RecordKind) -> bool {
        Self::allowed_for(kind).contains(self)
    }

    /// Whether records in this status are shown in public list views.
    pub fn is_public(&self) -> bool {
        !matches!(self, Self::Pending | Self::Rejected | Self::Archived)
    }

    pub fn all() -> &'static [RecordStatus] {
        ALL_STATUSES
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown status: '{0}'")]
pub struct StatusParseError(pub String);

impl std::str::FromStr for RecordStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase().replace(['-', ' '], "_");
        let lower = match lower.as_str() {
            "onloan" => "on_loan".to_string(),
            _ => lower,
        };
        ALL_STATUSES
            .iter()
            .copied()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| StatusParseError(s.to_string()))
    }
}
