//! Filter predicates over normalized records.
//!
//! Every criterion is optional; blank values impose no constraint. All
//! present criteria are ANDed.

use rmgd_core::RecordStatus;
use serde::{Deserialize, Serialize};

use crate::types::Record;

/// The set of active search/filter constraints chosen by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Case-insensitive substring over name, maker, description and id.
    #[serde(default)]
    pub search_text: Option<String>,
    /// Exact category match.
    #[serde(default)]
    pub category: Option<String>,
    /// Exact maker match.
    #[serde(default)]
    pub maker: Option<String>,
    /// First year of a decade; matches years in `[start, start + 9]`.
    #[serde(default)]
    pub decade_start: Option<i32>,
    #[serde(default)]
    pub status: Option<RecordStatus>,
    /// Exact contributor match, for "my submissions" views.
    #[serde(default)]
    pub submitted_by: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn maker(mut self, maker: impl Into<String>) -> Self {
        self.maker = Some(maker.into());
        self
    }

    pub fn decade(mut self, start: i32) -> Self {
        self.decade_start = Some(start);
        self
    }

    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn submitted_by(mut self, who: impl Into<String>) -> Self {
        self.submitted_by = Some(who.into());
        self
    }

    /// True when no criterion constrains the result.
    pub fn is_empty(&self) -> bool {
        active(&self.search_text).is_none()
            && active(&self.category).is_none()
            && active(&self.maker).is_none()
            && self.decade_start.is_none()
            && self.status.is_none()
            && active(&self.submitted_by).is_none()
    }
}

/// Trimmed criterion text, or `None` when blank.
fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Whether `record` satisfies every present criterion.
pub fn matches(record: &Record, criteria: &FilterCriteria) -> bool {
    if let Some(text) = active(&criteria.search_text) {
        let needle = text.to_lowercase();
        let hit = contains_ci(&record.name, &needle)
            || contains_ci(&record.maker, &needle)
            || contains_ci(&record.description, &needle)
            || contains_ci(&record.id, &needle);
        if !hit {
            return false;
        }
    }

    if let Some(category) = active(&criteria.category) {
        if record.category != category {
            return false;
        }
    }

    if let Some(maker) = active(&criteria.maker) {
        if record.maker != maker {
            return false;
        }
    }

    if let Some(start) = criteria.decade_start {
        match record.parsed_year() {
            Some(year) if (0..=9).contains(&(i64::from(year) - i64::from(start))) => {}
            _ => return false,
        }
    }

    if let Some(status) = criteria.status {
        if record.status != status {
            return false;
        }
    }

    if let Some(who) = active(&criteria.submitted_by) {
        if record.submitted_by.as_deref() != Some(who) {
            return false;
        }
    }

    true
}

/// Records matching `criteria`, in input order.
pub fn filter(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    records
        .iter()
        .filter(|record| matches(record, criteria))
        .cloned()
        .collect()
}
