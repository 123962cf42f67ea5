//! The Catalog View Engine: normalize, filter, aggregate.

use serde::Serialize;
use serde_json::Value;

use crate::aggregate::{aggregate, AggregateResult};
use crate::filter::{filter, FilterCriteria};
use crate::normalize::normalize_all;
use crate::types::Record;

/// Result of one view computation.
///
/// `aggregates` always describe the whole catalog; `filtered` is the subset
/// the user is currently looking at, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub filtered: Vec<Record>,
    pub total: usize,
    pub filtered_count: usize,
    pub aggregates: AggregateResult,
}

impl CatalogView {
    /// "Showing N of M" line for list headers.
    pub fn summary(&self) -> String {
        format!("Showing {} of {}", self.filtered_count, self.total)
    }
}

/// Build a view from raw, possibly legacy-shaped records.
pub fn compute_view(raw: &[Value], criteria: &FilterCriteria) -> CatalogView {
    let records = normalize_all(raw);
    compute_view_records(&records, criteria)
}

/// Build a view from records that are already normalized.
pub fn compute_view_records(records: &[Record], criteria: &FilterCriteria) -> CatalogView {
    let filtered = filter(records, criteria);
    CatalogView {
        total: records.len(),
        filtered_count: filtered.len(),
        filtered,
        aggregates: aggregate(records),
    }
}
