//! The explicit catalog state container.
//!
//! Holds one kind's normalized records and the active criteria. The view
//! engine stays stateless: every [`CatalogState::view`] call recomputes from
//! the current records.

use rmgd_catalog::{compute_view_records, normalize_all, CatalogView, FilterCriteria, Record};
use rmgd_core::RecordKind;
use serde_json::Value;

use crate::source::{RecordSource, SourceError};

#[derive(Debug, Clone)]
pub struct CatalogState {
    kind: RecordKind,
    records: Vec<Record>,
    criteria: FilterCriteria,
}

impl CatalogState {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
            criteria: FilterCriteria::default(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Replace the whole collection with raw records.
    pub fn load(&mut self, raws: &[Value]) {
        self.records = normalize_all(raws);
    }

    /// Refetch wholesale from `source`. On failure the current records are kept.
    pub fn refresh<S: RecordSource + ?Sized>(&mut self, source: &S) -> Result<usize, SourceError> {
        let raws = source.fetch(self.kind)?;
        self.load(&raws);
        log::debug!("Loaded {} {}", self.records.len(), self.kind);
        Ok(self.records.len())
    }

    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Add a newly created record at the end, or replace it in place if the
    /// id is already present.
    pub fn insert(&mut self, record: Record) {
        if !self.replace(record.clone()) {
            self.records.push(record);
        }
    }

    /// Replace the record with the same id. Returns `false` if none exists.
    pub fn replace(&mut self, record: Record) -> bool {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Remove a record by id.
    pub fn remove(&mut self, id: &str) -> Option<Record> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }

    /// Keep only the records for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Record) -> bool) {
        self.records.retain(keep);
    }

    /// Recompute the filtered list and aggregates.
    pub fn view(&self) -> CatalogView {
        compute_view_records(&self.records, &self.criteria)
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
