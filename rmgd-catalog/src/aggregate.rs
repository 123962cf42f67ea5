//! Aggregate statistics over a record set.
//!
//! Every computation is defined for the empty collection. Unknown or blank
//! values are counted under [`UNKNOWN`] rather than dropped, so grouped
//! counts always sum to the number of records.

use std::collections::{BTreeMap, HashMap};

use rmgd_core::{decade_of, VINTAGE_CUTOFF};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::types::Record;

/// Bucket for missing, blank or unparseable values.
pub const UNKNOWN: &str = "Unknown";
/// Length of the ranked lists in [`AggregateResult`].
pub const TOP_N: usize = 5;

/// Record field a count can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupField {
    Category,
    Maker,
    /// Parsed release year; out-of-era and non-numeric years are unknown.
    Year,
    Status,
    SubmittedBy,
}

impl GroupField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Maker => "maker",
            Self::Year => "year",
            Self::Status => "status",
            Self::SubmittedBy => "submittedBy",
        }
    }
}

/// Grouping key of `record` for `field`.
pub fn group_key(record: &Record, field: GroupField) -> String {
    let value = match field {
        GroupField::Category => record.category.trim().to_string(),
        GroupField::Maker => record.maker.trim().to_string(),
        GroupField::Year => record
            .parsed_year()
            .map(|y| y.to_string())
            .unwrap_or_default(),
        GroupField::Status => record.status.as_str().to_string(),
        GroupField::SubmittedBy => record
            .submitted_by
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_string(),
    };
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

/// Counts per distinct value, kept in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouped {
    entries: Vec<(String, usize)>,
}

impl Grouped {
    pub fn get(&self, key: &str) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// `(key, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for Grouped {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Count records per distinct value of `field`.
pub fn count_by_field(records: &[Record], field: GroupField) -> Grouped {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, usize)> = Vec::new();
    for record in records {
        let key = group_key(record, field);
        match index.get(&key) {
            Some(&i) => entries[i].1 += 1,
            None => {
                index.insert(key.clone(), entries.len());
                entries.push((key, 1));
            }
        }
    }
    Grouped { entries }
}

/// The `n` keys with the highest counts.
///
/// Ties keep first-seen order: entries are already in that order and the
/// sort is stable.
pub fn top_n(grouped: &Grouped, n: usize) -> Vec<(String, usize)> {
    let mut ranked = grouped.entries.clone();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Records per decade for every decade with at least one known year.
pub fn decade_histogram(records: &[Record]) -> BTreeMap<i32, usize> {
    let mut histogram = BTreeMap::new();
    for year in records.iter().filter_map(Record::parsed_year) {
        *histogram.entry(decade_of(year)).or_insert(0) += 1;
    }
    histogram
}

/// `part / total` as a whole percentage, rounded half up; 0 when `total` is 0.
fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part * 200 + total) / (total * 2)) as u32
}

/// Percentage of records with at least one image.
pub fn documentation_rate(records: &[Record]) -> u32 {
    let documented = records.iter().filter(|r| r.has_images()).count();
    percentage(documented, records.len())
}

/// Percentage of records with a known year before 2000.
pub fn vintage_ratio(records: &[Record]) -> u32 {
    let vintage = records
        .iter()
        .filter_map(Record::parsed_year)
        .filter(|&year| year < VINTAGE_CUTOFF)
        .count();
    percentage(vintage, records.len())
}

/// All overview and analytics statistics for one record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub total: usize,
    pub by_category: Grouped,
    pub by_maker: Grouped,
    pub by_year: Grouped,
    pub by_status: Grouped,
    pub by_contributor: Grouped,
    pub top_categories: Vec<(String, usize)>,
    pub top_makers: Vec<(String, usize)>,
    pub top_contributors: Vec<(String, usize)>,
    pub decades: BTreeMap<i32, usize>,
    pub unknown_year: usize,
    pub with_images: usize,
    pub documentation_rate: u32,
    pub vintage_ratio: u32,
}

/// Compute every aggregate over `records`.
pub fn aggregate(records: &[Record]) -> AggregateResult {
    let by_category = count_by_field(records, GroupField::Category);
    let by_maker = count_by_field(records, GroupField::Maker);
    let by_year = count_by_field(records, GroupField::Year);
    let by_status = count_by_field(records, GroupField::Status);
    let by_contributor = count_by_field(records, GroupField::SubmittedBy);

    AggregateResult {
        total: records.len(),
        top_categories: top_n(&by_category, TOP_N),
        top_makers: top_n(&by_maker, TOP_N),
        top_contributors: top_n(&by_contributor, TOP_N),
        unknown_year: by_year.get(UNKNOWN),
        decades: decade_histogram(records),
        with_images: records.iter().filter(|r| r.has_images()).count(),
        documentation_rate: documentation_rate(records),
        vintage_ratio: vintage_ratio(records),
        by_category,
        by_maker,
        by_year,
        by_status,
        by_contributor,
    }
}
