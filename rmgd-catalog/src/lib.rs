//! Catalog View Engine: canonical record model, normalization of loosely
//! shaped input, filter predicates, aggregation and the combined view.
//!
//! Everything in this crate is pure and synchronous. Fetching, persistence
//! and presentation live in `rmgd-db`, `rmgd-lib` and the CLI.

pub mod aggregate;
pub mod filter;
pub mod normalize;
pub mod types;
pub mod view;
pub mod yaml;

pub use aggregate::{
    aggregate, count_by_field, decade_histogram, documentation_rate, top_n, vintage_ratio,
    AggregateResult, GroupField, Grouped, TOP_N, UNKNOWN,
};
pub use filter::{filter, matches, FilterCriteria};
pub use normalize::{normalize, normalize_all, placeholder_id, Field, FIELD_KEYS};
pub use types::{Record, RecordPatch};
pub use view::{compute_view, compute_view_records, CatalogView};
pub use yaml::{extract_records, load_records_file, load_seed_dir, YamlError};
