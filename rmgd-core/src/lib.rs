//! Core vocabulary shared by every RMGD crate: record kinds, statuses,
//! roles and their capability sets, and release-year parsing.

pub mod kind;
pub mod role;
pub mod status;
pub mod year;

pub use kind::{KindParseError, RecordKind};
pub use role::{Action, Capabilities, Role, RoleParseError, View};
pub use status::{RecordStatus, StatusParseError};
pub use year::{decade_of, parse_year, MAX_YEAR, MIN_YEAR, VINTAGE_CUTOFF};
