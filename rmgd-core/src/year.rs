//! Release-year parsing.
//!
//! Years are stored as free text. Only values that parse to an integer inside
//! the catalog's era count as known; everything else is "Unknown" for
//! aggregation and never satisfies a numeric range filter.

/// First year covered by the catalog.
pub const MIN_YEAR: i32 = 1975;
/// Last year covered by the catalog.
pub const MAX_YEAR: i32 = 2008;
/// Records released before this year are "vintage".
pub const VINTAGE_CUTOFF: i32 = 2000;

/// Parse a stored year string.
///
/// Leading whitespace is skipped and the leading run of ASCII digits is read,
/// so `"1997"`, `" 1997 "` and `"1997 (JP)"` all yield 1997. Returns `None`
/// for non-numeric text and for years outside `MIN_YEAR..=MAX_YEAR`.
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let digits_end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..digits_end];
    if digits.is_empty() || digits.len() > 4 {
        return None;
    }
    let year: i32 = digits.parse().ok()?;
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

/// First year of the decade containing `year` (1997 → 1990).
pub fn decade_of(year: i32) -> i32 {
    year - year.rem_euclid(10)
}
