// Test utilities available to both unit and integration tests
// Only compiled when testing

use chrono::{NaiveDate, NaiveTime};

use crate::config::ValidatorConfig;
use crate::row_validator::{Entry, RawRow};

/// Build raw rows numbered like a sheet with a header (first data row is 2)
#[allow(dead_code)]
pub fn sheet_rows(cells: &[(&str, &str, &str)]) -> Vec<RawRow> {
    cells
        .iter()
        .enumerate()
        .map(|(i, (date, start, end))| RawRow::new(i + 2, date, start, end))
        .collect()
}

/// Build a valid entry from ISO date and `HH:MM` times
#[allow(dead_code)]
pub fn entry(row_index: usize, date: &str, start: &str, end: &str) -> Entry {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    let start = NaiveTime::parse_from_str(start, "%H:%M").unwrap();
    let end = NaiveTime::parse_from_str(end, "%H:%M").unwrap();
    Entry::new(row_index, date, start, end).unwrap()
}

/// Default configuration with the band overlap treated as a note
#[allow(dead_code)]
pub fn lenient_config() -> ValidatorConfig {
    ValidatorConfig {
        band_overlap_is_error: false,
        ..Default::default()
    }
}
