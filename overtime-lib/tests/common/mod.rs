use chrono::{Duration, NaiveDate, NaiveTime};
use overtime_lib::Entry;

// Re-export shared test utilities from src/test_utils.rs
pub use overtime_lib::test_utils::{entry, lenient_config, sheet_rows};

/// Monday 2024-01-08 plus `offset` days
#[allow(dead_code)]
pub fn date_from_offset(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 8).unwrap() + Duration::days(offset)
}

#[allow(dead_code)]
pub fn time_from_minutes(minutes: u32) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt(minutes * 60, 0).unwrap()
}

/// Entry from a day offset, a start minute and a duration in minutes
#[allow(dead_code)]
pub fn entry_from_parts(row_index: usize, day: i64, start: u32, duration: u32) -> Entry {
    Entry::new(
        row_index,
        date_from_offset(day),
        time_from_minutes(start),
        time_from_minutes(start + duration),
    )
    .unwrap()
}
