//! Overlap and gap detection between entries of the same group and date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::row_validator::Entry;

/// Check one analysis group. Dates are reported in ascending order, and
/// within a date entries are walked by start time (ties keep row order).
///
/// `date_format` is the `chrono` pattern used to render the date inside
/// each message.
pub fn check_group(entries: &[Entry], date_format: &str) -> Vec<ValidationError> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Entry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.date()).or_default().push(entry);
    }

    let mut errors = Vec::new();
    for (date, mut day_entries) in by_date {
        // Stable: equal starts stay in input order
        day_entries.sort_by_key(|entry| entry.start());
        let date_text = date.format(date_format).to_string();

        for pair in day_entries.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);

            if prev.end() > curr.start() {
                errors.push(ValidationError::IntervalOverlap {
                    date: date_text.clone(),
                });
            }

            if curr.start() > prev.end() {
                errors.push(ValidationError::IntervalGap {
                    date: date_text.clone(),
                });
            }
        }
    }

    errors
}
