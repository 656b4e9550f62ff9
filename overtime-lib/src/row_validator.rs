use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::classifier::is_weekend;
use crate::config::ValidatorConfig;
use crate::error::ValidationError;
use crate::field_parser::{parse_date, parse_end_time, parse_start_time, weekday_label};

/// Separator used when a row's messages are written back as a single cell
pub const MESSAGE_SEPARATOR: &str = "; ";

/// One line of the source table, exactly as the collaborator read it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_index: usize,
    pub date_text: String,
    pub start_text: String,
    pub end_text: String,
}

impl RawRow {
    pub fn new(row_index: usize, date_text: &str, start_text: &str, end_text: &str) -> Self {
        RawRow {
            row_index,
            date_text: date_text.to_string(),
            start_text: start_text.to_string(),
            end_text: end_text.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.date_text.trim().is_empty()
            && self.start_text.trim().is_empty()
            && self.end_text.trim().is_empty()
    }
}

/// A validated work interval. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Entry {
    row_index: usize,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
}

impl Entry {
    /// Returns `None` unless `start < end`
    pub fn new(row_index: usize, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Option<Self> {
        if start >= end {
            return None;
        }
        Some(Entry {
            row_index,
            date,
            start,
            end,
        })
    }

    pub fn row_index(&self) -> usize {
        self.row_index
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }
}

/// Outcome of validating one row, ready to be written back next to it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RowReport {
    pub row_index: usize,
    pub weekday_label: Option<String>,
    pub errors: Vec<ValidationError>,
    /// Informational messages that do not count as errors
    pub notes: Vec<ValidationError>,
}

impl RowReport {
    pub fn new(row_index: usize) -> Self {
        RowReport {
            row_index,
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors first, then notes, in rule order
    pub fn messages(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().chain(self.notes.iter())
    }

    pub fn message_text(&self) -> String {
        self.messages()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(MESSAGE_SEPARATOR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub report: RowReport,
    pub entry: Option<Entry>,
}

/// Run the per-row rules in order: date, start, end, ordering, band overlap.
///
/// A failed rule only skips the rules that need its value. The entry is built
/// only when no error was recorded.
pub fn validate_row(row: &RawRow, config: &ValidatorConfig) -> RowOutcome {
    let locale = &config.locale;
    let mut report = RowReport::new(row.row_index);

    let date = keep_ok(&mut report.errors, parse_date(&row.date_text, locale));
    if let Some(date) = date {
        report.weekday_label = Some(weekday_label(date, locale));
    }

    let start = keep_ok(&mut report.errors, parse_start_time(&row.start_text, locale));
    let end = keep_ok(&mut report.errors, parse_end_time(&row.end_text, locale));

    let ordered = match (start, end) {
        (Some(start), Some(end)) if start >= end => {
            report.errors.push(ValidationError::InvalidOrdering);
            false
        }
        (Some(_), Some(_)) => true,
        _ => false,
    };

    if let (Some(date), Some(start), Some(end), true) = (date, start, end, ordered) {
        if !is_weekend(date) && config.band.overlaps(start, end) {
            let time_format = locale.display_time_format();
            let message = ValidationError::BandOverlap {
                band_start: config.band.start.format(time_format).to_string(),
                band_end: config.band.end.format(time_format).to_string(),
            };
            if config.band_overlap_is_error {
                report.errors.push(message);
            } else {
                report.notes.push(message);
            }
        }
    }

    let entry = match (date, start, end) {
        (Some(date), Some(start), Some(end)) if report.errors.is_empty() => {
            Entry::new(row.row_index, date, start, end)
        }
        _ => None,
    };

    if report.has_errors() {
        tracing::debug!(
            row = row.row_index,
            messages = %report.message_text(),
            "row failed validation"
        );
    } else {
        tracing::trace!(row = row.row_index, "row is valid");
    }

    RowOutcome { report, entry }
}

fn keep_ok<T>(errors: &mut Vec<ValidationError>, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}
