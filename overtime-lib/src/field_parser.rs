//! Text to `chrono` values, driven by the patterns of a [`ParseLocale`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::ParseLocale;
use crate::error::ValidationError;

/// Earliest year accepted. `%Y` also reads short years, so `8/1/24` would
/// otherwise be year 24.
pub const MIN_YEAR: i32 = 1900;

/// Parse a calendar date. Date-time patterns are accepted and truncated to
/// their date, since spreadsheet cells often render dates with a midnight time.
pub fn parse_date(text: &str, locale: &ParseLocale) -> Result<NaiveDate, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::InvalidDate);
    }

    locale
        .date_formats
        .iter()
        .find_map(|format| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(text, format)
                        .ok()
                        .map(|date_time| date_time.date())
                })
                .filter(|date| date.year() >= MIN_YEAR)
        })
        .ok_or(ValidationError::InvalidDate)
}

/// Parse a time of day. Date-time patterns are accepted and reduced to their
/// time part. `None` means no pattern matched; [`parse_start_time`] and
/// [`parse_end_time`] turn that into the column-specific error.
pub fn parse_time(text: &str, locale: &ParseLocale) -> Option<NaiveTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    locale.time_formats.iter().find_map(|format| {
        NaiveTime::parse_from_str(text, format).ok().or_else(|| {
            NaiveDateTime::parse_from_str(text, format)
                .ok()
                .map(|date_time| date_time.time())
        })
    })
}

pub fn parse_start_time(text: &str, locale: &ParseLocale) -> Result<NaiveTime, ValidationError> {
    parse_time(text, locale).ok_or(ValidationError::InvalidStartTime)
}

pub fn parse_end_time(text: &str, locale: &ParseLocale) -> Result<NaiveTime, ValidationError> {
    parse_time(text, locale).ok_or(ValidationError::InvalidEndTime)
}

/// Weekday label for a valid date, taken from the locale's names
pub fn weekday_label(date: NaiveDate, locale: &ParseLocale) -> String {
    let index = date.weekday().num_days_from_monday() as usize;
    locale.weekday_names[index].clone()
}
