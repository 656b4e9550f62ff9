use chrono::prelude::Local;
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub fn get_utc_iso_datetime() -> String {
    let timestamp = chrono::Utc::now().to_rfc3339();
    return timestamp;
}

// e.g. "%Y-%m-%d_%H-%M-%S" for file names
pub fn get_local_datetime_with_format(format: &str) -> String {
    return Local::now().format(format).to_string();
}

/// Convert an Excel serial number (days since 1899-12-30, fraction = time of day)
pub fn excel_serial_to_chrono(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let excel_base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = value.trunc() as i64;
    let seconds = ((value - days as f64) * 86400.0).round() as i64;
    excel_base.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}
