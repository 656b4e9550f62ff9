mod datetime;
mod filesystem;
mod string;

pub use datetime::{excel_serial_to_chrono, get_local_datetime_with_format, get_utc_iso_datetime};
pub use filesystem::write_error_to_log;
pub use string::normalize_cell_text;
