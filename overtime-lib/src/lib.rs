#![allow(clippy::needless_return)]

mod batch;
mod classifier;
pub mod config;
mod consistency;
mod error;
mod field_parser;
mod row_validator;
mod timesheet;
pub mod utils;

// Test utilities - only compiled when testing or with test feature
// #[cfg(test)] alone doesn't work for integration tests (they're external crates)
// The feature flag makes it available to integration tests via dev-dependencies
#[cfg(any(test, feature = "test"))]
pub mod test_utils;

pub use batch::{BatchReport, STATUS_OK, STATUS_WITH_ERRORS, group_entries, validate_batch};
pub use classifier::{AnalysisGroup, classify, is_weekend};
pub use config::{ConfigError, ParseLocale, ReferenceBand, ValidatorConfig};
pub use consistency::check_group;
pub use error::ValidationError;
pub use field_parser::{parse_date, parse_end_time, parse_start_time, parse_time, weekday_label};
pub use row_validator::{Entry, MESSAGE_SEPARATOR, RawRow, RowOutcome, RowReport, validate_row};
pub use timesheet::{EXPORT_HEADERS, TimesheetValidator, TimesheetValidatorBuilder, read_rows};

pub const ERRORS_LOG_FILE: &str = "errors.log";
