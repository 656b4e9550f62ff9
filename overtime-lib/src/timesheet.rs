use std::path::{Path, PathBuf};

use anyhow::Result;
use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::batch::{BatchReport, validate_batch};
use crate::config::{DEFAULT_SHEET_NAME, ParseLocale, ValidatorConfig};
use crate::row_validator::RawRow;
use crate::utils::{excel_serial_to_chrono, normalize_cell_text, write_error_to_log};
use crate::ERRORS_LOG_FILE;

/// Header of the exported results file
pub const EXPORT_HEADERS: [&str; 6] = ["Fila", "Fecha", "Hora desde", "Hora hasta", "Dia", "Errores"];

/// Which column a cell comes from, so Excel serial values render sensibly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Date,
    Time,
}

pub struct TimesheetValidator {
    input_path: PathBuf,
    sheet_name: String,
    error_log_path: PathBuf,
    config: ValidatorConfig,
    rows: Vec<RawRow>,
    pub validation_report: Option<BatchReport>,
}

pub struct TimesheetValidatorBuilder {
    input_path: PathBuf,
    sheet_name: String,
    error_log_path: PathBuf,
    config: ValidatorConfig,
}

impl TimesheetValidatorBuilder {
    /// Create a new TimesheetValidatorBuilder
    ///
    /// # Arguments
    /// * `input_path` - Path to an `.xlsx`/`.xlsm` workbook or a `.csv` file
    /// * `config` - Locale, reference band and band-overlap policy
    pub fn new(input_path: impl AsRef<Path>, config: ValidatorConfig) -> Self {
        TimesheetValidatorBuilder {
            input_path: input_path.as_ref().to_path_buf(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            error_log_path: PathBuf::from(ERRORS_LOG_FILE),
            config,
        }
    }

    /// Worksheet to read from a workbook. Ignored for CSV input.
    pub fn sheet_name(mut self, sheet_name: &str) -> Self {
        self.sheet_name = sheet_name.to_string();
        self
    }

    pub fn error_log_path(mut self, path: impl AsRef<Path>) -> Self {
        self.error_log_path = path.as_ref().to_path_buf();
        self
    }

    /// Build the TimesheetValidator, reading every row up front
    pub fn build(self) -> Result<TimesheetValidator> {
        self.config.validate()?;

        let rows = read_rows(&self.input_path, &self.sheet_name, &self.config.locale)?;
        tracing::info!(
            input = %self.input_path.display(),
            rows = rows.len(),
            "timesheet rows loaded"
        );

        Ok(TimesheetValidator {
            input_path: self.input_path,
            sheet_name: self.sheet_name,
            error_log_path: self.error_log_path,
            config: self.config,
            rows,
            validation_report: None,
        })
    }
}

impl TimesheetValidator {
    //////////////////////////////////////////////////////////////
    ///  Public API
    //////////////////////////////////////////////////////////////

    /// Create a validator over rows already in memory (for testing only)
    #[cfg(any(test, feature = "test"))]
    pub fn from_rows(rows: Vec<RawRow>, config: ValidatorConfig, error_log_path: &Path) -> Self {
        TimesheetValidator {
            input_path: PathBuf::new(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            error_log_path: error_log_path.to_path_buf(),
            config,
            rows,
            validation_report: None,
        }
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// Run the validation engine over the loaded rows. Running it again
    /// replaces the previous report with an identical one.
    pub fn validate(&mut self) -> Result<&BatchReport> {
        if self.rows.is_empty() {
            return Err(anyhow::anyhow!(
                "The sheet '{}' of '{}' is empty or only has a header",
                self.sheet_name,
                self.input_path.display()
            ));
        }

        let report = validate_batch(&self.rows, &self.config);

        if report.had_errors {
            if let Err(e) = write_error_to_log(
                &self.error_log_path,
                "Timesheet Validation Error Report",
                &report.format_report(),
            ) {
                tracing::warn!(
                    path = %self.error_log_path.display(),
                    error = %e,
                    "could not write the errors log"
                );
            }
        }

        Ok(&*self.validation_report.insert(report))
    }

    /// Export every row with its weekday label and messages
    pub fn export_to_csv(&self, csv_path: impl AsRef<Path>) -> Result<()> {
        let report = self
            .validation_report
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Run validate() before exporting results"))?;

        // Configure CSV writer to quote fields when necessary (e.g., when they contain commas)
        let mut wtr = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .from_path(csv_path.as_ref())?;

        wtr.write_record(EXPORT_HEADERS)?;

        for (row, row_report) in self.rows.iter().zip(&report.row_reports) {
            let row_index = row.row_index.to_string();
            let weekday = row_report.weekday_label.clone().unwrap_or_default();
            let messages = row_report.message_text();
            wtr.write_record([
                row_index.as_str(),
                row.date_text.as_str(),
                row.start_text.as_str(),
                row.end_text.as_str(),
                weekday.as_str(),
                messages.as_str(),
            ])?;
        }

        wtr.flush()?;

        Ok(())
    }
}

//////////////////////////////////////////////////////////////
///  Row sources
//////////////////////////////////////////////////////////////

/// Read date/start/end rows from a workbook or CSV file, chosen by extension
pub fn read_rows(path: &Path, sheet_name: &str, locale: &ParseLocale) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", path.display()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" => read_workbook_rows(path, sheet_name, locale),
        "csv" => read_csv_rows(path),
        other => Err(anyhow::anyhow!(
            "Unsupported file format '{}' (expected .xlsx, .xlsm or .csv)",
            other
        )),
    }
}

/// Columns A, B and C of `sheet_name`; row 1 is the header
fn read_workbook_rows(path: &Path, sheet_name: &str, locale: &ParseLocale) -> Result<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let range = match workbook.worksheet_range(sheet_name) {
        Ok(range) => range,
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Error reading sheet '{}': {}",
                sheet_name,
                e
            ));
        }
    };

    let (Some((start_row, _)), Some((end_row, _))) = (range.start(), range.end()) else {
        return Ok(Vec::new());
    };
    tracing::debug!(sheet = sheet_name, start_row, end_row, "worksheet range");

    let mut rows = Vec::new();
    for absolute_row in start_row.max(1)..=end_row {
        let cell = |col: u32| range.get_value((absolute_row, col));
        let row = RawRow {
            row_index: absolute_row as usize + 1,
            date_text: cell_to_text(cell(0), CellKind::Date, locale),
            start_text: cell_to_text(cell(1), CellKind::Time, locale),
            end_text: cell_to_text(cell(2), CellKind::Time, locale),
        };
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// First three columns of a CSV file with a header line
fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        // Physical line where the record starts; empty lines and multi-line
        // quoted fields are not records but still count
        let Some(line) = record.position().map(|position| position.line()) else {
            return Err(anyhow::anyhow!("CSV record without a position in {}", path.display()));
        };
        let field = |i: usize| normalize_cell_text(record.get(i).unwrap_or_default());
        let row = RawRow {
            row_index: line as usize,
            date_text: field(0),
            start_text: field(1),
            end_text: field(2),
        };
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(rows)
}

fn cell_to_text(cell: Option<&Data>, kind: CellKind, locale: &ParseLocale) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => normalize_cell_text(s),
        Some(Data::DateTime(dt)) => serial_to_text(dt.as_f64(), kind, locale),
        Some(Data::Float(f)) => serial_to_text(*f, kind, locale),
        Some(Data::Int(i)) => serial_to_text(*i as f64, kind, locale),
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Render a serial value with the locale's display format. Time columns keep
/// only the fraction of the day, so a full date-time serial reads like its
/// text form. Values that are not valid serials fall back to their plain
/// number, which later fails to parse as a date or time.
fn serial_to_text(value: f64, kind: CellKind, locale: &ParseLocale) -> String {
    let converted = match kind {
        CellKind::Date => excel_serial_to_chrono(value),
        CellKind::Time => excel_serial_to_chrono(value.fract()),
    };

    match (converted, kind) {
        (Some(dt), CellKind::Date) => dt.format(locale.display_date_format()).to_string(),
        (Some(dt), CellKind::Time) => dt.format(locale.display_time_format()).to_string(),
        (None, _) => value.to_string(),
    }
}
