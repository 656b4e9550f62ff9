//! Tests for reading entries from .xlsx/.xlsm workbooks

use std::path::{Path, PathBuf};

use overtime_lib::{
    ParseLocale, RawRow, TimesheetValidatorBuilder, ValidatorConfig, read_rows,
};
use rust_xlsxwriter::{Workbook, XlsxError};
use tempfile::TempDir;

/// `Entrada` sheet with a header, a blank row, serial cells and an extra
/// column, plus an unrelated `Salida` sheet
fn build_workbook(path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();

    {
        let entrada = workbook.add_worksheet();
        entrada.set_name("Entrada")?;
        entrada.write_string(0, 0, "Fecha")?;
        entrada.write_string(0, 1, "Hora desde")?;
        entrada.write_string(0, 2, "Hora hasta")?;
        entrada.write_string(0, 3, "Detalle")?;

        // Sheet row 2: text cells
        entrada.write_string(1, 0, "08/01/2024")?;
        entrada.write_string(1, 1, "07:00")?;
        entrada.write_string(1, 2, "09:00")?;

        // Sheet row 3 left blank

        // Sheet row 4: serial date, serial time, full date-time serial
        entrada.write_number(3, 0, 45300.0)?;
        entrada.write_number(3, 1, 17.0 / 24.0)?;
        entrada.write_number(3, 2, 45300.0 + 19.0 / 24.0)?;
        entrada.write_string(3, 3, "not read")?;

        // Sheet row 5: missing end time
        entrada.write_string(4, 0, "13/01/2024")?;
        entrada.write_string(4, 1, "10:00")?;
    }

    {
        let salida = workbook.add_worksheet();
        salida.set_name("Salida")?;
        salida.write_string(0, 0, "Resumen")?;
    }

    workbook.save(path)
}

fn workbook_in(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    build_workbook(&path).unwrap();
    path
}

fn expected_rows() -> Vec<RawRow> {
    vec![
        RawRow::new(2, "08/01/2024", "07:00", "09:00"),
        RawRow::new(4, "09/01/2024", "17:00", "19:00"),
        RawRow::new(5, "13/01/2024", "10:00", ""),
    ]
}

#[test]
fn test_reads_columns_a_to_c_with_sheet_row_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let path = workbook_in(&dir, "horas.xlsx");

    let rows = read_rows(&path, "Entrada", &ParseLocale::spanish()).unwrap();
    assert_eq!(rows, expected_rows());
}

#[test]
fn test_xlsm_extension_is_read_as_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = workbook_in(&dir, "MisHorasExtras.xlsm");

    let rows = read_rows(&path, "Entrada", &ParseLocale::spanish()).unwrap();
    assert_eq!(rows, expected_rows());
}

#[test]
fn test_serial_cells_follow_the_locale() {
    let dir = tempfile::tempdir().unwrap();
    let path = workbook_in(&dir, "horas.xlsx");

    let rows = read_rows(&path, "Entrada", &ParseLocale::english()).unwrap();
    // Text cells are passed through untouched, serial cells use the locale
    assert_eq!(rows[1], RawRow::new(4, "01/09/2024", "17:00", "19:00"));
}

#[test]
fn test_missing_sheet_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = workbook_in(&dir, "horas.xlsx");

    let err = TimesheetValidatorBuilder::new(&path, ValidatorConfig::default())
        .sheet_name("Horas")
        .error_log_path(dir.path().join("errors.log"))
        .build()
        .err()
        .unwrap();
    assert!(err.to_string().contains("Error reading sheet 'Horas'"));
}

#[test]
fn test_workbook_validation_points_at_sheet_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = workbook_in(&dir, "horas.xlsx");

    let mut validator = TimesheetValidatorBuilder::new(&path, ValidatorConfig::default())
        .error_log_path(dir.path().join("errors.log"))
        .build()
        .unwrap();
    let report = validator.validate().unwrap();

    let failing: Vec<usize> = report.rows_with_errors().map(|r| r.row_index).collect();
    assert_eq!(failing, vec![5]);
    assert_eq!(report.row_reports[2].message_text(), "Hora hasta invalida");
    assert_eq!(report.row_reports[1].weekday_label.as_deref(), Some("martes"));
}
