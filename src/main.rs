// reset; cargo run -- --input-file ./MisHorasExtras.xlsm
// reset; cargo run -- --input-file ./horas.csv --band-start 08:00 --band-end 17:00 --locale en

mod logging;

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use clap::Parser;
use overtime_lib::{
    config::DEFAULT_SHEET_NAME, utils::get_local_datetime_with_format, ParseLocale,
    ReferenceBand, TimesheetValidatorBuilder, ValidatorConfig, ERRORS_LOG_FILE,
};

#[derive(Parser, Debug)]
#[command(name = "overtime-checker")]
#[command(about = "Validates an overtime sheet: field formats, overlaps and gaps between entries")]
#[command(version)]
struct Args {
    /// Workbook (.xlsx/.xlsm) or CSV file with date, start and end columns
    #[arg(short, long)]
    input_file: PathBuf,

    /// Worksheet holding the entries (workbooks only)
    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    sheet_name: String,

    /// JSON file with the validator configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Accepted date/time patterns and weekday names: "es" or "en"
    #[arg(long)]
    locale: Option<String>,

    /// Start of the ordinary working band, HH:MM
    #[arg(long, value_parser = parse_band_time)]
    band_start: Option<NaiveTime>,

    /// End of the ordinary working band, HH:MM
    #[arg(long, value_parser = parse_band_time)]
    band_end: Option<NaiveTime>,

    /// Treat entries overlapping the band as a note instead of an error
    #[arg(long)]
    band_overlap_is_info: bool,

    /// Where to write the per-row results. Defaults to a timestamped file next to the input.
    #[arg(short, long)]
    output_csv: Option<PathBuf>,

    /// Errors log file
    #[arg(long, default_value = ERRORS_LOG_FILE)]
    error_log: PathBuf,

    /// Print the full report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_band_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value.trim(), "%H:%M:%S"))
        .map_err(|e| format!("'{value}' is not a HH:MM time: {e}"))
}

/// Configuration file first, then command line overrides
fn resolve_config(args: &Args) -> Result<ValidatorConfig, anyhow::Error> {
    let mut config = match &args.config {
        Some(path) => ValidatorConfig::from_json_file(path)?,
        None => ValidatorConfig::default(),
    };

    if let Some(code) = &args.locale {
        config.locale = ParseLocale::from_code(code)
            .ok_or_else(|| anyhow::anyhow!("Unknown locale '{code}' (expected 'es' or 'en')"))?;
    }

    if args.band_start.is_some() || args.band_end.is_some() {
        config.band = ReferenceBand::new(
            args.band_start.unwrap_or(config.band.start),
            args.band_end.unwrap_or(config.band.end),
        )?;
    }

    if args.band_overlap_is_info {
        config.band_overlap_is_error = false;
    }

    Ok(config)
}

fn default_output_path(input_file: &Path) -> PathBuf {
    let timestamp = get_local_datetime_with_format("%Y-%m-%d_%H-%M-%S");
    let stem = input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("horas");
    let filename = format!("{stem}_resultado_{timestamp}.csv").to_lowercase();
    input_file.with_file_name(filename)
}

/// Status lines go to stderr when stdout carries the JSON report
fn write_status(
    line: &str,
    json: bool,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> std::io::Result<()> {
    if json {
        writeln!(stderr, "{line}")
    } else {
        writeln!(stdout, "{line}")
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let arguments = Args::parse();
    logging::init(if arguments.verbose { "debug" } else { "info" });

    let config = resolve_config(&arguments)?;
    tracing::debug!(?config, "resolved configuration");

    let mut validator = TimesheetValidatorBuilder::new(&arguments.input_file, config)
        .sheet_name(&arguments.sheet_name)
        .error_log_path(&arguments.error_log)
        .build()?;

    let status = |line: String| {
        let _ = write_status(
            &line,
            arguments.json,
            &mut std::io::stdout(),
            &mut std::io::stderr(),
        );
    };

    let had_errors = match validator.validate() {
        Ok(report) => {
            if arguments.json {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            if report.had_errors {
                eprintln!("{}", report.format_report());
                status(format!(
                    "❌ {} ({} row(s), {} consistency error(s))",
                    report.status_message(),
                    report.rows_with_errors().count(),
                    report.group_errors.len()
                ));
                eprintln!("❌ Check {} for details.", arguments.error_log.display());
            } else {
                status(format!("✅ {}", report.status_message()));
            }
            report.had_errors
        }
        Err(e) => {
            eprintln!("❌ Validation failed with error: {e}");
            std::process::exit(1);
        }
    };

    let csv_path = arguments
        .output_csv
        .clone()
        .unwrap_or_else(|| default_output_path(&arguments.input_file));
    match validator.export_to_csv(&csv_path) {
        Ok(_) => {
            status(format!("✅ Results written to: {}", csv_path.display()));
        }
        Err(e) => {
            eprintln!("❌ Failed to write results with error: {e}");
            std::process::exit(1);
        }
    }

    if had_errors {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["overtime-checker"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--input-file", "horas.xlsm"]);
        assert_eq!(args.sheet_name, "Entrada");
        assert_eq!(args.error_log, PathBuf::from(ERRORS_LOG_FILE));
        assert_eq!(resolve_config(&args).unwrap(), ValidatorConfig::default());
    }

    #[test]
    fn test_band_overrides() {
        let args = parse(&[
            "-i",
            "horas.csv",
            "--band-start",
            "08:00",
            "--band-overlap-is-info",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.band.start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(config.band.end, ReferenceBand::default().end);
        assert!(!config.band_overlap_is_error);
    }

    #[test]
    fn test_inverted_band_is_rejected() {
        let args = parse(&["-i", "horas.csv", "--band-start", "18:00", "--band-end", "08:00"]);
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_bad_band_time_fails_parsing() {
        let argv = ["overtime-checker", "-i", "horas.csv", "--band-start", "25:00"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_locale_override() {
        let args = parse(&["-i", "horas.csv", "--locale", "en"]);
        assert_eq!(resolve_config(&args).unwrap().locale, ParseLocale::english());

        let args = parse(&["-i", "horas.csv", "--locale", "xx"]);
        assert!(resolve_config(&args).is_err());
    }

    #[test]
    fn test_status_moves_to_stderr_with_json() {
        let (mut out, mut err) = (Vec::new(), Vec::new());
        write_status("✅ ok", true, &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "✅ ok\n");

        let (mut out, mut err) = (Vec::new(), Vec::new());
        write_status("✅ ok", false, &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "✅ ok\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_default_output_sits_next_to_input() {
        let path = default_output_path(Path::new("/tmp/data/MisHorasExtras.xlsm"));
        assert_eq!(path.parent(), Some(Path::new("/tmp/data")));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("mishorasextras_resultado_"));
        assert!(name.ends_with(".csv"));
    }
}
