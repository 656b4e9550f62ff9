use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::classifier::{AnalysisGroup, classify};
use crate::config::{ReferenceBand, ValidatorConfig};
use crate::consistency::check_group;
use crate::error::ValidationError;
use crate::row_validator::{Entry, RawRow, RowReport, validate_row};

pub const STATUS_OK: &str = "Proceso completado sin errores.";
pub const STATUS_WITH_ERRORS: &str = "Proceso completado con errores. Revise los mensajes de cada fila.";

/// Everything the collaborator needs to render one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// One report per input row, in input order
    pub row_reports: Vec<RowReport>,
    /// Entries that passed every row rule, in input order
    pub entries: Vec<Entry>,
    /// De-duplicated consistency messages across all groups
    pub group_errors: Vec<ValidationError>,
    pub had_errors: bool,
}

impl BatchReport {
    pub fn rows_with_errors(&self) -> impl Iterator<Item = &RowReport> {
        self.row_reports.iter().filter(|report| report.has_errors())
    }

    /// The aggregate block, one message per line
    pub fn aggregate_text(&self) -> String {
        self.group_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn status_message(&self) -> &'static str {
        if self.had_errors {
            STATUS_WITH_ERRORS
        } else {
            STATUS_OK
        }
    }

    /// Human readable summary used for the error log and the CLI
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=============================\n");
        report.push_str(&format!("Rows processed: {}\n", self.row_reports.len()));
        report.push_str(&format!("Valid entries: {}\n", self.entries.len()));
        report.push_str(&format!(
            "Rows with errors: {}\n\n",
            self.rows_with_errors().count()
        ));

        for row_report in &self.row_reports {
            if row_report.messages().next().is_none() {
                continue;
            }
            report.push_str(&format!(
                "Row {} ({}): {}\n",
                row_report.row_index,
                row_report.weekday_label.as_deref().unwrap_or("-"),
                row_report.message_text()
            ));
        }

        if !self.group_errors.is_empty() {
            report.push_str("\nConsistency errors:\n");
            for error in &self.group_errors {
                report.push_str(&format!("  - {}\n", error));
            }
        }

        report
    }
}

/// Split entries into analysis groups, keeping input order inside each group
pub fn group_entries(entries: &[Entry], band: &ReferenceBand) -> BTreeMap<AnalysisGroup, Vec<Entry>> {
    let mut groups: BTreeMap<AnalysisGroup, Vec<Entry>> = AnalysisGroup::ALL
        .into_iter()
        .map(|group| (group, Vec::new()))
        .collect();

    for entry in entries {
        for group in classify(entry, band) {
            groups.entry(group).or_default().push(*entry);
        }
    }

    groups
}

/// Validate every row, then check interval consistency inside each group.
///
/// Pure: the same rows and configuration always produce the same report.
pub fn validate_batch(rows: &[RawRow], config: &ValidatorConfig) -> BatchReport {
    let mut row_reports = Vec::with_capacity(rows.len());
    let mut entries = Vec::new();

    for row in rows {
        let outcome = validate_row(row, config);
        if let Some(entry) = outcome.entry {
            entries.push(entry);
        }
        row_reports.push(outcome.report);
    }

    let date_format = config.locale.display_date_format();
    let mut seen = HashSet::new();
    let mut group_errors = Vec::new();

    for (group, members) in group_entries(&entries, &config.band) {
        let errors = check_group(&members, date_format);
        if !errors.is_empty() {
            tracing::warn!(?group, count = errors.len(), "inconsistent intervals in group");
        }
        for error in errors {
            if seen.insert(error.to_string()) {
                group_errors.push(error);
            }
        }
    }

    let had_errors =
        row_reports.iter().any(RowReport::has_errors) || !group_errors.is_empty();

    tracing::info!(
        rows = rows.len(),
        entries = entries.len(),
        group_errors = group_errors.len(),
        had_errors,
        "batch validated"
    );

    BatchReport {
        row_reports,
        entries,
        group_errors,
        had_errors,
    }
}
