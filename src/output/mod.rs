//! Output formatting and display for pdf-toolkit.
//!
//! Renders an [`Outcome`] for the terminal, either as readable text or as
//! a single JSON document for scripts.
//!
//! # Examples
//!
//! ```no_run
//! use pdf_toolkit::output::{OutputFormatter, display_outcome};
//! use pdf_toolkit::outcome::{Outcome, OutcomeData};
//!
//! let formatter = OutputFormatter::new(false, false);
//! let outcome = Outcome::success("Success", "PDFs merged successfully!", OutcomeData::None);
//! display_outcome(&formatter, &outcome);
//! ```

pub mod formatter;

pub use formatter::{OutputFormatter, Tone};

use std::path::PathBuf;

use crate::outcome::{MergeSummary, Outcome, OutcomeData};

/// Display an outcome and its per-file details.
pub fn display_outcome(formatter: &OutputFormatter, outcome: &Outcome) {
    let headline = format!("{}: {}", outcome.title, outcome.message);
    formatter.emit(outcome.severity.into(), &headline);

    match &outcome.data {
        OutcomeData::None => {}
        OutcomeData::Merge(summary) => display_merge_summary(formatter, summary),
        OutcomeData::Split(summary) => formatter.file_list("Created files:", &summary.files),
        OutcomeData::Rename(summary) => {
            if formatter.is_verbose() {
                formatter.file_list(
                    "Renamed:",
                    summary
                        .renamed
                        .iter()
                        .map(|(from, to)| format!("{} -> {}", from.display(), to.display())),
                );
            }
        }
    }
}

fn display_merge_summary(formatter: &OutputFormatter, summary: &MergeSummary) {
    if !summary.skipped_encrypted_files.is_empty() {
        formatter.warning(&format!(
            "Skipped encrypted PDFs: {}",
            join_paths(&summary.skipped_encrypted_files)
        ));
    }
    if !summary.wrong_password_files.is_empty() {
        formatter.warning(&format!(
            "PDFs with wrong passwords: {}",
            join_paths(&summary.wrong_password_files)
        ));
    }
    if !summary.invalid_files.is_empty() {
        formatter.warning(&format!(
            "Invalid PDFs: {}",
            join_paths(&summary.invalid_files)
        ));
    }
    if let Some(output) = &summary.output {
        formatter.debug(&format!(
            "{} file(s) merged into {}",
            summary.merged_files.len(),
            output.display()
        ));
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serialize an outcome for machine consumption.
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn outcome_json(outcome: &Outcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}
