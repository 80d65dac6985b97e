//! Merge and batch-merge.
//!
//! Inputs are appended to one output document in order. A bad input does
//! not stop the merge: it is recorded in the [`MergeSummary`] and the loop
//! moves on. Only a failure to write the merged document aborts.

use std::fs;
use std::path::{Path, PathBuf};

use crate::engine::scan::list_pdfs;
use crate::engine::{Acquired, acquire, check_file_name, run_guarded};
use crate::error::{Result, ToolkitError};
use crate::io::PdfLibrary;
use crate::outcome::{MergeSummary, Outcome, OutcomeData, Severity};
use crate::password::{PasswordResolver, SkipReason};
use crate::validation::has_pdf_extension;

/// Merge `inputs`, in order, into a new PDF at `output`.
///
/// `output` is used as given; no extension is added.
pub fn merge_pdfs<L: PdfLibrary>(
    library: &L,
    inputs: &[PathBuf],
    output: &Path,
    resolver: &mut PasswordResolver<'_>,
) -> Outcome {
    run_guarded("merge", "merging PDFs", || {
        if inputs.is_empty() {
            return Err(ToolkitError::NoFiles);
        }
        check_output_path(output, inputs)?;

        let summary = merge_files(library, inputs, output, resolver)?;
        Ok(merge_outcome(summary, inputs.len()))
    })
}

/// Merge every PDF directly inside `input_dir` into `output_dir/new_name`.
///
/// Files are taken in file-name order. `.pdf` is appended to `new_name`
/// when missing, and `output_dir` defaults to `input_dir`.
pub fn batch_merge_pdfs<L: PdfLibrary>(
    library: &L,
    input_dir: &Path,
    new_name: &str,
    output_dir: Option<&Path>,
    resolver: &mut PasswordResolver<'_>,
) -> Outcome {
    run_guarded("batch_merge", "merging PDFs of a directory", || {
        if !input_dir.is_dir() {
            return Err(ToolkitError::InvalidDirectory {
                path: input_dir.to_path_buf(),
            });
        }
        let output_dir = output_dir.unwrap_or(input_dir);
        if !output_dir.is_dir() {
            return Err(ToolkitError::InvalidDirectory {
                path: output_dir.to_path_buf(),
            });
        }
        check_file_name(new_name)?;

        let inputs = list_pdfs(input_dir)?;
        if inputs.is_empty() {
            return Err(ToolkitError::NoFiles);
        }

        let output = output_dir.join(with_pdf_extension(new_name.trim()));
        check_output_path(&output, &inputs)?;

        let summary = merge_files(library, &inputs, &output, resolver)?;
        Ok(merge_outcome(summary, inputs.len()))
    })
}

/// Reject outputs that are blank, shadow an input, exist, or have no home.
fn check_output_path(output: &Path, inputs: &[PathBuf]) -> Result<()> {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().trim().to_string())
        .unwrap_or_default();
    if name.is_empty() {
        return Err(ToolkitError::invalid_name("The output file name is empty."));
    }
    if output.is_dir() {
        return Err(ToolkitError::invalid_name(format!(
            "The output path is a directory: {}",
            output.display()
        )));
    }

    if inputs.iter().any(|input| same_file(input, output)) {
        return Err(ToolkitError::DuplicateFile {
            path: output.to_path_buf(),
        });
    }

    if output.exists() {
        return Err(ToolkitError::file_exists(output.display().to_string()));
    }

    let parent = output.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent
        && !parent.is_dir()
    {
        return Err(ToolkitError::InvalidOutputPath {
            path: parent.to_path_buf(),
        });
    }

    Ok(())
}

/// Compare two paths, resolving them when both exist.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn with_pdf_extension(name: &str) -> String {
    if has_pdf_extension(Path::new(name)) {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}

/// Append each usable input and write the result.
///
/// Nothing is written when no input was usable.
fn merge_files<L: PdfLibrary>(
    library: &L,
    inputs: &[PathBuf],
    output: &Path,
    resolver: &mut PasswordResolver<'_>,
) -> Result<MergeSummary> {
    let mut merged = library.new_document();
    let mut summary = MergeSummary::default();

    for path in inputs {
        match acquire(library, path, resolver) {
            Acquired::Ready(doc) => match library.append(&mut merged, doc) {
                Ok(()) => summary.merged_files.push(path.clone()),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "could not append");
                    summary.invalid_files.push(path.clone());
                }
            },
            Acquired::Rejected(validation) => {
                tracing::debug!(path = %path.display(), status = %validation.status, "left out");
                summary.invalid_files.push(path.clone());
            }
            Acquired::Skipped(reason) => {
                if reason == SkipReason::NoPrompt {
                    tracing::debug!(path = %path.display(), "encrypted, no password prompt available");
                }
                summary.skipped_encrypted_files.push(path.clone());
            }
            Acquired::WrongPassword => summary.wrong_password_files.push(path.clone()),
        }
    }

    if summary.merged_files.is_empty() {
        return Ok(summary);
    }

    library.save(merged, output)?;
    summary.output = Some(output.to_path_buf());
    Ok(summary)
}

fn merge_outcome(summary: MergeSummary, total: usize) -> Outcome {
    if summary.output.is_none() {
        let err = ToolkitError::NothingToMerge;
        return Outcome::from_error(&err, "merging PDFs").with_data(OutcomeData::Merge(summary));
    }

    let left_out = summary.left_out();
    if left_out == 0 {
        return Outcome::success(
            "Success",
            "PDFs merged successfully!",
            OutcomeData::Merge(summary),
        );
    }

    let message = format!(
        "Merged {} of {total} PDFs. {left_out} file(s) were left out.",
        summary.merged_files.len()
    );
    Outcome::success("Success", message, OutcomeData::Merge(summary)).with_severity(Severity::Warning)
}
