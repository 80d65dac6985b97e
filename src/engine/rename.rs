//! Rename and batch-rename.
//!
//! Renaming never touches file contents, so the documents are only
//! validated, never rewritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::engine::scan::list_pdfs;
use crate::engine::{check_file_name, run_guarded};
use crate::error::{Result, ToolkitError};
use crate::io::PdfLibrary;
use crate::outcome::{Outcome, OutcomeData, RenameSummary};
use crate::validation::{ValidationStatus, Validator, has_pdf_extension};

/// Move `old_path` to `new_directory/new_name`, adding `.pdf` if missing.
///
/// Encrypted files may be renamed; only files that are not PDFs or cannot
/// be parsed are refused.
pub fn rename_pdf<L: PdfLibrary>(
    library: &L,
    old_path: &Path,
    new_directory: &Path,
    new_name: &str,
) -> Outcome {
    run_guarded("rename", "renaming PDF", || {
        if !old_path.is_file() {
            return Err(ToolkitError::FileNotFound {
                path: old_path.to_path_buf(),
            });
        }
        if !new_directory.is_dir() {
            return Err(ToolkitError::InvalidDirectory {
                path: new_directory.to_path_buf(),
            });
        }
        if !has_pdf_extension(old_path) {
            return Err(ToolkitError::NotAPdfFile {
                path: old_path.to_path_buf(),
            });
        }
        check_file_name(new_name)?;

        let validation = Validator::new(library).validate(old_path);
        if matches!(
            validation.status,
            ValidationStatus::NotPdf | ValidationStatus::Corrupted
        ) {
            return Err(ToolkitError::InvalidPdf {
                path: old_path.to_path_buf(),
                status: validation.status,
                detail: validation.detail,
            });
        }

        let name = ensure_pdf_suffix(new_name.trim());
        let new_path = new_directory.join(&name);
        if new_path.exists() {
            return Err(ToolkitError::file_exists(name));
        }

        move_file(old_path, &new_path)?;

        let message = format!("File renamed to '{name}' and moved to selected directory.");
        Ok(Outcome::success(
            "Success",
            message,
            OutcomeData::Rename(RenameSummary {
                renamed: vec![(old_path.to_path_buf(), new_path)],
            }),
        ))
    })
}

/// Rename every PDF in `input_dir` to `<base>_<n>.pdf`, numbered from 1.
///
/// Files are numbered in file-name order. Any file that does not validate
/// aborts the batch before anything is moved, as does any target name that
/// already exists. `output_dir` defaults to `input_dir`.
pub fn batch_rename_pdfs<L: PdfLibrary>(
    library: &L,
    input_dir: &Path,
    new_name: &str,
    output_dir: Option<&Path>,
) -> Outcome {
    run_guarded("batch_rename", "renaming PDFs of a directory", || {
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

        let base = strip_pdf_suffix(new_name.trim());
        check_file_name(base)?;

        let files = list_pdfs(input_dir)?;
        if files.is_empty() {
            return Err(ToolkitError::EmptyDirectory {
                path: input_dir.to_path_buf(),
            });
        }

        let validator = Validator::new(library);
        for file in &files {
            let validation = validator.validate(file);
            if !validation.is_valid {
                return Err(ToolkitError::InvalidPdf {
                    path: file.clone(),
                    status: validation.status,
                    detail: validation.detail,
                });
            }
        }

        let plan: Vec<(PathBuf, PathBuf)> = files
            .iter()
            .enumerate()
            .map(|(i, file)| (file.clone(), output_dir.join(format!("{base}_{}.pdf", i + 1))))
            .collect();

        for (_, target) in &plan {
            if target.exists() {
                let name = target
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                return Err(ToolkitError::file_exists(name));
            }
        }

        for (source, target) in &plan {
            move_file(source, target)?;
        }

        let message = format!(
            "{} PDF files renamed successfully in and/or moved to: {}.",
            plan.len(),
            output_dir.display()
        );
        Ok(Outcome::success(
            "Success",
            message,
            OutcomeData::Rename(RenameSummary { renamed: plan }),
        ))
    })
}

fn ensure_pdf_suffix(name: &str) -> String {
    if has_pdf_extension(Path::new(name)) {
        name.to_string()
    } else {
        format!("{name}.pdf")
    }
}

fn strip_pdf_suffix(name: &str) -> &str {
    let split = name.len().saturating_sub(4);
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(suffix)) if suffix.eq_ignore_ascii_case(".pdf") => stem,
        _ => name,
    }
}

/// Rename, falling back to copy and delete across filesystems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to).map_err(|e| ToolkitError::io(to, e))?;
            fs::remove_file(from).map_err(|e| ToolkitError::io(from, e))
        }
        Err(e) => Err(ToolkitError::io(from, e)),
    }
}
