//! Split, extract and batch-split.
//!
//! All three turn one source document into several artifacts named after the
//! source: `<base>_page_<n>.pdf` for a single page and
//! `<base>_pages_<start>-<end>.pdf` for a run. The whole plan is checked for
//! name collisions before the first artifact is written, so a collision
//! leaves the output directory untouched.

use std::collections::HashSet;
use std::path::Path;

use crate::engine::{Acquired, acquire, run_guarded};
use crate::error::{Result, ToolkitError};
use crate::io::PdfLibrary;
use crate::outcome::{Outcome, OutcomeData, SplitSummary};
use crate::password::PasswordResolver;
use crate::ranges::{PageRange, PageRangeSet, parse_page_ranges};
use crate::validation::has_pdf_extension;

/// Split `file` into one document per range of `expression`.
pub fn split_pdf<L: PdfLibrary>(
    library: &L,
    file: &Path,
    expression: &str,
    output_dir: &Path,
    resolver: &mut PasswordResolver<'_>,
) -> Outcome {
    run_guarded("split", "splitting PDF", || {
        let (doc, ranges) = open_with_ranges(library, file, expression, output_dir, resolver)?;
        let files = write_artifacts(library, &doc, file, ranges.as_slice(), output_dir)?;

        let message = format!(
            "PDF successfully split into {} files and saved to {}.",
            files.len(),
            output_dir.display()
        );
        Ok(Outcome::success("Success", message, OutcomeData::Split(SplitSummary { files })))
    })
}

/// Extract the pages of `expression` from `file`, one document per range.
pub fn extract_pages<L: PdfLibrary>(
    library: &L,
    file: &Path,
    expression: &str,
    output_dir: &Path,
    resolver: &mut PasswordResolver<'_>,
) -> Outcome {
    run_guarded("extract", "extracting pages", || {
        let (doc, ranges) = open_with_ranges(library, file, expression, output_dir, resolver)?;
        let files = write_artifacts(library, &doc, file, ranges.as_slice(), output_dir)?;

        let message = format!(
            "Pages {ranges} were successfully extracted and saved to {}.",
            output_dir.display()
        );
        Ok(Outcome::success("Success", message, OutcomeData::Split(SplitSummary { files })))
    })
}

/// Split `file` into single-page documents.
///
/// `output_dir` defaults to the directory holding `file`.
pub fn batch_split_pdf<L: PdfLibrary>(
    library: &L,
    file: &Path,
    output_dir: Option<&Path>,
    resolver: &mut PasswordResolver<'_>,
) -> Outcome {
    run_guarded("batch_split", "splitting PDF into single pages", || {
        let output_dir = match output_dir {
            Some(dir) => dir,
            None => file
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new(".")),
        };

        let doc = open_source(library, file, output_dir, resolver)?;
        let total = u32::try_from(library.page_count(&doc))
            .map_err(|_| ToolkitError::unexpected("page count does not fit in u32"))?;
        let ranges: Vec<PageRange> = (1..=total).map(|n| PageRange::new(n, n)).collect();

        let files = write_artifacts(library, &doc, file, &ranges, output_dir)?;

        let message = format!(
            "PDF successfully split into {} single-page PDF files and saved to {}.",
            files.len(),
            output_dir.display()
        );
        Ok(Outcome::success("Success", message, OutcomeData::Split(SplitSummary { files })))
    })
}

/// Check the source and output directory, then open and unlock the source.
fn open_source<L: PdfLibrary>(
    library: &L,
    file: &Path,
    output_dir: &Path,
    resolver: &mut PasswordResolver<'_>,
) -> Result<L::Document> {
    if !file.is_file() {
        return Err(ToolkitError::FileNotFound {
            path: file.to_path_buf(),
        });
    }
    if !output_dir.is_dir() {
        return Err(ToolkitError::InvalidOutputDirectory {
            path: output_dir.to_path_buf(),
        });
    }
    if !has_pdf_extension(file) {
        return Err(ToolkitError::NotAPdfFile {
            path: file.to_path_buf(),
        });
    }

    match acquire(library, file, resolver) {
        Acquired::Ready(doc) => Ok(doc),
        Acquired::Rejected(validation) => Err(ToolkitError::InvalidPdf {
            path: file.to_path_buf(),
            status: validation.status,
            detail: validation.detail,
        }),
        Acquired::Skipped(reason) => Err(ToolkitError::EncryptedSkipped {
            path: file.to_path_buf(),
            reason,
        }),
        Acquired::WrongPassword => Err(ToolkitError::WrongPassword {
            path: file.to_path_buf(),
        }),
    }
}

fn open_with_ranges<L: PdfLibrary>(
    library: &L,
    file: &Path,
    expression: &str,
    output_dir: &Path,
    resolver: &mut PasswordResolver<'_>,
) -> Result<(L::Document, PageRangeSet)> {
    let doc = open_source(library, file, output_dir, resolver)?;
    let ranges = parse_page_ranges(expression, library.page_count(&doc))?;
    Ok((doc, ranges))
}

/// File name of the artifact holding `range` of `source`.
pub fn artifact_name(source: &Path, range: PageRange) -> String {
    let base = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    if range.is_single() {
        format!("{base}_page_{}.pdf", range.start)
    } else {
        format!("{base}_pages_{}-{}.pdf", range.start, range.end)
    }
}

/// Name every artifact, refuse on any collision, then write them all.
fn write_artifacts<L: PdfLibrary>(
    library: &L,
    doc: &L::Document,
    source: &Path,
    ranges: &[PageRange],
    output_dir: &Path,
) -> Result<Vec<String>> {
    let plan: Vec<(PageRange, String)> = ranges
        .iter()
        .map(|&range| (range, artifact_name(source, range)))
        .collect();

    let mut seen = HashSet::new();
    for (_, name) in &plan {
        if !seen.insert(name.as_str()) || output_dir.join(name).exists() {
            return Err(ToolkitError::file_exists(name.clone()));
        }
    }

    let mut files = Vec::with_capacity(plan.len());
    for (range, name) in plan {
        let artifact = library.extract(doc, range)?;
        library.save(artifact, &output_dir.join(&name))?;
        tracing::debug!(artifact = %name, "wrote artifact");
        files.push(name);
    }

    Ok(files)
}
