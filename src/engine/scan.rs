//! Directory listing for the batch engines.
//!
//! Only the immediate children of a directory are considered. Entries are
//! sorted by file name so numbering and merge order do not depend on the
//! platform's listing order.

use globset::{GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, ToolkitError};

/// Matches `*.pdf` regardless of case.
fn pdf_matcher() -> Result<GlobMatcher> {
    let glob = GlobBuilder::new("*.pdf")
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map_err(|e| ToolkitError::unexpected(format!("invalid PDF pattern: {e}")))?;
    Ok(glob.compile_matcher())
}

/// List the `.pdf` files directly inside `dir`, sorted by name.
///
/// # Errors
///
/// Returns [`ToolkitError::FileNotFound`] for a missing directory, and
/// [`ToolkitError::Permission`] or [`ToolkitError::Io`] if it cannot be read.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let matcher = pdf_matcher()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            ToolkitError::io(path, source)
        })?;

        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(dir = %dir.display(), count = files.len(), "listed PDF files");
    Ok(files)
}
