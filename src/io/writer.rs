//! PDF writing and saving operations.
//!
//! Documents are written to a sibling `.tmp` file first and then renamed
//! into place, so a failed save never leaves a truncated PDF behind under
//! the requested name.
//!
//! # Examples
//!
//! ```no_run
//! use pdf_toolkit::io::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(&mut doc, Path::new("output.pdf"))?;
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, ToolkitError};

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Compress streams before writing.
    pub compress: bool,

    /// Drop unreachable objects and renumber the rest.
    pub optimize: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            compress: true,
            optimize: true,
            buffer_size: 8192,
        }
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Save a PDF document to a file.
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::FileNotFound`] when the target directory is
    /// missing, and [`ToolkitError::Permission`] or [`ToolkitError::Io`] when
    /// the file cannot be written or moved into place.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<()> {
        if self.options.optimize {
            doc.prune_objects();
            doc.renumber_objects();
        }
        if self.options.compress {
            doc.compress();
        }

        let write_path = if self.options.atomic {
            temp_path(path)
        } else {
            path.to_path_buf()
        };

        let result = self.write_file(doc, &write_path);
        if result.is_err() && self.options.atomic {
            let _ = fs::remove_file(&write_path);
        }
        result?;

        if self.options.atomic {
            fs::rename(&write_path, path).map_err(|e| {
                let _ = fs::remove_file(&write_path);
                ToolkitError::io(path, e)
            })?;
        }

        tracing::debug!(path = %path.display(), "wrote PDF");
        Ok(())
    }

    fn write_file(&self, doc: &mut Document, write_path: &Path) -> Result<()> {
        let file = File::create(write_path).map_err(|e| ToolkitError::io(write_path, e))?;
        let mut writer = BufWriter::with_capacity(self.options.buffer_size, file);

        doc.save_to(&mut writer)
            .map_err(|e| ToolkitError::io(write_path, std::io::Error::other(e)))?;
        writer.flush().map_err(|e| ToolkitError::io(write_path, e))?;

        Ok(())
    }
}

/// `out.pdf` -> `out.pdf.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
