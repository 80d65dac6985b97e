//! Access to PDF documents.
//!
//! The engines never talk to lopdf directly. They go through the
//! [`PdfLibrary`] trait, which covers opening, encryption, page counting,
//! merging, range extraction and saving. [`LopdfLibrary`] is the production
//! implementation.
//!
//! # Examples
//!
//! ```no_run
//! use pdf_toolkit::io::{LopdfLibrary, PdfLibrary};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let library = LopdfLibrary::new();
//! let doc = library.open(Path::new("document.pdf"))?;
//! println!("{} pages", library.page_count(&doc));
//! # Ok(())
//! # }
//! ```

pub mod pages;
pub mod reader;
pub mod writer;

pub use reader::PdfReader;
pub use writer::{PdfWriter, WriteOptions};

use lopdf::Document;
use std::path::Path;

use crate::error::Result;
use crate::ranges::PageRange;

/// Capabilities the engines need from a PDF implementation.
pub trait PdfLibrary {
    /// An opened document.
    type Document;

    /// Open and parse the document at `path`.
    fn open(&self, path: &Path) -> Result<Self::Document>;

    /// Check whether the document requires a password.
    fn is_encrypted(&self, doc: &Self::Document) -> bool;

    /// Unlock an encrypted document opened from `path`.
    ///
    /// Returns `Ok(false)` if `password` is rejected, and an error if the
    /// password was accepted but the document could not be decrypted.
    fn decrypt(&self, doc: &mut Self::Document, path: &Path, password: &str) -> Result<bool>;

    /// Number of pages in the document.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Create an empty document to merge into.
    fn new_document(&self) -> Self::Document;

    /// Append all pages of `source` to `target`.
    fn append(&self, target: &mut Self::Document, source: Self::Document) -> Result<()>;

    /// Copy the pages of `range` into a new document.
    fn extract(&self, source: &Self::Document, range: PageRange) -> Result<Self::Document>;

    /// Write the document to `path`.
    fn save(&self, doc: Self::Document, path: &Path) -> Result<()>;
}

/// [`PdfLibrary`] backed by lopdf.
#[derive(Debug, Clone, Default)]
pub struct LopdfLibrary {
    reader: PdfReader,
    writer: PdfWriter,
}

impl LopdfLibrary {
    /// Create a library with default reader and writer settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a library that saves with custom options.
    pub fn with_write_options(options: WriteOptions) -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::with_options(options),
        }
    }
}

impl PdfLibrary for LopdfLibrary {
    type Document = Document;

    fn open(&self, path: &Path) -> Result<Document> {
        self.reader.load(path)
    }

    fn is_encrypted(&self, doc: &Document) -> bool {
        doc.is_encrypted()
    }

    fn decrypt(&self, doc: &mut Document, path: &Path, password: &str) -> Result<bool> {
        self.reader.unlock(doc, path, password)
    }

    fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }

    fn new_document(&self) -> Document {
        pages::blank_document()
    }

    fn append(&self, target: &mut Document, source: Document) -> Result<()> {
        pages::append_document(target, source)
    }

    fn extract(&self, source: &Document, range: PageRange) -> Result<Document> {
        pages::extract_range(source, range)
    }

    fn save(&self, mut doc: Document, path: &Path) -> Result<()> {
        self.writer.save(&mut doc, path)
    }
}
