//! Input validation for pdf-toolkit.
//!
//! Classifies one candidate file into a [`ValidationStatus`]. The checks run
//! in a fixed order and stop at the first hit:
//! - extension (no parsing is attempted for a non-`.pdf` name)
//! - parse through the [`PdfLibrary`]
//! - encryption
//!
//! A document that fails to parse is corrupted even if it might also be
//! encrypted; only a document that parses can be reported as encrypted.
//!
//! # Examples
//!
//! ```no_run
//! use pdf_toolkit::io::LopdfLibrary;
//! use pdf_toolkit::validation::Validator;
//! use std::path::Path;
//!
//! let library = LopdfLibrary::new();
//! let validator = Validator::new(&library);
//! let result = validator.validate(Path::new("test.pdf"));
//! println!("{:?}: {}", result.status, result.detail);
//! ```

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::io::PdfLibrary;

/// Classification of a candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    Valid,
    NotPdf,
    Encrypted,
    Corrupted,
}

impl ValidationStatus {
    /// Human-readable explanation, empty for valid files.
    pub fn detail(self) -> &'static str {
        match self {
            Self::Valid => "",
            Self::NotPdf => "not a .pdf file",
            Self::Encrypted => "encrypted and cannot be processed",
            Self::Corrupted => "not a valid PDF or is corrupted",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Valid => "VALID",
            Self::NotPdf => "NOT_PDF",
            Self::Encrypted => "ENCRYPTED",
            Self::Corrupted => "CORRUPTED",
        };
        f.write_str(name)
    }
}

/// Result of validating a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    /// True only for [`ValidationStatus::Valid`].
    pub is_valid: bool,

    pub status: ValidationStatus,

    /// Why the file was rejected; empty when valid.
    pub detail: String,
}

impl From<ValidationStatus> for Validation {
    fn from(status: ValidationStatus) -> Self {
        Self {
            is_valid: status == ValidationStatus::Valid,
            status,
            detail: status.detail().to_string(),
        }
    }
}

/// Validation outcome that keeps the parsed document for the caller.
#[derive(Debug)]
pub enum Inspection<D> {
    /// Parsed and unencrypted.
    Valid(D),
    /// Parsed, but a password is required before use.
    Encrypted(D),
    /// Not usable at all.
    Rejected(Validation),
}

impl<D> Inspection<D> {
    /// Drop the document and keep the classification.
    pub fn into_validation(self) -> Validation {
        match self {
            Self::Valid(_) => ValidationStatus::Valid.into(),
            Self::Encrypted(_) => ValidationStatus::Encrypted.into(),
            Self::Rejected(validation) => validation,
        }
    }
}

/// Validator for candidate PDF files.
pub struct Validator<'a, L: PdfLibrary> {
    library: &'a L,
}

impl<'a, L: PdfLibrary> Validator<'a, L> {
    /// Create a validator using `library` to parse documents.
    pub fn new(library: &'a L) -> Self {
        Self { library }
    }

    /// Classify the file at `path`.
    ///
    /// Never fails; any parse problem is reported as
    /// [`ValidationStatus::Corrupted`].
    pub fn validate(&self, path: &Path) -> Validation {
        self.inspect(path).into_validation()
    }

    /// Classify the file at `path` and hand back the parsed document.
    ///
    /// Engines use this to avoid parsing every input twice.
    pub fn inspect(&self, path: &Path) -> Inspection<L::Document> {
        if !has_pdf_extension(path) {
            return Inspection::Rejected(ValidationStatus::NotPdf.into());
        }

        let doc = match self.library.open(path) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "rejected as corrupted");
                return Inspection::Rejected(ValidationStatus::Corrupted.into());
            }
        };

        if self.library.is_encrypted(&doc) {
            Inspection::Encrypted(doc)
        } else {
            Inspection::Valid(doc)
        }
    }
}

/// Check for a `.pdf` extension, ignoring case.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
