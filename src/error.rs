//! Error types for pdf-toolkit.
//!
//! Every failure an engine can report is a [`ToolkitError`]. Each variant
//! carries enough context to build the user-facing [`Outcome`](crate::outcome::Outcome)
//! and belongs to exactly one [`ErrorKind`] of the failure taxonomy.
//!
//! # Error Categories
//!
//! - **Input Errors**: missing files, blank names, bad page ranges
//! - **PDF Errors**: wrong extension, unparseable or encrypted documents
//! - **Collision Errors**: outputs that already exist or shadow an input
//! - **I/O Errors**: the operating system rejected a write or rename

use serde::Serialize;
use std::io;
use std::path::PathBuf;

use crate::password::SkipReason;
use crate::ranges::PageRangeError;
use crate::validation::ValidationStatus;

/// Result type alias for pdf-toolkit operations.
pub type Result<T> = std::result::Result<T, ToolkitError>;

/// Coarse classification of a failure, stable across message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced file or directory does not exist.
    NotFound,
    /// Empty input, blank name, missing location or a bad page range.
    InvalidInput,
    /// The path does not carry a `.pdf` extension.
    NotAPdf,
    /// The document could not be parsed.
    Corrupted,
    /// The document is encrypted and was skipped.
    EncryptedSkipped,
    /// The document is encrypted and nobody could be asked for a password.
    EncryptedNoCallback,
    /// The document rejected the supplied password.
    EncryptedWrongPassword,
    /// An output already exists or equals an input.
    Collision,
    /// The operating system denied access.
    Permission,
    /// Any other filesystem failure.
    IoFailure,
    /// A merge finished without a single usable input.
    NothingToMerge,
    /// Anything not classified above.
    Unexpected,
}

impl ErrorKind {
    /// Get the exit code for this kind of failure.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::InvalidInput => 1,
            Self::NotFound => 2,
            Self::NotAPdf | Self::Corrupted => 3,
            Self::EncryptedSkipped | Self::EncryptedNoCallback | Self::EncryptedWrongPassword => 3,
            Self::Collision => 4,
            Self::Permission | Self::IoFailure => 5,
            Self::NothingToMerge => 6,
            Self::Unexpected => 70,
        }
    }
}

/// Main error type for pdf-toolkit operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolkitError {
    #[error("No input files selected.")]
    NoFiles,

    #[error("{message}")]
    InvalidName { message: String },

    #[error("The specified directory does not exist: {}", path.display())]
    InvalidDirectory { path: PathBuf },

    #[error("The specified directory does not exist: {}", path.display())]
    InvalidOutputDirectory { path: PathBuf },

    #[error("The output location does not exist: {}", path.display())]
    InvalidOutputPath { path: PathBuf },

    #[error("No PDF files inside the input directory: {}", path.display())]
    EmptyDirectory { path: PathBuf },

    #[error("The original file does not exist: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Selected file is not a PDF: {}", path.display())]
    NotAPdfFile { path: PathBuf },

    #[error("{} is {detail}", path.display())]
    InvalidPdf {
        path: PathBuf,
        status: ValidationStatus,
        detail: String,
    },

    #[error(transparent)]
    InvalidPageRange(#[from] PageRangeError),

    #[error("The output file is also one of the inputs: {}", path.display())]
    DuplicateFile { path: PathBuf },

    #[error("File '{name}' already exists in the output directory.")]
    FileExists { name: String },

    #[error("{} is encrypted and was skipped", path.display())]
    EncryptedSkipped { path: PathBuf, reason: SkipReason },

    #[error("The password for {} was not accepted", path.display())]
    WrongPassword { path: PathBuf },

    #[error("None of the selected files could be merged.")]
    NothingToMerge,

    #[error("Permission denied: {}", path.display())]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Operating system error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("PDF processing failed: {reason}")]
    Library { reason: String },

    #[error("{message}")]
    Unexpected { message: String },
}

impl From<lopdf::Error> for ToolkitError {
    fn from(err: lopdf::Error) -> Self {
        Self::library(err.to_string())
    }
}

impl ToolkitError {
    /// Create an InvalidName error.
    pub fn invalid_name(message: impl Into<String>) -> Self {
        Self::InvalidName {
            message: message.into(),
        }
    }

    /// Create a FileExists error for an output name.
    pub fn file_exists(name: impl Into<String>) -> Self {
        Self::FileExists { name: name.into() }
    }

    /// Create a Library error.
    pub fn library(reason: impl Into<String>) -> Self {
        Self::Library {
            reason: reason.into(),
        }
    }

    /// Create an Unexpected error with a custom message.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Classify an I/O error raised while touching `path`.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::Permission { path, source },
            io::ErrorKind::NotFound => Self::FileNotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Get the taxonomy entry for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFiles
            | Self::InvalidName { .. }
            | Self::InvalidOutputPath { .. }
            | Self::EmptyDirectory { .. }
            | Self::InvalidPageRange(_) => ErrorKind::InvalidInput,
            Self::InvalidDirectory { .. }
            | Self::InvalidOutputDirectory { .. }
            | Self::FileNotFound { .. } => ErrorKind::NotFound,
            Self::NotAPdfFile { .. } => ErrorKind::NotAPdf,
            Self::InvalidPdf { status, .. } => match status {
                ValidationStatus::NotPdf => ErrorKind::NotAPdf,
                ValidationStatus::Encrypted => ErrorKind::EncryptedSkipped,
                _ => ErrorKind::Corrupted,
            },
            Self::DuplicateFile { .. } | Self::FileExists { .. } => ErrorKind::Collision,
            Self::EncryptedSkipped { reason, .. } => match reason {
                SkipReason::NoPrompt => ErrorKind::EncryptedNoCallback,
                SkipReason::Policy | SkipReason::User => ErrorKind::EncryptedSkipped,
            },
            Self::WrongPassword { .. } => ErrorKind::EncryptedWrongPassword,
            Self::NothingToMerge => ErrorKind::NothingToMerge,
            Self::Permission { .. } => ErrorKind::Permission,
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::Library { .. } | Self::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// Short title shown above the message.
    pub fn title(&self) -> &'static str {
        match self {
            Self::NoFiles => "No files",
            Self::InvalidName { .. } => "Invalid name",
            Self::InvalidDirectory { .. } => "Invalid directory",
            Self::InvalidOutputDirectory { .. } => "Invalid output directory",
            Self::InvalidOutputPath { .. } => "Invalid output path",
            Self::EmptyDirectory { .. } => "Empty directory",
            Self::FileNotFound { .. } => "File Not Found",
            Self::NotAPdfFile { .. } => "Invalid file",
            Self::InvalidPdf { .. } => "Invalid PDF",
            Self::InvalidPageRange(_) => "Invalid page range",
            Self::DuplicateFile { .. } => "Duplicate file",
            Self::FileExists { .. } => "File Exists",
            Self::EncryptedSkipped { .. } => "Encrypted PDF",
            Self::WrongPassword { .. } => "Wrong password",
            Self::NothingToMerge => "Nothing to merge",
            Self::Permission { .. } => "Permission Error",
            Self::Io { .. } => "OS Error",
            Self::Library { .. } | Self::Unexpected { .. } => "Unexpected Error",
        }
    }

    /// Check if the user chose this outcome rather than running into it.
    ///
    /// Such failures are reported as warnings instead of errors.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::EncryptedSkipped {
                reason: SkipReason::Policy | SkipReason::User,
                ..
            }
        )
    }

    /// Check if the message may be shown to the user verbatim.
    ///
    /// Unclassified failures are replaced by a generic message.
    pub fn is_user_facing(&self) -> bool {
        self.kind() != ErrorKind::Unexpected
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
