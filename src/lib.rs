//! pdf-toolkit: merge, split, extract and rename PDF files.
//!
//! The library exposes one engine per operation. Each engine takes explicit
//! inputs, validates them, performs its work through a [`io::PdfLibrary`]
//! and reports back with an [`Outcome`]. Engines never panic or return
//! errors to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use pdf_toolkit::engine::split_pdf;
//! use pdf_toolkit::io::LopdfLibrary;
//! use pdf_toolkit::password::{EncryptionPolicy, PasswordResolver};
//! use std::path::Path;
//!
//! let library = LopdfLibrary::new();
//! let mut resolver = PasswordResolver::new(EncryptionPolicy::Ask);
//! let outcome = split_pdf(
//!     &library,
//!     Path::new("report.pdf"),
//!     "1-3, 5",
//!     Path::new("out"),
//!     &mut resolver,
//! );
//! assert!(outcome.success, "{}", outcome.message);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod outcome;
pub mod output;
pub mod password;
pub mod preferences;
pub mod ranges;
pub mod validation;

pub use error::{ErrorKind, Result, ToolkitError};
pub use outcome::{Outcome, OutcomeData, Severity};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
