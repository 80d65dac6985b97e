//! Operation engines.
//!
//! One entry point per user-facing operation. Every entry point returns an
//! [`Outcome`] and never panics or returns an error to its caller: the body
//! runs inside [`run_guarded`], which converts errors and caught panics into
//! failed outcomes after logging them.
//!
//! | Operation | Entry point |
//! |---|---|
//! | merge | [`merge_pdfs`] |
//! | batch-merge | [`batch_merge_pdfs`] |
//! | split | [`split_pdf`] |
//! | extract | [`extract_pages`] |
//! | batch-split | [`batch_split_pdf`] |
//! | rename | [`rename_pdf`] |
//! | batch-rename | [`batch_rename_pdfs`] |
//!
//! # Examples
//!
//! ```no_run
//! use pdf_toolkit::engine::merge_pdfs;
//! use pdf_toolkit::io::LopdfLibrary;
//! use pdf_toolkit::password::{EncryptionPolicy, PasswordResolver};
//! use std::path::{Path, PathBuf};
//!
//! let library = LopdfLibrary::new();
//! let mut resolver = PasswordResolver::new(EncryptionPolicy::Ask);
//! let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let outcome = merge_pdfs(&library, &inputs, Path::new("out.pdf"), &mut resolver);
//! println!("{}", outcome.message);
//! ```

pub mod merge;
pub mod rename;
pub mod scan;
pub mod split;

pub use merge::{batch_merge_pdfs, merge_pdfs};
pub use rename::{batch_rename_pdfs, rename_pdf};
pub use split::{batch_split_pdf, extract_pages, split_pdf};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::{Result, ToolkitError};
use crate::io::PdfLibrary;
use crate::outcome::Outcome;
use crate::password::{PasswordResolver, Resolution, SkipReason};
use crate::validation::{Inspection, Validation, ValidationStatus, Validator};

/// Run an engine body, turning every failure into an [`Outcome`].
///
/// `context` completes the sentence "an error occurred while ...".
pub(crate) fn run_guarded<F>(operation: &'static str, context: &str, body: F) -> Outcome
where
    F: FnOnce() -> Result<Outcome>,
{
    let span = tracing::info_span!("operation", name = operation);
    let _entered = span.enter();
    tracing::info!("operation started");

    let outcome = match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(err)) => Outcome::from_error(&err, context),
        Err(payload) => {
            tracing::error!(
                operation,
                panic = panic_message(payload.as_ref()),
                "operation panicked"
            );
            Outcome::unexpected(context)
        }
    };

    tracing::info!(
        success = outcome.success,
        title = %outcome.title,
        "operation finished"
    );
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// A candidate input after validation and, if needed, decryption.
pub(crate) enum Acquired<D> {
    /// Parsed and unlocked.
    Ready(D),
    /// Not a PDF or not parseable.
    Rejected(Validation),
    /// Encrypted and left out.
    Skipped(SkipReason),
    /// Encrypted and the supplied password did not unlock it.
    WrongPassword,
}

/// Validate `path` and route it through the resolver when encrypted.
pub(crate) fn acquire<L: PdfLibrary>(
    library: &L,
    path: &Path,
    resolver: &mut PasswordResolver<'_>,
) -> Acquired<L::Document> {
    match Validator::new(library).inspect(path) {
        Inspection::Valid(doc) => Acquired::Ready(doc),
        Inspection::Rejected(validation) => Acquired::Rejected(validation),
        Inspection::Encrypted(mut doc) => match resolver.resolve(path) {
            Resolution::Skipped(reason) => Acquired::Skipped(reason),
            Resolution::Password(password) => match library.decrypt(&mut doc, path, &password) {
                Ok(true) if library.page_count(&doc) > 0 => {
                    tracing::debug!(path = %path.display(), "decrypted");
                    Acquired::Ready(doc)
                }
                Ok(true) => {
                    tracing::warn!(path = %path.display(), "no pages left after decryption");
                    Acquired::Rejected(ValidationStatus::Corrupted.into())
                }
                Ok(false) => {
                    tracing::debug!(path = %path.display(), "wrong password");
                    Acquired::WrongPassword
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "decryption failed");
                    Acquired::Rejected(ValidationStatus::Corrupted.into())
                }
            },
        },
    }
}

/// Check whether `name` is a usable bare file name.
///
/// Blank names and names containing a directory component are rejected.
pub(crate) fn check_file_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ToolkitError::invalid_name("The new file name is empty."));
    }
    if Path::new(trimmed).file_name().and_then(|n| n.to_str()) != Some(trimmed) {
        return Err(ToolkitError::invalid_name(format!(
            "'{trimmed}' must be a file name, not a path."
        )));
    }
    Ok(())
}
