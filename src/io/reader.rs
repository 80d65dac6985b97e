//! PDF loading.
//!
//! Loading only parses the file; it never decides whether a document is
//! usable. That classification belongs to the validator.
//!
//! lopdf parses a document that needs a user password only as far as its
//! `Encrypt` dictionary. Every other object is read again from the file by
//! [`PdfReader::unlock`] once the password is known.

use lopdf::xref::XrefEntry;
use lopdf::{Document, Object, ObjectId, Reader};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::mem;
use std::path::Path;
use std::time::Instant;

use crate::error::{Result, ToolkitError};

/// PDF reader backed by lopdf.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load and parse a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns [`ToolkitError::FileNotFound`] when the path does not exist and
    /// [`ToolkitError::Library`] for anything lopdf refuses to parse.
    pub fn load(&self, path: &Path) -> Result<Document> {
        if !path.is_file() {
            return Err(ToolkitError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let start = Instant::now();
        let mut doc = Document::load(path).map_err(|e| {
            ToolkitError::library(format!("failed to parse {}: {e}", path.display()))
        })?;

        // Owner-password-only files are already decrypted with the empty user password.
        if doc.encryption_state.is_some() {
            tracing::debug!(path = %path.display(), "opened with the empty user password");
            strip_encryption(&mut doc);
        }

        tracing::trace!(
            path = %path.display(),
            objects = doc.objects.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "loaded PDF"
        );

        Ok(doc)
    }

    /// Decrypt `doc`, the result of [`PdfReader::load`] for `path`.
    ///
    /// Returns `Ok(false)` when `password` is rejected; `doc` is untouched
    /// in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read again or lopdf fails to
    /// decrypt an object.
    pub fn unlock(&self, doc: &mut Document, path: &Path, password: &str) -> Result<bool> {
        if let Err(e) = doc.authenticate_password(password) {
            tracing::debug!(path = %path.display(), error = %e, "password rejected");
            return Ok(false);
        }

        let buffer = fs::read(path).map_err(|e| ToolkitError::io(path, e))?;
        // Xref offsets count from the header, as in lopdf's own reader.
        let header = buffer.windows(5).position(|w| w == b"%PDF-").unwrap_or(0);

        let reader = Reader {
            buffer: &buffer[header..],
            document: mem::take(doc),
            encryption_state: None,
            raw_objects: BTreeMap::new(),
        };
        let objects = read_raw_objects(&reader);
        *doc = reader.document;
        for (id, object) in objects {
            doc.objects.entry(id).or_insert(object);
        }

        doc.decrypt(password).map_err(|e| {
            ToolkitError::library(format!("failed to decrypt {}: {e}", path.display()))
        })?;

        tracing::trace!(
            path = %path.display(),
            objects = doc.objects.len(),
            "decrypted PDF"
        );
        Ok(true)
    }
}

/// Parse every uncompressed object listed in the xref, still encrypted.
///
/// Objects inside object streams are expanded by `Document::decrypt`.
fn read_raw_objects(reader: &Reader<'_>) -> Vec<(ObjectId, Object)> {
    reader
        .document
        .reference_table
        .entries
        .iter()
        .filter_map(|(&number, entry)| match *entry {
            XrefEntry::Normal { generation, .. } => Some((number, generation)),
            _ => None,
        })
        .filter_map(|id| match reader.get_object(id, &mut HashSet::new()) {
            Ok(object) => Some((id, object)),
            Err(e) => {
                tracing::debug!(object = ?id, error = %e, "skipping unreadable object");
                None
            }
        })
        .collect()
}

/// Drop the `Encrypt` entry so the document is saved in the clear.
fn strip_encryption(doc: &mut Document) {
    if let Some(Object::Reference(id)) = doc.trailer.remove(b"Encrypt") {
        doc.objects.remove(&id);
    }
}
