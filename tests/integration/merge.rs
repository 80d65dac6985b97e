//! Integration tests for merge and batch-merge on real PDFs.

use pdf_toolkit::engine::{batch_merge_pdfs, merge_pdfs};
use pdf_toolkit::io::LopdfLibrary;
use pdf_toolkit::password::{EncryptionPolicy, PasswordResolver};
use pdf_toolkit::{ErrorKind, Severity};
use std::fs;
use tempfile::TempDir;

use crate::common::{page_tags, write_corrupt, write_pdf};

#[test]
fn test_merge_keeps_input_order() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 2, "a");
    let b = write_pdf(dir.path(), "b.pdf", 1, "b");
    let output = dir.path().join("merged.pdf");

    let mut resolver = PasswordResolver::new(EncryptionPolicy::Ask);
    let outcome = merge_pdfs(&LopdfLibrary::new(), &[b, a], &output, &mut resolver);

    assert!(outcome.success, "{outcome}");
    assert_eq!(outcome.message, "PDFs merged successfully!");
    assert_eq!(page_tags(&output), ["b-1", "a-1", "a-2"]);
}

#[test]
fn test_merge_leaves_out_corrupt_inputs() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_corrupt(dir.path(), "0.pdf"),
        write_pdf(dir.path(), "1.pdf", 1, "one"),
        write_pdf(dir.path(), "2.pdf", 2, "two"),
        write_corrupt(dir.path(), "3.pdf"),
    ];
    let output = dir.path().join("merged.pdf");

    let mut resolver = PasswordResolver::new(EncryptionPolicy::Ask);
    let outcome = merge_pdfs(&LopdfLibrary::new(), &inputs, &output, &mut resolver);

    assert!(outcome.success, "{outcome}");
    assert_eq!(outcome.severity, Severity::Warning);
    assert_eq!(outcome.message, "Merged 2 of 4 PDFs. 2 file(s) were left out.");

    let summary = outcome.merge_summary().unwrap();
    assert_eq!(summary.merged_files, [inputs[1].clone(), inputs[2].clone()]);
    assert_eq!(summary.invalid_files, [inputs[0].clone(), inputs[3].clone()]);
    assert_eq!(page_tags(&output), ["one-1", "two-1", "two-2"]);
}

#[test]
fn test_merge_missing_input_is_invalid() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", 1, "a");
    let missing = dir.path().join("missing.pdf");
    let output = dir.path().join("merged.pdf");

    let mut resolver = PasswordResolver::new(EncryptionPolicy::Ask);
    let outcome = merge_pdfs(&LopdfLibrary::new(), &[a, missing.clone()], &output, &mut resolver);

    assert!(outcome.success, "{outcome}");
    assert_eq!(outcome.merge_summary().unwrap().invalid_files, [missing]);
}

#[test]
fn test_merge_nothing_usable_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![write_corrupt(dir.path(), "x.pdf"), write_corrupt(dir.path(), "y.pdf")];
    let output = dir.path().join("merged.pdf");

    let mut resolver = PasswordResolver::new(EncryptionPolicy::Ask);
    let outcome = merge_pdfs(&LopdfLibrary::new(), &inputs, &output, &mut resolver);

    assert!(!outcome.success);
    assert_eq!(outcome.kind, Some(ErrorKind::NothingToMerge));
    assert_eq!(outcome.merge_summary().unwrap().invalid_files.len(), 2);
    assert!(!output.exists());
}

#[test]
fn test_batch_merge_uses_file_name_order() {
    let input = TempDir::new().unwrap();
    write_pdf(input.path(), "c.pdf", 1, "c");
    write_pdf(input.path(), "a.pdf", 1, "a");
    write_pdf(input.path(), "b.PDF", 1, "b");
    fs::write(input.path().join("notes.txt"), "skip me").unwrap();
    let output = TempDir::new().unwrap();

    let mut resolver = PasswordResolver::new(EncryptionPolicy::Ask);
    let outcome = batch_merge_pdfs(
        &LopdfLibrary::new(),
        input.path(),
        "all",
        Some(output.path()),
        &mut resolver,
    );

    assert!(outcome.success, "{outcome}");
    assert_eq!(page_tags(&output.path().join("all.pdf")), ["a-1", "b-1", "c-1"]);
}

#[test]
fn test_batch_merge_refuses_existing_output() {
    let input = TempDir::new().unwrap();
    write_pdf(input.path(), "a.pdf", 1, "a");
    let existing = input.path().join("all.pdf");
    fs::write(&existing, "keep").unwrap();

    let mut resolver = PasswordResolver::new(EncryptionPolicy::Ask);
    let outcome = batch_merge_pdfs(&LopdfLibrary::new(), input.path(), "all", None, &mut resolver);

    assert!(!outcome.success);
    assert_eq!(outcome.kind, Some(ErrorKind::Collision));
    assert_eq!(fs::read_to_string(&existing).unwrap(), "keep");
}
