//! Integration tests for rename and batch-rename.

use pdf_toolkit::ErrorKind;
use pdf_toolkit::engine::{batch_rename_pdfs, rename_pdf};
use pdf_toolkit::io::LopdfLibrary;
use std::fs;
use tempfile::TempDir;

use crate::common::{FakeLibrary, file_names, page_tags, write_corrupt, write_pdf};

#[test]
fn test_rename_moves_and_adds_extension() {
    let dir = TempDir::new().unwrap();
    let source = write_pdf(dir.path(), "scan.pdf", 2, "scan");
    let target_dir = TempDir::new().unwrap();

    let outcome = rename_pdf(&LopdfLibrary::new(), &source, target_dir.path(), "invoice");

    assert!(outcome.success, "{outcome}");
    assert_eq!(
        outcome.message,
        "File renamed to 'invoice.pdf' and moved to selected directory."
    );
    assert!(!source.exists());
    assert_eq!(page_tags(&target_dir.path().join("invoice.pdf")), ["scan-1", "scan-2"]);
}

#[test]
fn test_rename_refuses_existing_target() {
    let dir = TempDir::new().unwrap();
    let source = write_pdf(dir.path(), "scan.pdf", 1, "scan");
    fs::write(dir.path().join("taken.pdf"), "keep").unwrap();

    let outcome = rename_pdf(&LopdfLibrary::new(), &source, dir.path(), "taken.pdf");

    assert_eq!(outcome.title, "File Exists");
    assert!(source.exists());
    assert_eq!(fs::read_to_string(dir.path().join("taken.pdf")).unwrap(), "keep");
}

#[test]
fn test_rename_rejects_corrupt_source() {
    let dir = TempDir::new().unwrap();
    let source = write_corrupt(dir.path(), "broken.pdf");

    let outcome = rename_pdf(&LopdfLibrary::new(), &source, dir.path(), "fixed");

    assert_eq!(outcome.title, "Invalid PDF");
    assert!(source.exists());
}

#[test]
fn test_rename_allows_encrypted_source() {
    let dir = TempDir::new().unwrap();
    let source = FakeLibrary::write(dir.path(), "locked.pdf", 1, "l", Some("pw"));

    let outcome = rename_pdf(&FakeLibrary::new(), &source, dir.path(), "still-locked");

    assert!(outcome.success, "{outcome}");
    assert!(dir.path().join("still-locked.pdf").exists());
}

#[test]
fn test_batch_rename_numbers_in_name_order() {
    let input = TempDir::new().unwrap();
    write_pdf(input.path(), "b.pdf", 1, "b");
    write_pdf(input.path(), "a.pdf", 1, "a");
    write_pdf(input.path(), "c.pdf", 1, "c");
    let output = TempDir::new().unwrap();

    let outcome = batch_rename_pdfs(&LopdfLibrary::new(), input.path(), "report.pdf", Some(output.path()));

    assert!(outcome.success, "{outcome}");
    assert_eq!(
        outcome.message,
        format!(
            "3 PDF files renamed successfully in and/or moved to: {}.",
            output.path().display()
        )
    );
    assert_eq!(file_names(output.path()), ["report_1.pdf", "report_2.pdf", "report_3.pdf"]);
    assert_eq!(page_tags(&output.path().join("report_1.pdf")), ["a-1"]);
    assert_eq!(page_tags(&output.path().join("report_3.pdf")), ["c-1"]);
    assert!(file_names(input.path()).is_empty());
}

#[test]
fn test_batch_rename_aborts_on_invalid_file() {
    let input = TempDir::new().unwrap();
    write_pdf(input.path(), "a.pdf", 1, "a");
    write_pdf(input.path(), "b.pdf", 1, "b");
    write_corrupt(input.path(), "c.pdf");
    write_pdf(input.path(), "d.pdf", 1, "d");

    let outcome = batch_rename_pdfs(&LopdfLibrary::new(), input.path(), "x", None);

    assert!(!outcome.success);
    assert_eq!(outcome.title, "Invalid PDF");
    assert_eq!(outcome.kind, Some(ErrorKind::Corrupted));
    assert_eq!(file_names(input.path()), ["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);
}

#[test]
fn test_batch_rename_aborts_on_target_collision() {
    let input = TempDir::new().unwrap();
    write_pdf(input.path(), "a.pdf", 1, "a");
    write_pdf(input.path(), "b.pdf", 1, "b");
    let output = TempDir::new().unwrap();
    fs::write(output.path().join("x_2.pdf"), "keep").unwrap();

    let outcome = batch_rename_pdfs(&LopdfLibrary::new(), input.path(), "x", Some(output.path()));

    assert_eq!(outcome.title, "File Exists");
    assert_eq!(file_names(input.path()), ["a.pdf", "b.pdf"]);
    assert_eq!(file_names(output.path()), ["x_2.pdf"]);
}

#[test]
fn test_batch_rename_empty_directory() {
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("notes.txt"), "no pdfs").unwrap();

    let outcome = batch_rename_pdfs(&LopdfLibrary::new(), input.path(), "x", None);

    assert_eq!(outcome.title, "Empty directory");
}

#[test]
fn test_batch_rename_rejects_bare_extension() {
    let input = TempDir::new().unwrap();
    write_pdf(input.path(), "a.pdf", 1, "a");

    let outcome = batch_rename_pdfs(&LopdfLibrary::new(), input.path(), ".PDF", None);

    assert_eq!(outcome.title, "Invalid name");
    assert_eq!(file_names(input.path()), ["a.pdf"]);
}
