//! Integration tests for documents encrypted by lopdf itself.

use pdf_toolkit::engine::{batch_split_pdf, merge_pdfs, rename_pdf, split_pdf};
use pdf_toolkit::io::{LopdfLibrary, PdfLibrary};
use pdf_toolkit::password::{EncryptionPolicy, PasswordResolver, PasswordResponse};
use pdf_toolkit::validation::{ValidationStatus, Validator};
use pdf_toolkit::{ErrorKind, Severity};
use std::path::Path;
use tempfile::TempDir;

use crate::common::{file_names, page_tags, write_encrypted_pdf, write_pdf};

fn answering(password: &'static str) -> PasswordResolver<'static> {
    PasswordResolver::with_provider(EncryptionPolicy::Ask, move |_: &Path| {
        PasswordResponse::Password(password.into())
    })
}

#[test]
fn test_merge_keeps_pages_of_unlocked_file() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_pdf(dir.path(), "plain.pdf", 2, "plain"),
        write_encrypted_pdf(dir.path(), "locked.pdf", 3, "locked", "user"),
    ];
    let output = dir.path().join("out.pdf");

    let outcome = merge_pdfs(&LopdfLibrary::new(), &inputs, &output, &mut answering("user"));

    assert!(outcome.success, "{outcome}");
    assert_eq!(outcome.severity, Severity::Info);
    assert_eq!(outcome.merge_summary().unwrap().merged_files, inputs);
    assert_eq!(
        page_tags(&output),
        ["plain-1", "plain-2", "locked-1", "locked-2", "locked-3"]
    );
}

#[test]
fn test_merge_wrong_password_leaves_file_out() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_pdf(dir.path(), "plain.pdf", 1, "plain"),
        write_encrypted_pdf(dir.path(), "locked.pdf", 2, "locked", "user"),
    ];
    let output = dir.path().join("out.pdf");

    let outcome = merge_pdfs(&LopdfLibrary::new(), &inputs, &output, &mut answering("guess"));

    assert!(outcome.success, "{outcome}");
    assert_eq!(outcome.severity, Severity::Warning);
    assert_eq!(outcome.merge_summary().unwrap().wrong_password_files, [inputs[1].clone()]);
    assert_eq!(page_tags(&output), ["plain-1"]);
}

#[test]
fn test_split_unlocked_source() {
    let dir = TempDir::new().unwrap();
    let source = write_encrypted_pdf(dir.path(), "doc.pdf", 4, "doc", "user");
    let out = TempDir::new().unwrap();

    let outcome = split_pdf(&LopdfLibrary::new(), &source, "2-3", out.path(), &mut answering("user"));

    assert!(outcome.success, "{outcome}");
    assert_eq!(page_tags(&out.path().join("doc_pages_2-3.pdf")), ["doc-2", "doc-3"]);
}

#[test]
fn test_split_wrong_password() {
    let dir = TempDir::new().unwrap();
    let source = write_encrypted_pdf(dir.path(), "doc.pdf", 2, "doc", "user");

    let outcome = split_pdf(&LopdfLibrary::new(), &source, "1", dir.path(), &mut answering("guess"));

    assert!(!outcome.success);
    assert_eq!(outcome.kind, Some(ErrorKind::EncryptedWrongPassword));
    assert_eq!(file_names(dir.path()), ["doc.pdf"]);
}

#[test]
fn test_batch_split_unlocked_source() {
    let dir = TempDir::new().unwrap();
    let source = write_encrypted_pdf(dir.path(), "doc.pdf", 3, "doc", "user");
    let out = TempDir::new().unwrap();

    let outcome = batch_split_pdf(&LopdfLibrary::new(), &source, Some(out.path()), &mut answering("user"));

    assert!(outcome.success, "{outcome}");
    assert_eq!(
        outcome.created_files().unwrap(),
        ["doc_page_1.pdf", "doc_page_2.pdf", "doc_page_3.pdf"]
    );
    assert_eq!(page_tags(&out.path().join("doc_page_3.pdf")), ["doc-3"]);
}

#[test]
fn test_rename_moves_encrypted_file_untouched() {
    let dir = TempDir::new().unwrap();
    let source = write_encrypted_pdf(dir.path(), "locked.pdf", 2, "locked", "user");
    let target_dir = TempDir::new().unwrap();
    let library = LopdfLibrary::new();

    let outcome = rename_pdf(&library, &source, target_dir.path(), "archived");

    assert!(outcome.success, "{outcome}");
    let moved = library.open(&target_dir.path().join("archived.pdf")).unwrap();
    assert!(library.is_encrypted(&moved));
}

#[test]
fn test_owner_password_only_is_not_prompted() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![write_encrypted_pdf(dir.path(), "owner.pdf", 2, "owner", "")];
    let output = dir.path().join("out.pdf");

    let mut asked = 0;
    let outcome = {
        let mut resolver = PasswordResolver::with_provider(EncryptionPolicy::Ask, |_: &Path| {
            asked += 1;
            PasswordResponse::SkipAll
        });
        merge_pdfs(&LopdfLibrary::new(), &inputs, &output, &mut resolver)
    };

    assert_eq!(asked, 0);
    assert!(outcome.success, "{outcome}");
    assert_eq!(page_tags(&output), ["owner-1", "owner-2"]);
}

#[test]
fn test_validator_classifies_by_user_password() {
    let dir = TempDir::new().unwrap();
    let user = write_encrypted_pdf(dir.path(), "user.pdf", 1, "user", "user");
    let owner = write_encrypted_pdf(dir.path(), "owner.pdf", 1, "owner", "");
    let library = LopdfLibrary::new();
    let validator = Validator::new(&library);

    assert_eq!(validator.validate(&user).status, ValidationStatus::Encrypted);
    assert_eq!(validator.validate(&owner).status, ValidationStatus::Valid);
}
