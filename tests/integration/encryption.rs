//! Integration tests for the password protocol across the engines.

use pdf_toolkit::engine::{batch_split_pdf, merge_pdfs, split_pdf};
use pdf_toolkit::password::{EncryptionPolicy, PasswordResolver, PasswordResponse};
use pdf_toolkit::{ErrorKind, Severity};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::common::FakeLibrary;

#[test]
fn test_skip_all_never_asks() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        FakeLibrary::write(dir.path(), "a.pdf", 1, "a", Some("pw")),
        FakeLibrary::write(dir.path(), "b.pdf", 1, "b", None),
        FakeLibrary::write(dir.path(), "c.pdf", 1, "c", Some("pw")),
    ];
    let output = dir.path().join("out.pdf");
    let library = FakeLibrary::new();

    let mut asked = 0;
    let outcome = {
        let mut resolver = PasswordResolver::with_provider(EncryptionPolicy::SkipAll, |_: &Path| {
            asked += 1;
            PasswordResponse::Password("pw".into())
        });
        merge_pdfs(&library, &inputs, &output, &mut resolver)
    };

    assert_eq!(asked, 0);
    assert_eq!(library.decrypt_attempts(), 0);
    assert!(outcome.success, "{outcome}");
    let summary = outcome.merge_summary().unwrap();
    assert_eq!(summary.skipped_encrypted_files, [inputs[0].clone(), inputs[2].clone()]);
    assert_eq!(FakeLibrary::pages_of(&output), ["b-1"]);
}

#[test]
fn test_merge_with_passwords() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        FakeLibrary::write(dir.path(), "a.pdf", 1, "a", Some("alpha")),
        FakeLibrary::write(dir.path(), "b.pdf", 2, "b", Some("beta")),
        FakeLibrary::write(dir.path(), "c.pdf", 1, "c", Some("gamma")),
    ];
    let output = dir.path().join("out.pdf");

    let mut asked: Vec<PathBuf> = Vec::new();
    let outcome = {
        let mut resolver = PasswordResolver::with_provider(EncryptionPolicy::Ask, |path: &Path| {
            asked.push(path.to_path_buf());
            match path.file_name().and_then(|n| n.to_str()) {
                Some("a.pdf") => PasswordResponse::Password("alpha".into()),
                Some("b.pdf") => PasswordResponse::Password("wrong".into()),
                _ => PasswordResponse::Password("gamma".into()),
            }
        });
        merge_pdfs(&FakeLibrary::new(), &inputs, &output, &mut resolver)
    };

    assert_eq!(asked, inputs);
    assert!(outcome.success, "{outcome}");
    assert_eq!(outcome.severity, Severity::Warning);
    let summary = outcome.merge_summary().unwrap();
    assert_eq!(summary.wrong_password_files, [inputs[1].clone()]);
    assert_eq!(FakeLibrary::pages_of(&output), ["a-1", "c-1"]);
}

#[test]
fn test_skip_all_answer_stops_prompting() {
    let dir = TempDir::new().unwrap();
    let inputs: Vec<PathBuf> = ["a.pdf", "b.pdf", "c.pdf"]
        .iter()
        .map(|name| FakeLibrary::write(dir.path(), name, 1, name, Some("pw")))
        .collect();
    let plain = FakeLibrary::write(dir.path(), "d.pdf", 1, "d", None);
    let mut all = inputs.clone();
    all.push(plain);
    let output = dir.path().join("out.pdf");

    let mut asked = 0;
    let (outcome, policy) = {
        let mut resolver = PasswordResolver::with_provider(EncryptionPolicy::Ask, |_: &Path| {
            asked += 1;
            if asked == 1 {
                PasswordResponse::SkipOne
            } else {
                PasswordResponse::SkipAll
            }
        });
        let outcome = merge_pdfs(&FakeLibrary::new(), &all, &output, &mut resolver);
        (outcome, resolver.policy())
    };

    assert_eq!(asked, 2);
    assert_eq!(policy, EncryptionPolicy::SkipAll);
    assert_eq!(outcome.merge_summary().unwrap().skipped_encrypted_files, inputs);
    assert_eq!(FakeLibrary::pages_of(&output), ["d-1"]);
}

#[test]
fn test_empty_password_skips_file() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        FakeLibrary::write(dir.path(), "a.pdf", 1, "a", Some("pw")),
        FakeLibrary::write(dir.path(), "b.pdf", 1, "b", Some("pw")),
    ];
    let output = dir.path().join("out.pdf");
    let library = FakeLibrary::new();

    let mut answers = vec![PasswordResponse::Password("pw".into()), PasswordResponse::Password(String::new())];
    let outcome = {
        let mut resolver = PasswordResolver::with_provider(EncryptionPolicy::Ask, move |_: &Path| {
            answers.pop().unwrap_or(PasswordResponse::SkipAll)
        });
        merge_pdfs(&library, &inputs, &output, &mut resolver)
    };

    assert_eq!(library.decrypt_attempts(), 1);
    let summary = outcome.merge_summary().unwrap();
    assert_eq!(summary.skipped_encrypted_files, [inputs[0].clone()]);
    assert_eq!(summary.merged_files, [inputs[1].clone()]);
}

#[test]
fn test_without_prompt_encrypted_inputs_are_skipped() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![FakeLibrary::write(dir.path(), "a.pdf", 1, "a", Some("pw"))];
    let output = dir.path().join("out.pdf");

    let mut resolver = PasswordResolver::new(EncryptionPolicy::Ask);
    let outcome = merge_pdfs(&FakeLibrary::new(), &inputs, &output, &mut resolver);

    assert!(!outcome.success);
    assert_eq!(outcome.kind, Some(ErrorKind::NothingToMerge));
    assert_eq!(outcome.merge_summary().unwrap().skipped_encrypted_files, inputs);
}

#[test]
fn test_split_skipped_source_is_a_warning() {
    let dir = TempDir::new().unwrap();
    let source = FakeLibrary::write(dir.path(), "doc.pdf", 3, "doc", Some("pw"));

    let mut resolver = PasswordResolver::new(EncryptionPolicy::SkipAll);
    let outcome = split_pdf(&FakeLibrary::new(), &source, "1", dir.path(), &mut resolver);

    assert!(!outcome.success);
    assert_eq!(outcome.title, "Encrypted PDF");
    assert_eq!(outcome.severity, Severity::Warning);
    assert_eq!(outcome.kind, Some(ErrorKind::EncryptedSkipped));
}

#[test]
fn test_split_wrong_password() {
    let dir = TempDir::new().unwrap();
    let source = FakeLibrary::write(dir.path(), "doc.pdf", 3, "doc", Some("pw"));

    let mut resolver = PasswordResolver::with_provider(EncryptionPolicy::Ask, |_: &Path| {
        PasswordResponse::Password("nope".into())
    });
    let outcome = split_pdf(&FakeLibrary::new(), &source, "1", dir.path(), &mut resolver);

    assert_eq!(outcome.title, "Wrong password");
    assert_eq!(outcome.kind, Some(ErrorKind::EncryptedWrongPassword));
    assert_eq!(outcome.severity, Severity::Error);
}

#[test]
fn test_batch_split_decrypted_source() {
    let dir = TempDir::new().unwrap();
    let source = FakeLibrary::write(dir.path(), "doc.pdf", 2, "doc", Some("pw"));
    let out = TempDir::new().unwrap();

    let mut resolver = PasswordResolver::with_provider(EncryptionPolicy::Ask, |_: &Path| {
        PasswordResponse::Password("pw".into())
    });
    let outcome = batch_split_pdf(&FakeLibrary::new(), &source, Some(out.path()), &mut resolver);

    assert!(outcome.success, "{outcome}");
    assert_eq!(FakeLibrary::pages_of(&out.path().join("doc_page_2.pdf")), ["doc-2"]);
}

#[test]
fn test_unlocked_document_without_pages_is_invalid() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        FakeLibrary::write(dir.path(), "a.pdf", 1, "a", None),
        FakeLibrary::write(dir.path(), "hollow.pdf", 0, "h", Some("pw")),
    ];
    let output = dir.path().join("out.pdf");

    let mut resolver = PasswordResolver::with_provider(EncryptionPolicy::Ask, |_: &Path| {
        PasswordResponse::Password("pw".into())
    });
    let outcome = merge_pdfs(&FakeLibrary::new(), &inputs, &output, &mut resolver);

    assert_eq!(outcome.severity, Severity::Warning);
    let summary = outcome.merge_summary().unwrap();
    assert_eq!(summary.merged_files, [inputs[0].clone()]);
    assert_eq!(summary.invalid_files, [inputs[1].clone()]);
}

#[test]
fn test_split_unlocked_document_without_pages_fails() {
    let dir = TempDir::new().unwrap();
    let source = FakeLibrary::write(dir.path(), "hollow.pdf", 0, "h", Some("pw"));

    let mut resolver = PasswordResolver::with_provider(EncryptionPolicy::Ask, |_: &Path| {
        PasswordResponse::Password("pw".into())
    });
    let outcome = batch_split_pdf(&FakeLibrary::new(), &source, Some(dir.path()), &mut resolver);

    assert!(!outcome.success);
    assert_eq!(outcome.title, "Invalid PDF");
    assert_eq!(outcome.kind, Some(ErrorKind::Corrupted));
}
