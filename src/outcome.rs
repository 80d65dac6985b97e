//! The envelope every operation returns.
//!
//! An [`Outcome`] is the only thing an engine hands back to its caller. It
//! carries a success flag, a severity, a short title and message for display,
//! and typed [`OutcomeData`] with the per-file details of the operation.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::{ErrorKind, ToolkitError};

/// How prominently an outcome should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// `Info` for successes, `Error` otherwise.
    pub fn default_for(success: bool) -> Self {
        if success { Self::Info } else { Self::Error }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// Per-file accounting of a merge or batch-merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    /// The merged document, absent when nothing was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Inputs whose pages made it into the output, in order.
    pub merged_files: Vec<PathBuf>,

    /// Inputs that were not PDFs or could not be parsed.
    pub invalid_files: Vec<PathBuf>,

    /// Encrypted inputs left out without trying a password.
    pub skipped_encrypted_files: Vec<PathBuf>,

    /// Encrypted inputs whose password was rejected.
    pub wrong_password_files: Vec<PathBuf>,
}

impl MergeSummary {
    /// Number of inputs that were left out for any reason.
    pub fn left_out(&self) -> usize {
        self.invalid_files.len() + self.skipped_encrypted_files.len() + self.wrong_password_files.len()
    }
}

/// Files produced by a split, extract or batch-split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    /// File names of the created documents, in creation order.
    pub files: Vec<String>,
}

/// Moves performed by a rename or batch-rename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameSummary {
    /// `(from, to)` pairs in processing order.
    pub renamed: Vec<(PathBuf, PathBuf)>,
}

/// Operation-specific payload of an [`Outcome`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutcomeData {
    #[default]
    None,
    Merge(MergeSummary),
    Split(SplitSummary),
    Rename(RenameSummary),
}

/// Uniform result of every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub severity: Severity,
    pub title: String,
    pub message: String,

    /// Failure classification; always `None` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,

    pub data: OutcomeData,
}

impl Outcome {
    /// A successful outcome with `Info` severity.
    pub fn success(title: impl Into<String>, message: impl Into<String>, data: OutcomeData) -> Self {
        Self {
            success: true,
            severity: Severity::default_for(true),
            title: title.into(),
            message: message.into(),
            kind: None,
            data,
        }
    }

    /// A failed outcome with `Error` severity.
    pub fn failure(kind: ErrorKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            severity: Severity::default_for(false),
            title: title.into(),
            message: message.into(),
            kind: Some(kind),
            data: OutcomeData::None,
        }
    }

    /// Override the default severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach a payload.
    pub fn with_data(mut self, data: OutcomeData) -> Self {
        self.data = data;
        self
    }

    /// Turn an engine error into a failed outcome, logging it first.
    ///
    /// `context` names the operation, e.g. `"merging PDFs"`. Unclassified
    /// errors are logged in full but shown with a generic message.
    pub fn from_error(err: &ToolkitError, context: &str) -> Self {
        let kind = err.kind();

        if err.is_user_facing() {
            tracing::error!(operation = context, kind = ?kind, error = %err, "operation failed");
        } else {
            tracing::error!(
                operation = context,
                kind = ?kind,
                error = ?err,
                "unexpected failure"
            );
        }

        let message = if err.is_user_facing() {
            err.to_string()
        } else {
            unexpected_message(context)
        };

        let severity = if err.is_soft() {
            Severity::Warning
        } else {
            Severity::Error
        };

        Self::failure(kind, err.title(), message).with_severity(severity)
    }

    /// Outcome for a panic caught at an engine boundary.
    pub fn unexpected(context: &str) -> Self {
        Self::failure(
            ErrorKind::Unexpected,
            "Unexpected Error",
            unexpected_message(context),
        )
    }

    /// Merge details, if this outcome carries them.
    pub fn merge_summary(&self) -> Option<&MergeSummary> {
        match &self.data {
            OutcomeData::Merge(summary) => Some(summary),
            _ => None,
        }
    }

    /// Created file names, if this outcome carries them.
    pub fn created_files(&self) -> Option<&[String]> {
        match &self.data {
            OutcomeData::Split(summary) => Some(&summary.files),
            _ => None,
        }
    }

    /// Process exit code matching this outcome.
    pub fn exit_code(&self) -> i32 {
        match (self.success, self.kind) {
            (true, _) => 0,
            (false, Some(kind)) => kind.exit_code(),
            (false, None) => ErrorKind::Unexpected.exit_code(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "Success" } else { "Failure" };
        write!(
            f,
            "<Outcome {status}: {}: {}: {}>",
            self.severity.to_string().to_uppercase(),
            self.title,
            self.message
        )
    }
}

fn unexpected_message(context: &str) -> String {
    format!("An unexpected error occurred while {context}. See the activity log for details.")
}
