//! Password resolution for encrypted inputs.
//!
//! When an engine meets an encrypted document it asks a [`PasswordResolver`]
//! what to do. The resolver combines the current [`EncryptionPolicy`] with an
//! optional [`PasswordProvider`] supplied by the caller (a terminal prompt,
//! a dialog, or a test closure) and answers with a [`Resolution`].
//!
//! The provider is called synchronously, so no later file is looked at until
//! the user has answered for the current one. A provider that lives on
//! another thread can be reached through [`ChannelPasswordProvider`].
//!
//! # Examples
//!
//! ```
//! use pdf_toolkit::password::{EncryptionPolicy, PasswordResolver, PasswordResponse, Resolution};
//! use std::path::Path;
//!
//! let mut resolver = PasswordResolver::with_provider(
//!     EncryptionPolicy::Ask,
//!     |_: &Path| PasswordResponse::Password("secret".into()),
//! );
//! assert_eq!(
//!     resolver.resolve(Path::new("locked.pdf")),
//!     Resolution::Password("secret".into())
//! );
//! ```

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};

/// How encrypted files are handled without asking per file.
///
/// Ordered from least to most permissive; a resolver only ever moves up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncryptionPolicy {
    /// Ask the provider for every encrypted file.
    #[default]
    Ask,
    /// The user has skipped an encrypted file during this run.
    Skip,
    /// Skip every encrypted file without asking.
    SkipAll,
}

impl EncryptionPolicy {
    /// Move to `next` unless the current policy is already stricter.
    pub fn escalate(&mut self, next: EncryptionPolicy) {
        if next > *self {
            *self = next;
        }
    }
}

/// What a provider answered for one file.
#[derive(Clone, PartialEq, Eq)]
pub enum PasswordResponse {
    Password(String),
    SkipOne,
    SkipAll,
}

impl fmt::Debug for PasswordResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(<redacted>)"),
            Self::SkipOne => f.write_str("SkipOne"),
            Self::SkipAll => f.write_str("SkipAll"),
        }
    }
}

/// Source of passwords for encrypted files.
pub trait PasswordProvider {
    /// Ask for the password of `path`. Must not return before an answer exists.
    fn request_password(&mut self, path: &Path) -> PasswordResponse;
}

impl<F> PasswordProvider for F
where
    F: FnMut(&Path) -> PasswordResponse,
{
    fn request_password(&mut self, path: &Path) -> PasswordResponse {
        self(path)
    }
}

/// Why an encrypted file was not opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The policy said to skip without asking.
    Policy,
    /// The provider declined to give a password.
    User,
    /// There was nobody to ask.
    NoPrompt,
}

/// Verdict for one encrypted file.
#[derive(Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Try this password against the document.
    Password(String),
    /// Leave the file out.
    Skipped(SkipReason),
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password(_) => f.write_str("Password(<redacted>)"),
            Self::Skipped(reason) => f.debug_tuple("Skipped").field(reason).finish(),
        }
    }
}

/// Request-scoped encryption handling shared by every file of one operation.
pub struct PasswordResolver<'p> {
    policy: EncryptionPolicy,
    provider: Option<Box<dyn PasswordProvider + Send + 'p>>,
}

impl<'p> PasswordResolver<'p> {
    /// Resolver that can never ask anyone; encrypted files are skipped.
    pub fn new(policy: EncryptionPolicy) -> Self {
        Self {
            policy,
            provider: None,
        }
    }

    /// Resolver that consults `provider` while the policy allows it.
    pub fn with_provider(
        policy: EncryptionPolicy,
        provider: impl PasswordProvider + Send + 'p,
    ) -> Self {
        Self {
            policy,
            provider: Some(Box::new(provider)),
        }
    }

    /// Current policy, including any escalation made by the provider.
    pub fn policy(&self) -> EncryptionPolicy {
        self.policy
    }

    /// Decide how to treat the encrypted file at `path`.
    pub fn resolve(&mut self, path: &Path) -> Resolution {
        if self.policy == EncryptionPolicy::SkipAll {
            tracing::debug!(path = %path.display(), "encrypted file skipped by policy");
            return Resolution::Skipped(SkipReason::Policy);
        }

        let Some(provider) = self.provider.as_mut() else {
            tracing::debug!(path = %path.display(), "encrypted file skipped, no password prompt");
            return Resolution::Skipped(SkipReason::NoPrompt);
        };

        match provider.request_password(path) {
            PasswordResponse::Password(password) if !password.is_empty() => {
                Resolution::Password(password)
            }
            PasswordResponse::Password(_) | PasswordResponse::SkipOne => {
                self.policy.escalate(EncryptionPolicy::Skip);
                Resolution::Skipped(SkipReason::User)
            }
            PasswordResponse::SkipAll => {
                self.policy.escalate(EncryptionPolicy::SkipAll);
                Resolution::Skipped(SkipReason::User)
            }
        }
    }
}

impl fmt::Debug for PasswordResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordResolver")
            .field("policy", &self.policy)
            .field("provider", &self.provider.is_some())
            .finish()
    }
}

/// One password question travelling to the thread that can answer it.
pub struct PasswordRequest {
    pub path: PathBuf,
    reply: oneshot::Sender<PasswordResponse>,
}

impl PasswordRequest {
    /// Send the answer back to the waiting engine.
    pub fn respond(self, response: PasswordResponse) {
        // The engine may already be gone; nothing left to do then.
        let _ = self.reply.send(response);
    }
}

/// Provider that forwards each question over a channel and blocks for the reply.
///
/// The engine must run on a thread where blocking is allowed, for example
/// inside `tokio::task::spawn_blocking`. If the answering side has gone away
/// every later file is skipped.
#[derive(Debug, Clone)]
pub struct ChannelPasswordProvider {
    requests: mpsc::Sender<PasswordRequest>,
}

impl ChannelPasswordProvider {
    /// Create a provider and the receiver its questions arrive on.
    pub fn channel() -> (Self, mpsc::Receiver<PasswordRequest>) {
        let (requests, receiver) = mpsc::channel(1);
        (Self { requests }, receiver)
    }
}

impl PasswordProvider for ChannelPasswordProvider {
    fn request_password(&mut self, path: &Path) -> PasswordResponse {
        let (reply, answer) = oneshot::channel();
        let request = PasswordRequest {
            path: path.to_path_buf(),
            reply,
        };

        if self.requests.blocking_send(request).is_err() {
            tracing::warn!("password prompt is gone, skipping remaining encrypted files");
            return PasswordResponse::SkipAll;
        }

        answer.blocking_recv().unwrap_or(PasswordResponse::SkipAll)
    }
}
