//! Outbound email seam.
//!
//! The core only needs to hand a link to someone. Real delivery is an
//! integration concern; [`LogEmailSender`] records each delivery in the logs
//! and [`RecordingEmailSender`] keeps them in memory for tests and tooling.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use strum::{Display, IntoStaticStr};

use crate::service::security::{AuthError, AuthResult};
use crate::utility::tracing_targets::EMAIL as TRACING_TARGET;

/// Kind of message being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailKind {
    /// Project invitation with an acceptance link.
    Invitation,
    /// Password reset with a reset link.
    PasswordReset,
}

/// Delivers links by email.
///
/// Failures surface as [`AuthError::Delivery`], never as authorization errors.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Sends `link` to `to_email`.
    async fn send(&self, to_email: &str, link: &str, kind: EmailKind) -> AuthResult<()>;
}

/// Sender that writes each delivery to the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to_email: &str, link: &str, kind: EmailKind) -> AuthResult<()> {
        tracing::info!(
            target: TRACING_TARGET,
            to = to_email,
            kind = %kind,
            link,
            "email delivered"
        );
        Ok(())
    }
}

/// A delivery captured by [`RecordingEmailSender`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    /// Recipient address.
    pub to_email: String,
    /// Link carried by the message.
    pub link: String,
    /// Message kind.
    pub kind: EmailKind,
}

impl SentEmail {
    /// Returns the `token` query parameter of the link, if any.
    pub fn token(&self) -> Option<String> {
        let url = url::Url::parse(&self.link).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
    }
}

/// Sender that keeps every delivery in memory.
///
/// Can be switched into a failing mode to exercise delivery errors.
#[derive(Debug, Clone, Default)]
pub struct RecordingEmailSender {
    sent: Arc<Mutex<Vec<SentEmail>>>,
    failing: bool,
}

impl RecordingEmailSender {
    /// Creates a sender that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sender that rejects every message.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Returns every delivered message, oldest first.
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Returns the most recently delivered message.
    pub fn last(&self) -> Option<SentEmail> {
        self.sent().pop()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to_email: &str, link: &str, kind: EmailKind) -> AuthResult<()> {
        if self.failing {
            return Err(AuthError::Delivery("mail relay unavailable".into()));
        }

        let email = SentEmail {
            to_email: to_email.to_owned(),
            link: link.to_owned(),
            kind,
        };
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email);
        }
        Ok(())
    }
}
