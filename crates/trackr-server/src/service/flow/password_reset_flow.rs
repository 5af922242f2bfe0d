//! Forgotten password recovery through emailed one-hour tokens.

use std::sync::Arc;
use std::time::Duration;

use trackr_postgres::model::{Account, NewPasswordResetToken};
use uuid::Uuid;

use super::{expiry_after, generate_token};
use crate::service::notify::{EmailKind, EmailSender};
use crate::service::security::{AuthError, AuthResult, PasswordHasher};
use crate::service::store::{ResetTokenStore, UserDirectory};
use crate::utility::tracing_targets::PASSWORD_RESET as TRACING_TARGET;

/// Lifetime of a password reset token.
pub const PASSWORD_RESET_TTL: Duration = Duration::from_secs(60 * 60);

/// Issues and consumes password reset tokens.
#[derive(Clone)]
pub struct PasswordResetFlow {
    users: Arc<dyn UserDirectory>,
    reset_tokens: Arc<dyn ResetTokenStore>,
    email_sender: Arc<dyn EmailSender>,
    password_hasher: PasswordHasher,
    base_url: Arc<str>,
}

impl PasswordResetFlow {
    /// Creates the flow.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        reset_tokens: Arc<dyn ResetTokenStore>,
        email_sender: Arc<dyn EmailSender>,
        password_hasher: PasswordHasher,
        base_url: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            users,
            reset_tokens,
            email_sender,
            password_hasher,
            base_url: base_url.into(),
        }
    }

    /// Builds the reset link for a token.
    pub fn reset_link(&self, token: &str) -> String {
        format!("{}/reset-password?token={}", self.base_url, token)
    }

    /// Emails a reset link to the account registered under `email`.
    ///
    /// Unknown addresses succeed without sending anything, so callers cannot
    /// tell which emails are registered.
    pub async fn forgot_password(&self, email: &str) -> AuthResult<()> {
        self.forgot_password_at(email, jiff::Timestamp::now()).await
    }

    /// Same as [`forgot_password`](Self::forgot_password) with an explicit clock.
    pub async fn forgot_password_at(&self, email: &str, now: jiff::Timestamp) -> AuthResult<()> {
        let Some(account) = self.users.find_by_email(email.trim()).await? else {
            tracing::debug!(target: TRACING_TARGET, "reset requested for unknown email");
            return Ok(());
        };

        let new_token = NewPasswordResetToken {
            id: Uuid::now_v7(),
            account_id: account.id,
            reset_token: generate_token(),
            expires_at: expiry_after(now, PASSWORD_RESET_TTL).into(),
        };
        let stored = self.reset_tokens.replace_reset_token(new_token).await?;

        let link = self.reset_link(&stored.reset_token);
        self.email_sender
            .send(&account.email_address, &link, EmailKind::PasswordReset)
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            "password reset link sent"
        );
        Ok(())
    }

    /// Sets a new password using a reset token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AuthResult<Account> {
        self.reset_password_at(token, new_password, jiff::Timestamp::now())
            .await
    }

    /// Same as [`reset_password`](Self::reset_password) with an explicit clock.
    pub async fn reset_password_at(
        &self,
        token: &str,
        new_password: &str,
        now: jiff::Timestamp,
    ) -> AuthResult<Account> {
        let Some(stored) = self.reset_tokens.find_reset_token(token).await? else {
            return Err(AuthError::InvalidResetToken);
        };

        if stored.is_expired_at(now) {
            self.reset_tokens.delete_reset_token(token).await?;
            tracing::debug!(
                target: TRACING_TARGET,
                account_id = %stored.account_id,
                "expired reset token deleted"
            );
            return Err(AuthError::ExpiredResetToken);
        }

        let password_hash = self.password_hasher.hash_password(new_password)?;
        let account = self
            .reset_tokens
            .consume_reset_token(&stored, password_hash)
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            "password reset completed"
        );
        Ok(account)
    }
}

impl std::fmt::Debug for PasswordResetFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordResetFlow")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
