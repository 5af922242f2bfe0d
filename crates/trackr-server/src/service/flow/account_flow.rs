//! Account registration, sign-in and token refresh.

use std::sync::Arc;
use std::time::Duration;

use trackr_postgres::model::{Account, NewAccount};

use crate::service::security::{
    ACCESS_TOKEN_TTL, AuthError, AuthResult, PasswordHasher, Principal, REFRESH_TOKEN_TTL,
    TokenCodec,
};
use crate::service::store::UserDirectory;
use crate::utility::tracing_targets::ACCOUNT as TRACING_TARGET;

/// Authority claim carried by every token issued to an account.
pub const AUTHORITIES_CLAIM: &str = "ROLE_USER";

/// Access and refresh tokens handed to a signed-in caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived token presented on every request.
    pub access_token: String,
    /// Long-lived token exchanged for new access tokens.
    pub refresh_token: String,
    /// Lifetime of the access token.
    pub expires_in: Duration,
}

/// Registers accounts and issues their tokens.
#[derive(Clone)]
pub struct AccountFlow {
    users: Arc<dyn UserDirectory>,
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

impl AccountFlow {
    /// Creates the flow.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        password_hasher: PasswordHasher,
        token_codec: TokenCodec,
    ) -> Self {
        Self {
            users,
            password_hasher,
            token_codec,
        }
    }

    /// Creates an account and signs it in.
    pub async fn register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> AuthResult<(Account, TokenPair)> {
        let email = email.trim();
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.password_hasher.hash_password(password)?;
        let account = self
            .users
            .create_account(NewAccount::new(email, display_name.trim(), password_hash))
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            "account registered"
        );

        let tokens = self.issue_pair(&account.email_address)?;
        Ok((account, tokens))
    }

    /// Verifies credentials and issues a fresh token pair.
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<(Account, TokenPair)> {
        let Some(account) = self.users.find_by_email(email.trim()).await? else {
            self.password_hasher.verify_dummy_password(password);
            tracing::debug!(target: TRACING_TARGET, "sign-in for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(err) = self
            .password_hasher
            .verify_password(password, &account.password_hash)
        {
            tracing::debug!(
                target: TRACING_TARGET,
                account_id = %account.id,
                "sign-in with wrong password"
            );
            return Err(err);
        }

        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            "account signed in"
        );

        let tokens = self.issue_pair(&account.email_address)?;
        Ok((account, tokens))
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// The refresh token itself is returned unchanged. The new access token
    /// carries an empty permission claim.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let verified = self.token_codec.verify(refresh_token.trim())?;
        let subject = verified
            .subject
            .filter(|subject| !subject.is_empty())
            .ok_or(AuthError::NoSubject)?;

        let Some(account) = self.users.find_by_email(&subject).await? else {
            tracing::debug!(target: TRACING_TARGET, "refresh for a deleted account");
            return Err(AuthError::InvalidCredentials);
        };

        let access_token = self
            .token_codec
            .issue(&account.email_address, "", ACCESS_TOKEN_TTL)?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh_token.trim().to_owned(),
            expires_in: ACCESS_TOKEN_TTL,
        })
    }

    /// Loads the account behind an authenticated caller.
    pub async fn current_account(&self, principal: &Principal) -> AuthResult<Account> {
        self.users
            .find_by_email(principal.subject())
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    fn issue_pair(&self, subject: &str) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self
                .token_codec
                .issue(subject, AUTHORITIES_CLAIM, ACCESS_TOKEN_TTL)?,
            refresh_token: self
                .token_codec
                .issue(subject, AUTHORITIES_CLAIM, REFRESH_TOKEN_TTL)?,
            expires_in: ACCESS_TOKEN_TTL,
        })
    }
}

impl std::fmt::Debug for AccountFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountFlow").finish_non_exhaustive()
    }
}
