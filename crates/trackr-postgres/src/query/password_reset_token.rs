//! Password reset token repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::model::{Account, NewPasswordResetToken, PasswordResetToken, UpdateAccount};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for password reset token database operations.
pub trait PasswordResetTokenRepository {
    /// Stores a new reset token, replacing any outstanding token of the same account.
    fn replace_reset_token(
        &mut self,
        token: NewPasswordResetToken,
    ) -> impl Future<Output = PgResult<PasswordResetToken>> + Send;

    /// Finds a reset token by its value.
    fn find_reset_token(
        &mut self,
        token: &str,
    ) -> impl Future<Output = PgResult<Option<PasswordResetToken>>> + Send;

    /// Deletes a reset token by its value.
    ///
    /// Returns whether a token was deleted.
    fn delete_reset_token(&mut self, token: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Stores a new password hash and deletes the token in one transaction.
    fn consume_reset_token(
        &mut self,
        token_id: Uuid,
        password_hash: String,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Deletes all tokens that expired before now.
    ///
    /// Returns the number of deleted tokens.
    fn delete_expired_reset_tokens(&mut self) -> impl Future<Output = PgResult<usize>> + Send;
}

impl PasswordResetTokenRepository for PgConnection {
    async fn replace_reset_token(
        &mut self,
        token: NewPasswordResetToken,
    ) -> PgResult<PasswordResetToken> {
        self.transaction::<_, PgError, _>(|conn| {
            async move {
                use schema::password_reset_tokens::dsl::*;

                diesel::delete(password_reset_tokens)
                    .filter(account_id.eq(token.account_id))
                    .execute(conn)
                    .await?;

                let token = diesel::insert_into(password_reset_tokens)
                    .values(&token)
                    .returning(PasswordResetToken::as_returning())
                    .get_result(conn)
                    .await?;

                Ok(token)
            }
            .scope_boxed()
        })
        .await
    }

    async fn find_reset_token(&mut self, token: &str) -> PgResult<Option<PasswordResetToken>> {
        use schema::password_reset_tokens::dsl::*;

        let token = password_reset_tokens
            .filter(reset_token.eq(token))
            .select(PasswordResetToken::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(token)
    }

    async fn delete_reset_token(&mut self, token: &str) -> PgResult<bool> {
        use schema::password_reset_tokens::dsl::*;

        let deleted = diesel::delete(password_reset_tokens)
            .filter(reset_token.eq(token))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn consume_reset_token(
        &mut self,
        token_id: Uuid,
        password_hash: String,
    ) -> PgResult<Account> {
        self.transaction::<_, PgError, _>(|conn| {
            async move {
                use schema::{accounts, password_reset_tokens};

                let account_id = diesel::delete(password_reset_tokens::table)
                    .filter(password_reset_tokens::id.eq(token_id))
                    .returning(password_reset_tokens::account_id)
                    .get_result::<Uuid>(conn)
                    .await?;

                let account = diesel::update(accounts::table)
                    .filter(accounts::id.eq(account_id))
                    .set(&UpdateAccount::password(password_hash))
                    .returning(Account::as_returning())
                    .get_result(conn)
                    .await?;

                Ok(account)
            }
            .scope_boxed()
        })
        .await
    }

    async fn delete_expired_reset_tokens(&mut self) -> PgResult<usize> {
        use schema::password_reset_tokens::dsl::*;

        let now: jiff_diesel::Timestamp = jiff::Timestamp::now().into();
        let deleted = diesel::delete(password_reset_tokens)
            .filter(expires_at.le(now))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted)
    }
}
