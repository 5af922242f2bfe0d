//! Account repository for managing registered users.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Account, NewAccount, UpdateAccount};
use crate::{PgConnection, PgError, PgResult, schema};

diesel::define_sql_function! {
    /// Lower-cases a text value, matching the `accounts` email index.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Repository for account database operations.
pub trait AccountRepository {
    /// Inserts a new account.
    ///
    /// Fails with a unique violation on `accounts_email_address_unique_idx`
    /// when the email address is already registered.
    fn create_account(
        &mut self,
        account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Finds an account by its identifier.
    fn find_account_by_id(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds an account by email address, ignoring case.
    fn find_account_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Applies partial changes to an account.
    fn update_account(
        &mut self,
        account_id: Uuid,
        changes: UpdateAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        let account = diesel::insert_into(accounts::table)
            .values(&account)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(account)
    }

    async fn find_account_by_id(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::dsl::*;

        let account = accounts
            .filter(id.eq(account_id))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(account)
    }

    async fn find_account_by_email(&mut self, email: &str) -> PgResult<Option<Account>> {
        use schema::accounts::dsl::*;

        let account = accounts
            .filter(lower(email_address).eq(email.to_lowercase()))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(account)
    }

    async fn update_account(
        &mut self,
        account_id: Uuid,
        changes: UpdateAccount,
    ) -> PgResult<Account> {
        use schema::accounts::dsl::*;

        let account = diesel::update(accounts)
            .filter(id.eq(account_id))
            .set(&changes)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(account)
    }
}
