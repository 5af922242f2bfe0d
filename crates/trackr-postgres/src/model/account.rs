//! Account model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::accounts;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Email address used as the token subject.
    pub email_address: String,
    /// Human-readable name.
    pub display_name: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new account.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    /// Account ID.
    pub id: Uuid,
    /// Email address, stored as given.
    pub email_address: String,
    /// Display name.
    pub display_name: String,
    /// Argon2id PHC string.
    pub password_hash: String,
}

impl NewAccount {
    /// Creates a new account with a time-ordered identifier.
    pub fn new(
        email_address: impl Into<String>,
        display_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            email_address: email_address.into(),
            display_name: display_name.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Data for updating an account.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAccount {
    /// Display name.
    pub display_name: Option<String>,
    /// Argon2id PHC string.
    pub password_hash: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<Timestamp>,
}

impl UpdateAccount {
    /// Creates a changeset replacing the stored password hash.
    pub fn password(password_hash: impl Into<String>) -> Self {
        Self {
            password_hash: Some(password_hash.into()),
            updated_at: Some(jiff::Timestamp::now().into()),
            ..Default::default()
        }
    }
}

impl Account {
    /// Returns whether the given address belongs to this account, ignoring case.
    pub fn has_email(&self, email_address: &str) -> bool {
        self.email_address.eq_ignore_ascii_case(email_address)
    }
}
