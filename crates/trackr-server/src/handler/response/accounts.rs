//! Account response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use trackr_postgres::model;
use uuid::Uuid;

/// A registered account, without credentials.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID.
    pub account_id: Uuid,
    /// Email address.
    pub email_address: String,
    /// Display name.
    pub display_name: String,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
}

impl Account {
    /// Creates an account response from the database model.
    pub fn from_model(account: model::Account) -> Self {
        Self {
            account_id: account.id,
            email_address: account.email_address,
            display_name: account.display_name,
            created_at: account.created_at.into(),
            updated_at: account.updated_at.into(),
        }
    }
}
