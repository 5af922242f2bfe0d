//! Password reset token model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::password_reset_tokens;

/// A one-time password reset token.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = password_reset_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PasswordResetToken {
    /// Unique token row identifier.
    pub id: Uuid,
    /// Account whose password may be reset.
    pub account_id: Uuid,
    /// Random reset token sent by email.
    pub reset_token: String,
    /// Timestamp when the token was issued.
    pub created_at: Timestamp,
    /// Timestamp after which the token is rejected.
    pub expires_at: Timestamp,
}

/// Data for creating a new password reset token.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = password_reset_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPasswordResetToken {
    /// Token row ID.
    pub id: Uuid,
    /// Account ID.
    pub account_id: Uuid,
    /// Reset token.
    pub reset_token: String,
    /// Expiration timestamp.
    pub expires_at: Timestamp,
}

impl PasswordResetToken {
    /// Returns whether the token has expired at the given instant.
    #[inline]
    pub fn is_expired_at(&self, now: jiff::Timestamp) -> bool {
        jiff::Timestamp::from(self.expires_at) <= now
    }
}
