//! Password reset tokens table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Password reset tokens table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum PasswordResetTokenConstraints {
    // Token uniqueness constraints
    #[strum(serialize = "password_reset_tokens_reset_token_unique")]
    ResetTokenUnique,

    // Token chronological constraints
    #[strum(serialize = "password_reset_tokens_expires_after_created")]
    ExpiresAfterCreated,
}

impl PasswordResetTokenConstraints {
    /// Creates a new [`PasswordResetTokenConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            PasswordResetTokenConstraints::ResetTokenUnique => ConstraintCategory::Uniqueness,

            PasswordResetTokenConstraints::ExpiresAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<PasswordResetTokenConstraints> for String {
    #[inline]
    fn from(val: PasswordResetTokenConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for PasswordResetTokenConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
