//! Database constraint violations organized by table.

mod accounts;
mod password_reset_tokens;
mod project_invites;
mod project_members;
mod projects;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::accounts::AccountConstraints;
pub use self::password_reset_tokens::PasswordResetTokenConstraints;
pub use self::project_invites::ProjectInviteConstraints;
pub use self::project_members::ProjectMemberConstraints;
pub use self::projects::ProjectConstraints;

/// Any known database constraint, grouped by the table it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Account(AccountConstraints),
    Project(ProjectConstraints),
    ProjectMember(ProjectMemberConstraints),
    ProjectInvite(ProjectInviteConstraints),
    PasswordResetToken(PasswordResetTokenConstraints),
}

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Data validation constraints (format, length, range checks).
    Validation,
    /// Chronological integrity constraints (timestamp relationships).
    Chronological,
    /// Business logic constraints (references and domain rules).
    BusinessLogic,
    /// Uniqueness constraints (primary keys, unique indexes).
    Uniqueness,
}

impl ConstraintViolation {
    /// Creates a new [`ConstraintViolation`] from the constraint name.
    ///
    /// Returns `None` if the constraint name is unknown.
    ///
    /// ```
    /// use trackr_postgres::types::{ConstraintViolation, ProjectMemberConstraints};
    ///
    /// let violation = ConstraintViolation::new("project_members_pkey");
    /// assert_eq!(
    ///     violation,
    ///     Some(ConstraintViolation::ProjectMember(ProjectMemberConstraints::Membership))
    /// );
    ///
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        let prefix = constraint.split('_').next()?;
        macro_rules! try_parse {
            ($($parser:expr => $variant:ident),+ $(,)?) => {
                None$(.or_else(|| $parser(constraint).map(Self::$variant)))+
            };
        }

        match prefix {
            "accounts" => try_parse!(AccountConstraints::new => Account),
            "projects" => try_parse!(ProjectConstraints::new => Project),
            "project" => try_parse! {
                ProjectMemberConstraints::new => ProjectMember,
                ProjectInviteConstraints::new => ProjectInvite,
            },
            "password" => try_parse!(PasswordResetTokenConstraints::new => PasswordResetToken),
            _ => None,
        }
    }

    /// Returns the table name associated with this constraint.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConstraintViolation::Account(_) => "accounts",
            ConstraintViolation::Project(_) => "projects",
            ConstraintViolation::ProjectMember(_) => "project_members",
            ConstraintViolation::ProjectInvite(_) => "project_invites",
            ConstraintViolation::PasswordResetToken(_) => "password_reset_tokens",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn constraint_category(&self) -> ConstraintCategory {
        match self {
            ConstraintViolation::Account(c) => c.categorize(),
            ConstraintViolation::Project(c) => c.categorize(),
            ConstraintViolation::ProjectMember(c) => c.categorize(),
            ConstraintViolation::ProjectInvite(c) => c.categorize(),
            ConstraintViolation::PasswordResetToken(c) => c.categorize(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Account(c) => write!(f, "{}", c),
            ConstraintViolation::Project(c) => write!(f, "{}", c),
            ConstraintViolation::ProjectMember(c) => write!(f, "{}", c),
            ConstraintViolation::ProjectInvite(c) => write!(f, "{}", c),
            ConstraintViolation::PasswordResetToken(c) => write!(f, "{}", c),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("unknown constraint: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_table_prefix() {
        assert_eq!(
            ConstraintViolation::new("accounts_email_address_unique_idx"),
            Some(ConstraintViolation::Account(
                AccountConstraints::EmailAddressUnique
            ))
        );
        assert_eq!(
            ConstraintViolation::new("projects_display_name_length"),
            Some(ConstraintViolation::Project(
                ProjectConstraints::DisplayNameLength
            ))
        );
        assert_eq!(
            ConstraintViolation::new("project_invites_invite_token_unique"),
            Some(ConstraintViolation::ProjectInvite(
                ProjectInviteConstraints::InviteTokenUnique
            ))
        );
        assert_eq!(
            ConstraintViolation::new("password_reset_tokens_expires_after_created"),
            Some(ConstraintViolation::PasswordResetToken(
                PasswordResetTokenConstraints::ExpiresAfterCreated
            ))
        );
    }

    #[test]
    fn categorizes_membership_conflicts_as_uniqueness() {
        let violation = ConstraintViolation::new("project_members_pkey");
        assert_eq!(
            violation.map(|v| v.constraint_category()),
            Some(ConstraintCategory::Uniqueness)
        );
        assert_eq!(violation.map(|v| v.table_name()), Some("project_members"));
    }

    #[test]
    fn display_round_trips_the_constraint_name() {
        let violation = ConstraintViolation::ProjectMember(ProjectMemberConstraints::SingleOwner);
        assert_eq!(violation.to_string(), "project_members_single_owner_idx");
    }

    #[test]
    fn unknown_constraints_are_rejected() {
        assert!(ConstraintViolation::new("").is_none());
        assert!(ConstraintViolation::new("projects_unknown").is_none());
        assert!(ConstraintViolation::new("issues_title_length").is_none());
    }
}
