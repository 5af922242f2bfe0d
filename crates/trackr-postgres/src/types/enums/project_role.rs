//! Project role enumeration for member permissions and access control.

use diesel_derive_enum::DbEnum;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role of an account within a project.
///
/// Corresponds to the `PROJECT_ROLE` PostgreSQL enum. Parsing is
/// case-insensitive, so `"OWNER"`, `"Owner"` and `"owner"` are all accepted.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ProjectRole"]
#[strum(ascii_case_insensitive)]
pub enum ProjectRole {
    /// Created the project; the only role allowed to delete it, invite and assign roles.
    #[db_rename = "owner"]
    #[serde(rename = "owner")]
    #[strum(serialize = "owner")]
    Owner,

    /// Elevated member.
    #[db_rename = "administrator"]
    #[serde(rename = "administrator")]
    #[strum(serialize = "administrator")]
    Administrator,

    /// Regular team member; the role granted by accepted invitations.
    #[db_rename = "member"]
    #[serde(rename = "member")]
    #[strum(serialize = "member")]
    #[default]
    Member,
}

impl ProjectRole {
    /// Returns whether this role is the project owner.
    #[inline]
    pub const fn is_owner(self) -> bool {
        matches!(self, ProjectRole::Owner)
    }

    /// Returns the human-readable name shown to users.
    #[inline]
    pub const fn display_name(self) -> &'static str {
        match self {
            ProjectRole::Owner => "Owner",
            ProjectRole::Administrator => "Administrator",
            ProjectRole::Member => "Member",
        }
    }
}
