//! Project member model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::project_members;
use crate::types::ProjectRole;

/// A role assignment of an account within a project.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = project_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectMember {
    /// Reference to the project.
    pub project_id: Uuid,
    /// Reference to the member's account.
    pub account_id: Uuid,
    /// Member's role in the project.
    pub member_role: ProjectRole,
    /// Timestamp when membership was created.
    pub created_at: Timestamp,
}

/// Data for creating a new project member.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = project_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProjectMember {
    /// Project ID.
    pub project_id: Uuid,
    /// Account ID.
    pub account_id: Uuid,
    /// Member role.
    pub member_role: ProjectRole,
}

impl NewProjectMember {
    /// Creates a new project membership with the specified role.
    pub fn new(project_id: Uuid, account_id: Uuid, role: ProjectRole) -> Self {
        Self {
            project_id,
            account_id,
            member_role: role,
        }
    }

    /// Creates the owner membership for a newly created project.
    pub fn new_owner(project_id: Uuid, account_id: Uuid) -> Self {
        Self::new(project_id, account_id, ProjectRole::Owner)
    }
}

impl ProjectMember {
    /// Returns whether the member owns the project.
    #[inline]
    pub fn is_owner(&self) -> bool {
        self.member_role.is_owner()
    }
}
