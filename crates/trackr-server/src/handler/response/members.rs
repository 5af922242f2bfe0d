//! Project member response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use trackr_postgres::model::ProjectMember;
use trackr_postgres::types::ProjectRole;
use uuid::Uuid;

/// A role record of a project.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Project ID.
    pub project_id: Uuid,
    /// Account ID of the member.
    pub account_id: Uuid,
    /// Role of the member in the project.
    pub member_role: ProjectRole,
    /// Human-readable role name.
    pub role_name: String,
    /// Timestamp when the member joined the project.
    pub created_at: Timestamp,
}

impl Member {
    /// Creates a member response from the database model.
    pub fn from_model(member: ProjectMember) -> Self {
        Self {
            project_id: member.project_id,
            account_id: member.account_id,
            member_role: member.member_role,
            role_name: member.member_role.display_name().to_owned(),
            created_at: member.created_at.into(),
        }
    }

    /// Creates member responses from database models.
    pub fn from_models(members: Vec<ProjectMember>) -> Vec<Self> {
        members.into_iter().map(Self::from_model).collect()
    }
}
