//! Project invitation response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use trackr_postgres::model::ProjectInvite;
use uuid::Uuid;

/// An outstanding or just redeemed invitation.
///
/// The redemption token itself is only ever delivered by email.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invite {
    /// Invitation ID.
    pub invite_id: Uuid,
    /// Project the invitation grants access to.
    pub project_id: Uuid,
    /// Email address the invitation was sent to.
    pub invitee_email: String,
    /// Account that sent the invitation.
    pub created_by: Uuid,
    /// Timestamp when the invitation was created.
    pub created_at: Timestamp,
    /// Timestamp after which the invitation is rejected.
    pub expires_at: Timestamp,
}

impl Invite {
    /// Creates an invitation response from the database model.
    pub fn from_model(invite: ProjectInvite) -> Self {
        Self {
            invite_id: invite.id,
            project_id: invite.project_id,
            invitee_email: invite.invitee_email,
            created_by: invite.created_by,
            created_at: invite.created_at.into(),
            expires_at: invite.expires_at.into(),
        }
    }
}
