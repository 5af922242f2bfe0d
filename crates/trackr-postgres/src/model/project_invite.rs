//! Project invite model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::project_invites;

/// An outstanding one-time invitation to join a project.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = project_invites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectInvite {
    /// Unique invite identifier.
    pub id: Uuid,
    /// Project the invitee is invited to.
    pub project_id: Uuid,
    /// Email address the invitation was sent to.
    pub invitee_email: String,
    /// Random redemption token.
    pub invite_token: String,
    /// Account that sent the invitation.
    pub created_by: Uuid,
    /// Timestamp when the invitation was created.
    pub created_at: Timestamp,
    /// Timestamp after which the invitation can no longer be redeemed.
    pub expires_at: Timestamp,
}

/// Data for creating a new project invite.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = project_invites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProjectInvite {
    /// Invite ID.
    pub id: Uuid,
    /// Project ID.
    pub project_id: Uuid,
    /// Invitee email address.
    pub invitee_email: String,
    /// Redemption token.
    pub invite_token: String,
    /// Inviting account.
    pub created_by: Uuid,
    /// Expiration timestamp.
    pub expires_at: Timestamp,
}

impl ProjectInvite {
    /// Returns whether the invitation has expired at the given instant.
    #[inline]
    pub fn is_expired_at(&self, now: jiff::Timestamp) -> bool {
        jiff::Timestamp::from(self.expires_at) <= now
    }
}
