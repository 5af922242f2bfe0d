//! Project invite repository for invitation-based onboarding.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::model::{NewProjectInvite, NewProjectMember, ProjectInvite, ProjectMember};
use crate::query::ProjectMemberRepository;
use crate::types::ProjectRole;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for project invite database operations.
pub trait ProjectInviteRepository {
    /// Persists a new invitation.
    fn create_project_invite(
        &mut self,
        invite: NewProjectInvite,
    ) -> impl Future<Output = PgResult<ProjectInvite>> + Send;

    /// Finds an invitation by its redemption token.
    fn find_invite_by_token(
        &mut self,
        token: &str,
    ) -> impl Future<Output = PgResult<Option<ProjectInvite>>> + Send;

    /// Deletes an invitation by its redemption token.
    ///
    /// Returns whether an invitation was deleted.
    fn delete_invite_by_token(&mut self, token: &str)
    -> impl Future<Output = PgResult<bool>> + Send;

    /// Grants the invited account a role and deletes the invitation in one
    /// transaction.
    ///
    /// The invitation is only deleted once the membership row exists; a
    /// membership conflict rolls back and leaves the invitation in place.
    fn redeem_project_invite(
        &mut self,
        invite_id: Uuid,
        account_id: Uuid,
        role: ProjectRole,
    ) -> impl Future<Output = PgResult<ProjectMember>> + Send;
}

impl ProjectInviteRepository for PgConnection {
    async fn create_project_invite(&mut self, invite: NewProjectInvite) -> PgResult<ProjectInvite> {
        use schema::project_invites;

        let invite = diesel::insert_into(project_invites::table)
            .values(&invite)
            .returning(ProjectInvite::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(invite)
    }

    async fn find_invite_by_token(&mut self, token: &str) -> PgResult<Option<ProjectInvite>> {
        use schema::project_invites::dsl::*;

        let invite = project_invites
            .filter(invite_token.eq(token))
            .select(ProjectInvite::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(invite)
    }

    async fn delete_invite_by_token(&mut self, token: &str) -> PgResult<bool> {
        use schema::project_invites::dsl::*;

        let deleted = diesel::delete(project_invites)
            .filter(invite_token.eq(token))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn redeem_project_invite(
        &mut self,
        invite_id: Uuid,
        account_id: Uuid,
        role: ProjectRole,
    ) -> PgResult<ProjectMember> {
        self.transaction::<_, PgError, _>(|conn| {
            async move {
                use schema::project_invites::dsl::*;

                let invite = project_invites
                    .filter(id.eq(invite_id))
                    .select(ProjectInvite::as_select())
                    .for_update()
                    .first(conn)
                    .await?;

                let member = NewProjectMember::new(invite.project_id, account_id, role);
                let member = conn.add_project_member(member).await?;

                diesel::delete(project_invites)
                    .filter(id.eq(invite.id))
                    .execute(conn)
                    .await?;

                Ok(member)
            }
            .scope_boxed()
        })
        .await
    }
}
