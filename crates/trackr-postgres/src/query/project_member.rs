//! Project member repository, the authoritative source of project roles.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewProjectMember, ProjectMember};
use crate::types::ProjectRole;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for project membership database operations.
pub trait ProjectMemberRepository {
    /// Adds a member to a project.
    ///
    /// Fails with a unique violation on `project_members_pkey` when the
    /// account already has a role in the project.
    fn add_project_member(
        &mut self,
        member: NewProjectMember,
    ) -> impl Future<Output = PgResult<ProjectMember>> + Send;

    /// Gets an account's role in a project, `None` if it is not a member.
    fn find_member_role(
        &mut self,
        project_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ProjectRole>>> + Send;

    /// Removes a member from a project.
    ///
    /// Returns whether a membership was removed.
    fn remove_project_member(
        &mut self,
        project_id: Uuid,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists members of a project ordered by join date.
    fn list_project_members(
        &mut self,
        project_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<ProjectMember>>> + Send;
}

impl ProjectMemberRepository for PgConnection {
    async fn add_project_member(&mut self, member: NewProjectMember) -> PgResult<ProjectMember> {
        use schema::project_members;

        let member = diesel::insert_into(project_members::table)
            .values(&member)
            .returning(ProjectMember::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(member)
    }

    async fn find_member_role(
        &mut self,
        proj_id: Uuid,
        member_account_id: Uuid,
    ) -> PgResult<Option<ProjectRole>> {
        use schema::project_members::dsl::*;

        let role = project_members
            .filter(project_id.eq(proj_id))
            .filter(account_id.eq(member_account_id))
            .select(member_role)
            .first::<ProjectRole>(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(role)
    }

    async fn remove_project_member(
        &mut self,
        proj_id: Uuid,
        member_account_id: Uuid,
    ) -> PgResult<bool> {
        use schema::project_members::dsl::*;

        let removed = diesel::delete(project_members)
            .filter(project_id.eq(proj_id))
            .filter(account_id.eq(member_account_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(removed > 0)
    }

    async fn list_project_members(
        &mut self,
        proj_id: Uuid,
        pagination: Pagination,
    ) -> PgResult<Vec<ProjectMember>> {
        use schema::project_members::dsl::*;

        let members = project_members
            .filter(project_id.eq(proj_id))
            .order((created_at.asc(), account_id.asc()))
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(ProjectMember::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        Ok(members)
    }
}
