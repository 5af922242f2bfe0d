//! Project repository for project lifecycle operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::model::{NewProject, NewProjectMember, Project, UpdateProject};
use crate::query::ProjectMemberRepository;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for project database operations.
pub trait ProjectRepository {
    /// Creates a project together with its owner membership.
    ///
    /// Both rows are written in one transaction, so a project never exists
    /// without exactly one owner record.
    fn create_project_with_owner(
        &mut self,
        project: NewProject,
    ) -> impl Future<Output = PgResult<Project>> + Send;

    /// Finds a project by its identifier.
    fn find_project_by_id(
        &mut self,
        project_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Project>>> + Send;

    /// Applies partial changes to a project.
    fn update_project(
        &mut self,
        project_id: Uuid,
        changes: UpdateProject,
    ) -> impl Future<Output = PgResult<Project>> + Send;

    /// Deletes a project; memberships and invites are removed by cascade.
    ///
    /// Returns whether a project was deleted.
    fn delete_project(&mut self, project_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;
}

impl ProjectRepository for PgConnection {
    async fn create_project_with_owner(&mut self, project: NewProject) -> PgResult<Project> {
        let project = self
            .transaction::<_, PgError, _>(|conn| {
                async move {
                    use schema::projects;

                    let project = diesel::insert_into(projects::table)
                        .values(&project)
                        .returning(Project::as_returning())
                        .get_result(conn)
                        .await?;

                    let owner = NewProjectMember::new_owner(project.id, project.owner_id);
                    conn.add_project_member(owner).await?;

                    Ok(project)
                }
                .scope_boxed()
            })
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            project_id = %project.id,
            owner_id = %project.owner_id,
            "Project created with owner membership"
        );

        Ok(project)
    }

    async fn find_project_by_id(&mut self, project_id: Uuid) -> PgResult<Option<Project>> {
        use schema::projects::dsl::*;

        let project = projects
            .filter(id.eq(project_id))
            .select(Project::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(project)
    }

    async fn update_project(
        &mut self,
        project_id: Uuid,
        changes: UpdateProject,
    ) -> PgResult<Project> {
        use schema::projects::dsl::*;

        let changes = UpdateProject {
            updated_at: Some(jiff::Timestamp::now().into()),
            ..changes
        };

        let project = diesel::update(projects)
            .filter(id.eq(project_id))
            .set(&changes)
            .returning(Project::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(project)
    }

    async fn delete_project(&mut self, project_id: Uuid) -> PgResult<bool> {
        use schema::projects::dsl::*;

        let deleted = diesel::delete(projects)
            .filter(id.eq(project_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }
}
