//! Project creation, update and deletion handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{patch, post};

use crate::extract::{AuthAccount, Json, Path, ValidateJson};
use crate::handler::request::{CreateProject, ProjectPathParams, UpdateProject};
use crate::handler::response::Project;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;
use crate::service::security::{Action, AuthError, AuthorizationEngine};
use crate::service::store::Stores;

/// Tracing target for project operations.
const TRACING_TARGET: &str = "trackr_server::handler::projects";

/// Creates a project owned by the caller.
#[tracing::instrument(skip_all, fields(account_id = %auth_account.id))]
async fn create_project(
    State(stores): State<Stores>,
    auth_account: AuthAccount,
    ValidateJson(request): ValidateJson<CreateProject>,
) -> Result<(StatusCode, Json<Project>)> {
    let project = stores
        .projects
        .create_with_owner(request.into_model(auth_account.account_id()))
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        project_id = %project.id,
        "project created",
    );

    Ok((StatusCode::CREATED, Json(Project::from_model(project))))
}

/// Updates project fields. Only the project's owner may do this.
#[tracing::instrument(skip_all, fields(account_id = %auth_account.id, project_id = %path_params.project_id))]
async fn update_project(
    State(stores): State<Stores>,
    State(authorization): State<AuthorizationEngine>,
    auth_account: AuthAccount,
    Path(path_params): Path<ProjectPathParams>,
    ValidateJson(request): ValidateJson<UpdateProject>,
) -> Result<(StatusCode, Json<Project>)> {
    let project_id = path_params.project_id;
    let project = stores
        .projects
        .find_project(project_id)
        .await?
        .ok_or_else(|| AuthError::project_not_found(project_id))?;

    let action = Action::UpdateProject {
        owner_id: project.owner_id,
    };
    authorization
        .authorize(auth_account.account_id(), project_id, action)
        .await?;

    let changes = request.into_model();
    if changes.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("No fields to update")
            .with_resource("project"));
    }

    let project = stores.projects.update_project(project_id, changes).await?;

    tracing::info!(target: TRACING_TARGET, "project updated");
    Ok((StatusCode::OK, Json(Project::from_model(project))))
}

/// Deletes a project with its role records and invitations.
#[tracing::instrument(skip_all, fields(account_id = %auth_account.id, project_id = %path_params.project_id))]
async fn delete_project(
    State(stores): State<Stores>,
    State(authorization): State<AuthorizationEngine>,
    auth_account: AuthAccount,
    Path(path_params): Path<ProjectPathParams>,
) -> Result<StatusCode> {
    let project_id = path_params.project_id;
    if stores.projects.find_project(project_id).await?.is_none() {
        return Err(AuthError::project_not_found(project_id).into());
    }

    authorization
        .authorize(auth_account.account_id(), project_id, Action::DeleteProject)
        .await?;

    if !stores.projects.delete_project(project_id).await? {
        return Err(AuthError::project_not_found(project_id).into());
    }

    tracing::warn!(target: TRACING_TARGET, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with all project routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/projects", post(create_project))
        .route(
            "/api/projects/{projectId}",
            patch(update_project).delete(delete_project),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::handler::response::Project;
    use crate::handler::test::{create_test_context, signup};

    #[tokio::test]
    async fn create_makes_caller_owner() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let tokens = signup(&context.server, "alice@example.com").await?;

        let response = context
            .server
            .post("/api/projects")
            .authorization_bearer(&tokens.access_token)
            .json(&json!({ "displayName": "Roadmap", "description": "Q3 plans" }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let project = response.json::<Project>();
        assert_eq!(project.display_name, "Roadmap");

        let is_owner = context
            .state
            .authorization
            .is_owner(project.owner_id, project.project_id)
            .await?;
        assert!(is_owner);
        Ok(())
    }

    #[tokio::test]
    async fn only_owner_updates_and_deletes() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let owner = signup(&context.server, "alice@example.com").await?;
        let other = signup(&context.server, "bob@example.com").await?;

        let project = context
            .server
            .post("/api/projects")
            .authorization_bearer(&owner.access_token)
            .json(&json!({ "displayName": "Roadmap" }))
            .await
            .json::<Project>();
        let path = format!("/api/projects/{}", project.project_id);

        let denied = context
            .server
            .patch(&path)
            .authorization_bearer(&other.access_token)
            .json(&json!({ "displayName": "Hijacked" }))
            .await;
        denied.assert_status_forbidden();

        let updated = context
            .server
            .patch(&path)
            .authorization_bearer(&owner.access_token)
            .json(&json!({ "displayName": "Renamed" }))
            .await;
        updated.assert_status_ok();
        assert_eq!(updated.json::<Project>().display_name, "Renamed");

        let denied = context
            .server
            .delete(&path)
            .authorization_bearer(&other.access_token)
            .await;
        denied.assert_status_forbidden();

        let deleted = context
            .server
            .delete(&path)
            .authorization_bearer(&owner.access_token)
            .await;
        deleted.assert_status(axum::http::StatusCode::NO_CONTENT);

        let gone = context
            .server
            .delete(&path)
            .authorization_bearer(&owner.access_token)
            .await;
        gone.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn empty_update_is_rejected() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let owner = signup(&context.server, "alice@example.com").await?;
        let project = context
            .server
            .post("/api/projects")
            .authorization_bearer(&owner.access_token)
            .json(&json!({ "displayName": "Roadmap" }))
            .await
            .json::<Project>();

        let response = context
            .server
            .patch(&format!("/api/projects/{}", project.project_id))
            .authorization_bearer(&owner.access_token)
            .json(&json!({}))
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn invalid_project_id_is_bad_request() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let owner = signup(&context.server, "alice@example.com").await?;

        let response = context
            .server
            .delete("/api/projects/not-a-uuid")
            .authorization_bearer(&owner.access_token)
            .await;
        response.assert_status_bad_request();
        Ok(())
    }
}
