//! Project team handlers: listing members, assigning roles and removal.

use std::str::FromStr;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use trackr_postgres::types::ProjectRole;
use uuid::Uuid;

use crate::extract::{AuthAccount, Json, Path, ValidateJson};
use crate::handler::request::{AssignRole, MemberPathParams, ProjectPathParams};
use crate::handler::response::Member;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;
use crate::service::security::{Action, AuthError, AuthorizationEngine};
use crate::service::store::Stores;

/// Tracing target for project member operations.
const TRACING_TARGET: &str = "trackr_server::handler::members";

async fn require_project(stores: &Stores, project_id: Uuid) -> Result<()> {
    match stores.projects.find_project(project_id).await? {
        Some(_) => Ok(()),
        None => Err(AuthError::project_not_found(project_id).into()),
    }
}

/// Lists the project team. Any member may do this.
#[tracing::instrument(skip_all, fields(account_id = %auth_account.id, project_id = %path_params.project_id))]
async fn list_members(
    State(stores): State<Stores>,
    State(authorization): State<AuthorizationEngine>,
    auth_account: AuthAccount,
    Path(path_params): Path<ProjectPathParams>,
) -> Result<(StatusCode, Json<Vec<Member>>)> {
    let project_id = path_params.project_id;
    require_project(&stores, project_id).await?;
    authorization
        .authorize(auth_account.account_id(), project_id, Action::ViewMembers)
        .await?;

    let members = stores.roles.list_members(project_id).await?;
    Ok((StatusCode::OK, Json(Member::from_models(members))))
}

/// Grants a role to an account. Only the OWNER may do this.
#[tracing::instrument(skip_all, fields(account_id = %auth_account.id, project_id = %path_params.project_id))]
async fn assign_role(
    State(stores): State<Stores>,
    State(authorization): State<AuthorizationEngine>,
    auth_account: AuthAccount,
    Path(path_params): Path<ProjectPathParams>,
    ValidateJson(request): ValidateJson<AssignRole>,
) -> Result<(StatusCode, Json<Member>)> {
    let project_id = path_params.project_id;
    let role = ProjectRole::from_str(request.role.trim()).map_err(|_| {
        ErrorKind::BadRequest
            .with_message("Unknown role")
            .with_resource("project_member")
            .with_context(format!("role: {}", request.role))
    })?;

    if role.is_owner() {
        return Err(ErrorKind::BadRequest
            .with_message("The owner role cannot be assigned")
            .with_resource("project_member"));
    }

    require_project(&stores, project_id).await?;
    authorization
        .authorize(auth_account.account_id(), project_id, Action::AssignRole)
        .await?;

    if stores.users.find_by_id(request.account_id).await?.is_none() {
        return Err(AuthError::not_found("account", request.account_id).into());
    }

    let member = stores.roles.add(request.account_id, project_id, role).await?;

    tracing::info!(
        target: TRACING_TARGET,
        member_id = %member.account_id,
        role = %role,
        "role assigned",
    );

    Ok((StatusCode::CREATED, Json(Member::from_model(member))))
}

/// Removes an account's role record. Only the OWNER may do this.
#[tracing::instrument(skip_all, fields(account_id = %auth_account.id, project_id = %path_params.project_id))]
async fn remove_member(
    State(stores): State<Stores>,
    State(authorization): State<AuthorizationEngine>,
    auth_account: AuthAccount,
    Path(path_params): Path<MemberPathParams>,
) -> Result<StatusCode> {
    let MemberPathParams {
        project_id,
        account_id,
    } = path_params;

    require_project(&stores, project_id).await?;
    authorization
        .authorize(auth_account.account_id(), project_id, Action::RemoveMember)
        .await?;

    match stores.roles.find_role(account_id, project_id).await? {
        None => return Err(AuthError::not_found("project_member", account_id).into()),
        Some(role) if role.is_owner() => {
            return Err(ErrorKind::BadRequest
                .with_message("The project owner cannot be removed")
                .with_resource("project_member"));
        }
        Some(_) => {}
    }

    stores.roles.remove(account_id, project_id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        member_id = %account_id,
        "member removed",
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with all project member routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/projects/{projectId}/members", get(list_members))
        .route("/api/projects/{projectId}/roles", post(assign_role))
        .route(
            "/api/projects/{projectId}/members/{accountId}",
            delete(remove_member),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use trackr_postgres::types::ProjectRole;
    use uuid::Uuid;

    use crate::handler::response::{Account, Member, Project};
    use crate::handler::test::{TestContext, create_test_context, signup};

    struct Team {
        context: TestContext,
        owner_token: String,
        other_token: String,
        other_id: Uuid,
        project_id: Uuid,
    }

    async fn team() -> anyhow::Result<Team> {
        let context = create_test_context()?;
        let owner = signup(&context.server, "alice@example.com").await?;
        let other = signup(&context.server, "bob@example.com").await?;

        let other_id = context
            .server
            .get("/api/accounts/me")
            .authorization_bearer(&other.access_token)
            .await
            .json::<Account>()
            .account_id;

        let project_id = context
            .server
            .post("/api/projects")
            .authorization_bearer(&owner.access_token)
            .json(&json!({ "displayName": "Roadmap" }))
            .await
            .json::<Project>()
            .project_id;

        Ok(Team {
            context,
            owner_token: owner.access_token,
            other_token: other.access_token,
            other_id,
            project_id,
        })
    }

    #[tokio::test]
    async fn owner_assigns_role_case_insensitively() -> anyhow::Result<()> {
        let team = team().await?;
        let server = &team.context.server;

        let response = server
            .post(&format!("/api/projects/{}/roles", team.project_id))
            .authorization_bearer(&team.owner_token)
            .json(&json!({ "accountId": team.other_id, "role": "ADMINISTRATOR" }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let member = response.json::<Member>();
        assert_eq!(member.member_role, ProjectRole::Administrator);
        assert_eq!(member.role_name, "Administrator");

        let again = server
            .post(&format!("/api/projects/{}/roles", team.project_id))
            .authorization_bearer(&team.owner_token)
            .json(&json!({ "accountId": team.other_id, "role": "member" }))
            .await;
        again.assert_status_conflict();
        Ok(())
    }

    #[tokio::test]
    async fn non_owner_cannot_assign() -> anyhow::Result<()> {
        let team = team().await?;
        let response = team
            .context
            .server
            .post(&format!("/api/projects/{}/roles", team.project_id))
            .authorization_bearer(&team.other_token)
            .json(&json!({ "accountId": team.other_id, "role": "member" }))
            .await;
        response.assert_status_forbidden();
        Ok(())
    }

    #[tokio::test]
    async fn owner_role_and_unknown_roles_are_rejected() -> anyhow::Result<()> {
        let team = team().await?;
        let server = &team.context.server;

        for role in ["owner", "superuser"] {
            let response = server
                .post(&format!("/api/projects/{}/roles", team.project_id))
                .authorization_bearer(&team.owner_token)
                .json(&json!({ "accountId": team.other_id, "role": role }))
                .await;
            response.assert_status_bad_request();
        }
        Ok(())
    }

    #[tokio::test]
    async fn assigning_to_unknown_account_is_not_found() -> anyhow::Result<()> {
        let team = team().await?;
        let response = team
            .context
            .server
            .post(&format!("/api/projects/{}/roles", team.project_id))
            .authorization_bearer(&team.owner_token)
            .json(&json!({ "accountId": Uuid::nil(), "role": "member" }))
            .await;
        response.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn members_list_is_team_only() -> anyhow::Result<()> {
        let team = team().await?;
        let server = &team.context.server;
        let path = format!("/api/projects/{}/members", team.project_id);

        let outsider = server
            .get(&path)
            .authorization_bearer(&team.other_token)
            .await;
        outsider.assert_status_forbidden();

        let members = server
            .get(&path)
            .authorization_bearer(&team.owner_token)
            .await;
        members.assert_status_ok();
        let members = members.json::<Vec<Member>>();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].member_role, ProjectRole::Owner);
        Ok(())
    }

    #[tokio::test]
    async fn owner_removes_member_but_not_self() -> anyhow::Result<()> {
        let team = team().await?;
        let server = &team.context.server;

        server
            .post(&format!("/api/projects/{}/roles", team.project_id))
            .authorization_bearer(&team.owner_token)
            .json(&json!({ "accountId": team.other_id, "role": "member" }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let path = format!("/api/projects/{}/members/{}", team.project_id, team.other_id);
        let removed = server
            .delete(&path)
            .authorization_bearer(&team.owner_token)
            .await;
        removed.assert_status(axum::http::StatusCode::NO_CONTENT);

        let missing = server
            .delete(&path)
            .authorization_bearer(&team.owner_token)
            .await;
        missing.assert_status_not_found();

        let owner_id = server
            .get("/api/accounts/me")
            .authorization_bearer(&team.owner_token)
            .await
            .json::<Account>()
            .account_id;
        let self_removal = server
            .delete(&format!("/api/projects/{}/members/{}", team.project_id, owner_id))
            .authorization_bearer(&team.owner_token)
            .await;
        self_removal.assert_status_bad_request();
        Ok(())
    }
}
