//! Project invitation handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};

use crate::extract::{AuthAccount, Json, Query, ValidateJson};
use crate::handler::request::{AcceptInvite, SendInvite};
use crate::handler::response::Invite;
use crate::handler::Result;
use crate::service::ServiceState;
use crate::service::flow::InvitationFlow;
use crate::service::security::{Action, AuthError, AuthorizationEngine};
use crate::service::store::Stores;

/// Tracing target for project invite operations.
const TRACING_TARGET: &str = "trackr_server::handler::invites";

/// Invites someone to a project by email. Only the OWNER may do this.
#[tracing::instrument(skip_all, fields(account_id = %auth_account.id, project_id = %request.project_id))]
async fn send_invite(
    State(stores): State<Stores>,
    State(authorization): State<AuthorizationEngine>,
    State(invitation_flow): State<InvitationFlow>,
    auth_account: AuthAccount,
    ValidateJson(request): ValidateJson<SendInvite>,
) -> Result<(StatusCode, Json<Invite>)> {
    let project_id = request.project_id;
    if stores.projects.find_project(project_id).await?.is_none() {
        return Err(AuthError::project_not_found(project_id).into());
    }

    authorization
        .authorize(auth_account.account_id(), project_id, Action::InviteUser)
        .await?;

    let invite = invitation_flow
        .send_invitation(&request.invitee_email, project_id, auth_account.account_id())
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        invite_id = %invite.id,
        "project invite created",
    );

    Ok((StatusCode::CREATED, Json(Invite::from_model(invite))))
}

/// Redeems an invitation link for the caller, who joins as MEMBER.
#[tracing::instrument(skip_all, fields(account_id = %auth_account.id))]
async fn accept_invite(
    State(invitation_flow): State<InvitationFlow>,
    auth_account: AuthAccount,
    Query(query): Query<AcceptInvite>,
) -> Result<(StatusCode, Json<Invite>)> {
    let token = query.token.trim();
    let invite = invitation_flow.accept_invitation(token).await?;
    invitation_flow
        .redeem(token, auth_account.account_id())
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        invite_id = %invite.id,
        project_id = %invite.project_id,
        "project invite accepted",
    );

    Ok((StatusCode::ACCEPTED, Json(Invite::from_model(invite))))
}

/// Returns a [`Router`] with all project invite routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/projects/invite", post(send_invite))
        .route("/api/projects/accept_invitation", get(accept_invite))
}
