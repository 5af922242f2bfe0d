//! Sign-up, sign-in, token refresh and password reset handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;

use crate::extract::{Json, ValidateJson};
use crate::handler::request::{ForgotPassword, Refresh, ResetPassword, Signin, Signup};
use crate::handler::response::AuthTokens;
use crate::handler::Result;
use crate::service::ServiceState;
use crate::service::flow::{AccountFlow, PasswordResetFlow};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "trackr_server::handler::authentication";

/// Creates an account and returns its first token pair.
#[tracing::instrument(skip_all)]
async fn signup(
    State(account_flow): State<AccountFlow>,
    ValidateJson(request): ValidateJson<Signup>,
) -> Result<(StatusCode, Json<AuthTokens>)> {
    let (account, tokens) = account_flow
        .register(&request.email_address, &request.display_name, &request.password)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "account created",
    );

    Ok((StatusCode::CREATED, Json(tokens.into())))
}

/// Exchanges credentials for a token pair.
#[tracing::instrument(skip_all)]
async fn signin(
    State(account_flow): State<AccountFlow>,
    ValidateJson(request): ValidateJson<Signin>,
) -> Result<(StatusCode, Json<AuthTokens>)> {
    let (account, tokens) = account_flow
        .login(&request.email_address, &request.password)
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "tokens issued",
    );

    Ok((StatusCode::OK, Json(tokens.into())))
}

/// Exchanges a refresh token for a new access token.
#[tracing::instrument(skip_all)]
async fn refresh(
    State(account_flow): State<AccountFlow>,
    ValidateJson(request): ValidateJson<Refresh>,
) -> Result<(StatusCode, Json<AuthTokens>)> {
    let tokens = account_flow.refresh(&request.refresh_token).await?;
    Ok((StatusCode::OK, Json(tokens.into())))
}

/// Emails a reset link. Unknown addresses get the same answer.
#[tracing::instrument(skip_all)]
async fn forgot_password(
    State(password_reset_flow): State<PasswordResetFlow>,
    ValidateJson(request): ValidateJson<ForgotPassword>,
) -> Result<StatusCode> {
    password_reset_flow
        .forgot_password(&request.email_address)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// Sets a new password using a reset token.
#[tracing::instrument(skip_all)]
async fn reset_password(
    State(password_reset_flow): State<PasswordResetFlow>,
    ValidateJson(request): ValidateJson<ResetPassword>,
) -> Result<StatusCode> {
    let account = password_reset_flow
        .reset_password(&request.token, &request.new_password)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = %account.id,
        "password reset",
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Router`] with all authentication routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
        .route("/auth/refresh", post(refresh))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
}
