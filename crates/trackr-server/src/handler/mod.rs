//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! Public routes live under `/auth` and `/health`; everything under `/api`
//! requires a bearer token.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod accounts;
mod authentication;
mod error;
mod invites;
mod members;
mod monitors;
mod projects;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::middleware::RouterAuthExt;
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes requiring a bearer token.
fn private_routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(accounts::routes())
        .merge(projects::routes())
        .merge(members::routes())
        .merge(invites::routes())
        .with_required_authentication(state.identity_resolver.clone())
}

/// Returns a [`Router`] with all public routes.
fn public_routes() -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes())
        .merge(monitors::routes())
}

/// Returns a [`Router`] with all routes and the authentication filter.
pub fn routes(state: ServiceState) -> Router {
    Router::new()
        .merge(private_routes(&state))
        .merge(public_routes())
        .fallback(fallback)
        .with_authentication_filter(state.identity_resolver.clone())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use axum_test::TestServer;
    use serde_json::json;
    use trackr_postgres::PgConfig;

    use super::response::AuthTokens;
    use super::routes;
    use crate::service::notify::RecordingEmailSender;
    use crate::service::security::{TokenKeys, TokenKeysConfig};
    use crate::service::{ServiceConfig, ServiceState};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    /// A server over in-memory stores plus handles to inspect it.
    pub struct TestContext {
        pub server: TestServer,
        pub state: ServiceState,
        pub emails: RecordingEmailSender,
    }

    /// Returns a [`TestContext`] whose email sender uses the given mode.
    pub fn create_test_context_with(emails: RecordingEmailSender) -> anyhow::Result<TestContext> {
        let config = ServiceConfig::new(
            PgConfig::new("postgresql://localhost/trackr"),
            TokenKeysConfig::with_secret(SECRET),
        );
        let keys = TokenKeys::from_secret(SECRET)?;
        let state = ServiceState::in_memory(&config, keys, Arc::new(emails.clone()));
        let server = TestServer::new(routes(state.clone()))?;
        Ok(TestContext {
            server,
            state,
            emails,
        })
    }

    /// Returns a [`TestContext`] recording every email.
    pub fn create_test_context() -> anyhow::Result<TestContext> {
        create_test_context_with(RecordingEmailSender::new())
    }

    /// Signs up an account and returns its tokens.
    pub async fn signup(server: &TestServer, email: &str) -> anyhow::Result<AuthTokens> {
        let response = server
            .post("/auth/signup")
            .json(&json!({
                "emailAddress": email,
                "displayName": "Test User",
                "password": "correct-horse-battery",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        Ok(response.json::<AuthTokens>())
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let response = context.server.get("/nowhere").await;
        response.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn api_requires_token() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let response = context.server.get("/api/accounts/me").await;
        response.assert_status_unauthorized();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "missing_auth_token");
        Ok(())
    }
}
