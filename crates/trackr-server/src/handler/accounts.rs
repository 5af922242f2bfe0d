//! Handlers for the caller's own account.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;

use crate::extract::{AuthAccount, Json};
use crate::handler::Result;
use crate::handler::response::Account;
use crate::service::ServiceState;

/// Returns the authenticated caller's account.
#[tracing::instrument(skip_all, fields(account_id = %auth_account.id))]
async fn get_own_account(auth_account: AuthAccount) -> Result<(StatusCode, Json<Account>)> {
    let AuthAccount(account) = auth_account;
    Ok((StatusCode::OK, Json(Account::from_model(account))))
}

/// Returns a [`Router`] with all account routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/api/accounts/me", get(get_own_account))
}

#[cfg(test)]
mod tests {
    use crate::handler::response::Account;
    use crate::handler::test::{create_test_context, signup};

    #[tokio::test]
    async fn returns_own_account() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let tokens = signup(&context.server, "alice@example.com").await?;

        let response = context
            .server
            .get("/api/accounts/me")
            .authorization_bearer(&tokens.access_token)
            .await;
        response.assert_status_ok();

        let account = response.json::<Account>();
        assert_eq!(account.email_address, "alice@example.com");
        assert_eq!(account.display_name, "Test User");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let response = context
            .server
            .get("/api/accounts/me")
            .authorization_bearer("only.two")
            .await;
        response.assert_status_unauthorized();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["name"], "malformed_auth_token");
        Ok(())
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() -> anyhow::Result<()> {
        let context = create_test_context()?;
        let tokens = signup(&context.server, "alice@example.com").await?;

        let mut tampered = tokens.access_token.clone();
        tampered.push('x');

        let response = context
            .server
            .get("/api/accounts/me")
            .authorization_bearer(&tampered)
            .await;
        response.assert_status_unauthorized();
        Ok(())
    }
}
