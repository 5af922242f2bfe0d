//! Request authentication filter and the guard for protected routes.

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::extract::{AuthPrincipal, Authentication};
use crate::service::security::IdentityResolver;
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// Extension trait for `axum::`[`Router`] to apply authentication middleware.
pub trait RouterAuthExt<S> {
    /// Resolves the caller of every request into an [`Authentication`]
    /// extension. Requests always proceed.
    fn with_authentication_filter(self, resolver: IdentityResolver) -> Self;

    /// Refuses matched routes with 401 unless a caller is attached.
    fn with_required_authentication(self, resolver: IdentityResolver) -> Self;
}

impl<S> RouterAuthExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_authentication_filter(self, resolver: IdentityResolver) -> Self {
        self.layer(from_fn_with_state(resolver, authenticate_request))
    }

    fn with_required_authentication(self, resolver: IdentityResolver) -> Self {
        self.route_layer(from_fn_with_state(resolver, require_authentication))
    }
}

/// Attaches the [`Authentication`] outcome to the request.
///
/// Never touches storage or the network and never short-circuits.
pub async fn authenticate_request(
    State(resolver): State<IdentityResolver>,
    mut request: Request,
    next: Next,
) -> Response {
    let authentication = Authentication::from_headers(request.headers(), &resolver);

    if let Some(principal) = authentication.principal() {
        tracing::trace!(
            target: TRACING_TARGET,
            subject = principal.subject(),
            "request authenticated"
        );
    }

    request.extensions_mut().insert(authentication);
    next.run(request).await
}

/// Requires an authenticated caller to proceed with the request.
pub async fn require_authentication(
    AuthPrincipal(_): AuthPrincipal,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;
    use crate::service::security::{TokenCodec, TokenKeys};

    async fn whoami(authentication: Authentication) -> String {
        match authentication.principal() {
            Some(principal) => principal.subject().to_owned(),
            None => "anonymous".to_owned(),
        }
    }

    fn resolver() -> anyhow::Result<IdentityResolver> {
        let keys = TokenKeys::from_secret("0123456789abcdef0123456789abcdef")?;
        Ok(IdentityResolver::new(TokenCodec::new(keys)))
    }

    fn app(resolver: IdentityResolver) -> Router {
        let protected = Router::new()
            .route("/api/whoami", get(whoami))
            .with_required_authentication(resolver.clone());

        Router::new()
            .route("/public", get(whoami))
            .merge(protected)
            .with_authentication_filter(resolver.clone())
            .with_state(resolver)
    }

    #[tokio::test]
    async fn public_route_proceeds_without_token() -> anyhow::Result<()> {
        let server = TestServer::new(app(resolver()?))?;
        let response = server.get("/public").await;
        response.assert_status_ok();
        response.assert_text("anonymous");
        Ok(())
    }

    #[tokio::test]
    async fn protected_route_requires_token() -> anyhow::Result<()> {
        let server = TestServer::new(app(resolver()?))?;
        let response = server.get("/api/whoami").await;
        response.assert_status_unauthorized();

        let response = server
            .get("/api/whoami")
            .authorization_bearer("a.b")
            .await;
        response.assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn protected_route_sees_principal() -> anyhow::Result<()> {
        let resolver = resolver()?;
        let token = resolver
            .codec()
            .issue("a@x.com", "ROLE_USER", Duration::from_secs(60))?;

        let server = TestServer::new(app(resolver))?;
        let response = server.get("/api/whoami").authorization_bearer(token).await;
        response.assert_status_ok();
        response.assert_text("a@x.com");
        Ok(())
    }
}
