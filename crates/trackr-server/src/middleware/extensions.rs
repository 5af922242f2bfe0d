//! Extension traits for `axum::Router` to easily apply middleware layers.

use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::HeaderValue;
use axum::http::header;
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::middleware::error_handling::{catch_panic, handle_error};
use crate::middleware::observability::{
    create_propagate_request_id_layer, create_request_id_layer, create_sensitive_headers_layer,
    create_trace_layer,
};
use crate::middleware::security::{CorsConfig, create_cors_layer};

/// Extension trait for `axum::`[`Router`] for layering middleware.
pub trait RouterExt<S> {
    /// Layers [`HandleError`], [`CatchPanic`] and [`Timeout`] middlewares.
    ///
    /// [`HandleError`]: axum::error_handling::HandleErrorLayer
    /// [`CatchPanic`]: tower_http::catch_panic::CatchPanicLayer
    /// [`Timeout`]: tower::timeout::TimeoutLayer
    fn with_error_handling_layer(self, timeout: Duration) -> Self;

    /// Layers [`SetRequestId`], [`Trace`] and [`PropagateRequestId`] middlewares
    /// and redacts credential headers.
    ///
    /// [`SetRequestId`]: tower_http::request_id::SetRequestIdLayer
    /// [`Trace`]: tower_http::trace::TraceLayer
    /// [`PropagateRequestId`]: tower_http::request_id::PropagateRequestIdLayer
    fn with_observability_layer(self) -> Self;

    /// Layers CORS and the `nosniff`/`DENY` response headers.
    fn with_security_layer(self, cors_config: &CorsConfig) -> Self;

    /// Same as [`RouterExt::with_security_layer`] with the localhost dev origins.
    fn with_default_security_layer(self) -> Self;
}

impl<S> RouterExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_error_handling_layer(self, timeout: Duration) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_error))
            .layer(CatchPanicLayer::custom(catch_panic))
            .layer(TimeoutLayer::new(timeout));

        self.layer(middlewares)
    }

    fn with_observability_layer(self) -> Self {
        // Last layer wraps first.
        self.layer(create_propagate_request_id_layer())
            .layer(create_sensitive_headers_layer())
            .layer(create_trace_layer())
            .layer(create_request_id_layer())
    }

    fn with_security_layer(self, cors_config: &CorsConfig) -> Self {
        self.layer(create_cors_layer(cors_config))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
    }

    fn with_default_security_layer(self) -> Self {
        self.with_security_layer(&CorsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_millis(200)).await;
        "done"
    }

    async fn boom() -> &'static str {
        panic!("handler exploded")
    }

    fn app() -> Router {
        Router::new()
            .route("/slow", get(slow))
            .route("/boom", get(boom))
            .route("/ok", get(|| async { "ok" }))
            .with_error_handling_layer(Duration::from_millis(20))
            .with_observability_layer()
            .with_default_security_layer()
    }

    #[tokio::test]
    async fn timeout_becomes_error_response() -> anyhow::Result<()> {
        let server = TestServer::new(app())?;
        let response = server.get("/slow").await;
        response.assert_status_internal_server_error();
        Ok(())
    }

    #[tokio::test]
    async fn panic_becomes_error_response() -> anyhow::Result<()> {
        let server = TestServer::new(app())?;
        let response = server.get("/boom").await;
        response.assert_status_internal_server_error();
        Ok(())
    }

    #[tokio::test]
    async fn responses_carry_request_id_and_headers() -> anyhow::Result<()> {
        let server = TestServer::new(app())?;
        let response = server.get("/ok").await;
        response.assert_status_ok();
        let headers = response.headers();
        assert!(headers.contains_key("x-request-id"));
        assert_eq!(
            headers.get(header::X_CONTENT_TYPE_OPTIONS),
            Some(&HeaderValue::from_static("nosniff"))
        );
        Ok(())
    }
}
