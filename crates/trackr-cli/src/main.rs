#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use trackr_server::handler::routes;
use trackr_server::middleware::RouterExt;
use trackr_server::service::{ServiceConfig, ServiceState};

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "trackr_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "trackr_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "trackr_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    Cli::init_tracing().context("failed to initialize tracing")?;

    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli.service).await?;
    let router = create_router(state, &cli);

    server::serve(router, cli.server).await?;
    Ok(())
}

/// Creates the service state from configuration.
async fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(config)
        .await
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Error handling (outermost): panics and request timeouts
/// 2. Observability: request IDs and tracing spans
/// 3. Security: CORS and response headers
/// 4. Routes (innermost): authentication filter and handlers
fn create_router(state: ServiceState, cli: &Cli) -> Router {
    let MiddlewareConfig { cors } = &cli.middleware;

    routes(state)
        .with_security_layer(cors)
        .with_observability_layer()
        .with_error_handling_layer(cli.server.request_timeout())
}
