//! Middleware configuration for the HTTP server.

use clap::Args;
use serde::{Deserialize, Serialize};
use trackr_server::middleware::CorsConfig;

use crate::TRACING_TARGET_CONFIG;

/// HTTP middleware settings exposed on the command line.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Cross-origin settings for browser clients.
    #[clap(flatten)]
    pub cors: CorsConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            max_age_secs = self.cors.max_age_seconds,
            "CORS configuration"
        );
    }
}
