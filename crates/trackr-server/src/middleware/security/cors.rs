//! CORS (Cross-Origin Resource Sharing) middleware configuration.

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::{Error, Result};

/// Origins of the local frontend dev servers.
const LOCALHOST_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://localhost:5174",
    "http://localhost:4200",
];

/// Creates a CORS layer based on the provided configuration.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(config.to_header_values())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::AUTHORIZATION])
        .allow_credentials(config.allow_credentials)
        .max_age(config.max_age())
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// Allowed origins; empty means the localhost dev origins.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,

    /// Maximum age for preflight responses in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "CORS_MAX_AGE", default_value_t = 3600)
    )]
    pub max_age_seconds: u64,

    /// Whether browsers may send credentials.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "CORS_ALLOW_CREDENTIALS", default_value_t = true, action = clap::ArgAction::Set)
    )]
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Returns the preflight max age.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Converts configured origins to header values.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.is_empty() {
            LOCALHOST_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect()
        } else {
            self.allowed_origins
                .iter()
                .filter_map(|origin| origin.trim().parse().ok())
                .collect()
        }
    }

    /// Rejects wildcard and unparsable origins.
    ///
    /// Credentialed CORS cannot be combined with `*`.
    pub fn validate(&self) -> Result<()> {
        for origin in &self.allowed_origins {
            let origin = origin.trim();
            if origin == "*" {
                return Err(Error::config(
                    "CORS_ORIGINS must list explicit origins, not '*'",
                ));
            }

            let url = url::Url::parse(origin).map_err(|err| {
                Error::config(format!("invalid CORS origin '{origin}'")).with_source(err)
            })?;

            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::config(format!(
                    "CORS origin '{origin}' must be http or https"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[clap(flatten)]
        cors: CorsConfig,
    }

    #[test]
    fn defaults_to_localhost_origins() {
        let origins = CorsConfig::default().to_header_values();
        assert_eq!(origins.len(), 4);
        assert!(origins.contains(&HeaderValue::from_static("http://localhost:5173")));
    }

    #[test]
    fn custom_origins() {
        let config = CorsConfig {
            allowed_origins: vec![
                "https://example.com".to_owned(),
                "https://app.example.com".to_owned(),
            ],
            ..Default::default()
        };
        assert_eq!(config.to_header_values().len(), 2);
        assert!(config.validate().is_ok());
        let _layer = create_cors_layer(&config);
    }

    #[test]
    fn rejects_wildcard() {
        let config = CorsConfig {
            allowed_origins: vec!["*".to_owned()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_comma_separated_flag() -> anyhow::Result<()> {
        let cli = TestCli::try_parse_from([
            "test",
            "--allowed-origins",
            "https://a.example,https://b.example",
            "--allow-credentials",
            "false",
        ])?;
        assert_eq!(cli.cors.allowed_origins.len(), 2);
        assert!(!cli.cors.allow_credentials);
        assert_eq!(cli.cors.max_age_seconds, 3600);
        Ok(())
    }
}
