//! Service configuration.

use std::time::Duration;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};
use trackr_postgres::{PgClient, PgClientExt, PgConfig};
use url::Url;

use crate::service::security::{TokenKeys, TokenKeysConfig};
use crate::utility::tracing_targets::SERVICE as TRACING_TARGET;
use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Default public origin used to build emailed links.
    pub const PUBLIC_BASE_URL: &str = "http://localhost:5173";

    /// Default invitation lifetime in hours (7 days).
    pub const INVITE_TTL_HOURS: u64 = 168;

    pub fn public_base_url() -> String {
        PUBLIC_BASE_URL.to_owned()
    }

    pub fn invite_ttl_hours() -> u64 {
        INVITE_TTL_HOURS
    }
}

/// Upper bound for the invitation lifetime (30 days).
const MAX_INVITE_TTL_HOURS: u64 = 720;

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Postgres connection and pool settings.
    #[cfg_attr(any(test, feature = "config"), clap(flatten))]
    pub postgres: PgConfig,

    /// Token signing secret.
    #[cfg_attr(any(test, feature = "config"), clap(flatten))]
    #[serde(skip)]
    pub token_keys: TokenKeysConfig,

    /// Public origin of the web client, used in invitation and reset links.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "PUBLIC_BASE_URL", default_value = defaults::PUBLIC_BASE_URL)
    )]
    #[serde(default = "defaults::public_base_url")]
    pub public_base_url: String,

    /// Lifetime of project invitations in hours.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "INVITE_TTL_HOURS", default_value_t = defaults::INVITE_TTL_HOURS)
    )]
    #[serde(default = "defaults::invite_ttl_hours")]
    pub invite_ttl_hours: u64,
}

impl ServiceConfig {
    /// Creates a configuration with default link and invitation settings.
    pub fn new(postgres: PgConfig, token_keys: TokenKeysConfig) -> Self {
        Self {
            postgres,
            token_keys,
            public_base_url: defaults::public_base_url(),
            invite_ttl_hours: defaults::INVITE_TTL_HOURS,
        }
    }

    /// Sets the public origin used in emailed links.
    pub fn with_public_base_url(mut self, public_base_url: impl Into<String>) -> Self {
        self.public_base_url = public_base_url.into();
        self
    }

    /// Sets the invitation lifetime in hours.
    pub fn with_invite_ttl_hours(mut self, hours: u64) -> Self {
        self.invite_ttl_hours = hours;
        self
    }

    /// Returns the public origin without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }

    /// Returns the invitation lifetime.
    #[inline]
    pub fn invite_ttl(&self) -> Duration {
        Duration::from_secs(self.invite_ttl_hours * 3600)
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - the Postgres settings are invalid
    /// - no token secret source is configured
    /// - the public base URL is not an absolute http(s) URL
    /// - the invitation lifetime is zero or longer than 30 days
    pub fn validate(&self) -> Result<()> {
        self.postgres
            .validate()
            .map_err(|e| Error::config(e.to_string()))?;

        if self.token_keys.auth_secret.is_none() && self.token_keys.auth_secret_file.is_none() {
            return Err(Error::config(
                "either AUTH_JWT_SECRET or AUTH_JWT_SECRET_FILE must be set",
            ));
        }

        let base_url = Url::parse(&self.public_base_url)
            .map_err(|e| Error::config("public base URL is not a valid URL").with_source(e))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::config("public base URL must use http or https"));
        }

        if !(1..=MAX_INVITE_TTL_HOURS).contains(&self.invite_ttl_hours) {
            return Err(Error::config(format!(
                "invite TTL must be between 1 and {MAX_INVITE_TTL_HOURS} hours"
            )));
        }

        Ok(())
    }

    /// Connects to Postgres and runs pending migrations.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        let pg_client = PgClient::new(self.postgres.clone()).map_err(|e| {
            Error::external("postgres", "failed to create database client").with_source(e)
        })?;

        let migrations = pg_client.run_pending_migrations().await.map_err(|e| {
            Error::external("postgres", "failed to apply database migrations").with_source(e)
        })?;

        tracing::info!(
            target: TRACING_TARGET,
            applied = !migrations.is_no_op(),
            version = ?migrations.last_applied_version(),
            "Database ready",
        );

        Ok(pg_client)
    }

    /// Loads the token signing keys.
    pub async fn load_token_keys(&self) -> Result<TokenKeys> {
        TokenKeys::from_config(&self.token_keys).await
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config() -> ServiceConfig {
        ServiceConfig::new(
            PgConfig::new("postgresql://localhost/trackr"),
            TokenKeysConfig::with_secret(SECRET),
        )
    }

    #[derive(Parser)]
    struct TestCli {
        #[clap(flatten)]
        service: ServiceConfig,
    }

    #[test]
    fn defaults_are_valid() {
        let config = config();
        assert!(config.validate().is_ok());
        assert_eq!(config.invite_ttl(), Duration::from_secs(7 * 24 * 3600));
        assert_eq!(config.base_url(), "http://localhost:5173");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = config().with_public_base_url("https://app.trackr.dev/");
        assert_eq!(config.base_url(), "https://app.trackr.dev");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(config().with_public_base_url("not a url").validate().is_err());
        assert!(config().with_public_base_url("ftp://x.dev").validate().is_err());
        assert!(config().with_invite_ttl_hours(0).validate().is_err());
        assert!(config().with_invite_ttl_hours(10_000).validate().is_err());

        let no_secret = ServiceConfig::new(
            PgConfig::new("postgresql://localhost/trackr"),
            TokenKeysConfig::default(),
        );
        assert!(no_secret.validate().is_err());
    }

    #[test]
    fn parses_from_arguments() {
        let cli = TestCli::try_parse_from([
            "trackr",
            "--postgres-url",
            "postgresql://localhost/trackr",
            "--auth-secret",
            SECRET,
            "--invite-ttl-hours",
            "24",
        ])
        .unwrap();

        assert_eq!(cli.service.invite_ttl_hours, 24);
        assert_eq!(cli.service.postgres.postgres_max_connections, 10);
        assert!(cli.service.validate().is_ok());
    }
}
