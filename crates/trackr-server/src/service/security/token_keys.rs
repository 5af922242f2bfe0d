//! Signing secret management for access and refresh tokens.
//!
//! Tokens are signed with HMAC-SHA256. The shared secret is read once at
//! startup, either directly from `AUTH_JWT_SECRET` or from the file named by
//! `AUTH_JWT_SECRET_FILE`, and is then shared by every request handler.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::Deserialize;

use crate::utility::tracing_targets::TOKEN_KEYS as TRACING_TARGET;
use crate::{Error, Result};

/// Signing secret configuration.
///
/// Exactly one source must be set; the inline secret wins when both are.
#[derive(Clone, Default, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct TokenKeysConfig {
    /// Shared HMAC secret used to sign and verify tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_JWT_SECRET", hide_env_values = true)
    )]
    #[serde(default)]
    pub auth_secret: Option<String>,

    /// File containing the shared HMAC secret.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "AUTH_JWT_SECRET_FILE")
    )]
    #[serde(default)]
    pub auth_secret_file: Option<PathBuf>,
}

impl TokenKeysConfig {
    /// Creates a configuration with an inline secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            auth_secret: Some(secret.into()),
            auth_secret_file: None,
        }
    }

    /// Creates a configuration that reads the secret from a file.
    pub fn with_secret_file(path: impl AsRef<Path>) -> Self {
        Self {
            auth_secret: None,
            auth_secret_file: Some(path.as_ref().to_path_buf()),
        }
    }
}

impl fmt::Debug for TokenKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeysConfig")
            .field("auth_secret", &self.auth_secret.as_ref().map(|_| "<redacted>"))
            .field("auth_secret_file", &self.auth_secret_file)
            .finish()
    }
}

/// Keys used to sign and verify tokens.
///
/// Cheap to clone; the key material is shared behind an [`Arc`].
#[derive(Clone)]
pub struct TokenKeys {
    inner: Arc<TokenKeysInner>,
}

struct TokenKeysInner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenKeys {
    /// Shortest accepted secret, in bytes.
    pub const MIN_SECRET_LEN: usize = 32;

    /// Loads the signing secret from the provided configuration.
    pub async fn from_config(config: &TokenKeysConfig) -> Result<Self> {
        if let Some(secret) = &config.auth_secret {
            tracing::debug!(
                target: TRACING_TARGET,
                "loading signing secret from environment",
            );
            return Self::from_secret(secret.as_bytes());
        }

        let Some(path) = &config.auth_secret_file else {
            return Err(Error::config(
                "either AUTH_JWT_SECRET or AUTH_JWT_SECRET_FILE must be set",
            ));
        };

        let secret = Self::load_secret_file(path).await?;
        Self::from_secret(&secret)
    }

    /// Creates keys from raw secret bytes.
    ///
    /// Surrounding whitespace is ignored, so a trailing newline in a secret
    /// file does not change the key.
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref().trim_ascii();
        if secret.len() < Self::MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "signing secret must be at least {} bytes",
                Self::MIN_SECRET_LEN
            )));
        }

        let inner = Arc::new(TokenKeysInner {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        });

        tracing::info!(
            target: TRACING_TARGET,
            secret_len = secret.len(),
            "signing keys loaded",
        );

        Ok(Self { inner })
    }

    /// Returns the key used to sign tokens.
    #[inline]
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.inner.encoding_key
    }

    /// Returns the key used to verify tokens.
    #[inline]
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.inner.decoding_key
    }

    async fn load_secret_file(path: &Path) -> Result<Vec<u8>> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            "loading signing secret from file",
        );

        tokio::fs::read(path).await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                path = %path.display(),
                error = %e,
                "failed to read signing secret file",
            );
            Error::file_system("failed to read signing secret file").with_source(e)
        })
    }
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn accepts_long_secret() {
        assert!(TokenKeys::from_secret(SECRET).is_ok());
    }

    #[test]
    fn rejects_short_secret() {
        let error = TokenKeys::from_secret("too-short").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn loads_secret_from_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("jwt.secret");
        fs::write(&path, format!("{SECRET}\n"))?;

        let config = TokenKeysConfig::with_secret_file(&path);
        TokenKeys::from_config(&config).await?;
        Ok(())
    }

    #[tokio::test]
    async fn reject_missing_file() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let config = TokenKeysConfig::with_secret_file(temp_dir.path().join("missing"));

        let error = TokenKeys::from_config(&config).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FileSystem);
        Ok(())
    }

    #[tokio::test]
    async fn reject_missing_source() {
        let error = TokenKeys::from_config(&TokenKeysConfig::default())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn debug_redacts_secret() {
        let config = TokenKeysConfig::with_secret(SECRET);
        assert!(!format!("{config:?}").contains(SECRET));
    }
}
