//! Password hashing and verification using Argon2id.

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::rngs::OsRng;

use super::{AuthError, AuthResult};
use crate::utility::tracing_targets::PASSWORD_HASHER as TRACING_TARGET;

/// Argon2id password hashing service.
///
/// Hashes are PHC strings carrying the algorithm, parameters and salt, so
/// they can be stored as-is and verified later without extra state.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hashes a password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        let salt = SaltString::try_from_rng(&mut OsRng).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to generate salt"
            );
            AuthError::Hashing("salt generation failed".into())
        })?;

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing failed"
                );
                AuthError::Hashing(e.to_string())
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored PHC hash.
    ///
    /// A wrong password yields [`AuthError::InvalidCredentials`]; an
    /// unreadable hash is reported as a hashing failure.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> AuthResult<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "stored password hash is unreadable"
            );
            AuthError::Hashing(e.to_string())
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "password verification failed"
                );
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification error"
                );
                Err(AuthError::Hashing(e.to_string()))
            }
        }
    }

    /// Runs a verification against a throwaway hash and always returns `false`.
    ///
    /// Used when no account matches, so sign-in takes about as long for
    /// unknown emails as for known ones.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        let dummy: [u8; 24] = rand::random();
        let dummy_password = base64::Engine::encode(
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
            dummy,
        );

        if let Ok(dummy_hash) = self.hash_password(&dummy_password) {
            let _ = self.verify_password(password, &dummy_hash);
        }

        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("secure_password_123")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("secure_password_123", &hash).is_ok());
        assert!(matches!(
            hasher.verify_password("wrong_password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let first = hasher.hash_password("test_password")?;
        let second = hasher.hash_password("test_password")?;

        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn unreadable_hash_is_not_a_credential_error() {
        let hasher = PasswordHasher::new();
        assert!(matches!(
            hasher.verify_password("password", "invalid_hash_format"),
            Err(AuthError::Hashing(_))
        ));
    }

    #[test]
    fn dummy_verification_never_succeeds() {
        assert!(!PasswordHasher::new().verify_dummy_password("anything"));
    }
}
