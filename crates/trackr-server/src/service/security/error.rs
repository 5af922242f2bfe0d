//! Domain errors of the authentication and authorization core.

use std::borrow::Cow;

use trackr_postgres::PgError;
use uuid::Uuid;

/// Result type for the authentication and authorization core.
pub type AuthResult<T, E = AuthError> = std::result::Result<T, E>;

/// Failure of a token check, a permission decision or a flow step.
///
/// Token failures (`Malformed`, `SignatureInvalid`, `Expired`, `NoSubject`)
/// leave a request unauthenticated. The remaining variants surface to the
/// caller as user-visible failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token is not three non-empty segments or its payload cannot be decoded.
    #[error("token is malformed")]
    Malformed,

    /// Token signature does not match its header and payload.
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// Token expiry is at or before the current time.
    #[error("token has expired")]
    Expired,

    /// Token verified but carries no subject.
    #[error("token has no subject")]
    NoSubject,

    /// The account already holds a role in the project.
    #[error("account is already a member of the project")]
    AlreadyMember,

    /// Invitation token is unknown, already used or expired.
    #[error("invitation token is invalid")]
    InvalidInviteToken,

    /// The caller may not perform the action.
    #[error("permission denied: {0}")]
    PermissionDenied(Cow<'static, str>),

    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of entity, e.g. `"project"`.
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Email and password do not match a registered account.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email address is already registered.
    #[error("email address is already registered")]
    EmailTaken,

    /// Password reset token is unknown or already used.
    #[error("password reset token is invalid")]
    InvalidResetToken,

    /// Password reset token has expired.
    #[error("password reset token has expired")]
    ExpiredResetToken,

    /// Email delivery failed.
    #[error("email delivery failed: {0}")]
    Delivery(String),

    /// Password hashing or salt generation failed.
    #[error("password processing failed: {0}")]
    Hashing(String),

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),

    /// Underlying storage failure.
    #[error(transparent)]
    Storage(#[from] PgError),
}

impl AuthError {
    /// Creates a [`AuthError::PermissionDenied`] with a human-readable reason.
    #[inline]
    pub fn permission_denied(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::PermissionDenied(reason.into())
    }

    /// Creates a [`AuthError::NotFound`] for the given entity and identifier.
    #[inline]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a [`AuthError::NotFound`] for a project.
    #[inline]
    pub fn project_not_found(project_id: Uuid) -> Self {
        Self::not_found("project", project_id)
    }

    /// Returns whether this is a token verification failure.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::Malformed | Self::SignatureInvalid | Self::Expired | Self::NoSubject
        )
    }
}
