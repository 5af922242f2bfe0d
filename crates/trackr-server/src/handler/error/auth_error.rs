//! Conversion of core authentication and authorization failures.

use crate::handler::{Error, ErrorKind};
use crate::service::security::{AuthError, Rejection};
use crate::utility::tracing_targets::HANDLER as TRACING_TARGET;

impl From<AuthError> for Error<'static> {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Malformed => ErrorKind::MalformedAuthToken.into_error(),
            AuthError::SignatureInvalid => {
                ErrorKind::Unauthorized.with_message("Token signature is invalid")
            }
            AuthError::Expired => ErrorKind::Unauthorized.with_message("Token has expired"),
            AuthError::NoSubject => ErrorKind::Unauthorized.with_message("Token has no subject"),
            AuthError::InvalidCredentials => {
                ErrorKind::Unauthorized.with_message("Invalid email or password")
            }
            AuthError::AlreadyMember => ErrorKind::Conflict
                .with_message("Account is already a member of this project")
                .with_resource("project_member"),
            AuthError::EmailTaken => ErrorKind::Conflict
                .with_message("Email already registered")
                .with_resource("account"),
            AuthError::InvalidInviteToken => ErrorKind::BadRequest
                .with_message("Invitation token is invalid or has expired")
                .with_resource("project_invite"),
            AuthError::InvalidResetToken => ErrorKind::BadRequest
                .with_message("Password reset token is invalid")
                .with_resource("password_reset_token"),
            AuthError::ExpiredResetToken => ErrorKind::BadRequest
                .with_message("Password reset token has expired")
                .with_resource("password_reset_token"),
            AuthError::PermissionDenied(reason) => ErrorKind::Forbidden.with_message(reason),
            AuthError::NotFound { entity, id } => ErrorKind::NotFound
                .with_message(format!("{} not found", capitalize(entity)))
                .with_resource(entity)
                .with_context(format!("id: {id}")),
            AuthError::Delivery(reason) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %reason,
                    "email delivery failed"
                );
                ErrorKind::BadGateway.with_message("Email could not be delivered")
            }
            AuthError::Hashing(reason) | AuthError::Signing(reason) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %reason,
                    "credential processing failed"
                );
                ErrorKind::InternalServerError.into_error()
            }
            AuthError::Storage(pg_error) => pg_error.into(),
        }
    }
}

impl From<Rejection> for Error<'static> {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::NoToken => ErrorKind::MissingAuthToken.into_error(),
            Rejection::Malformed => ErrorKind::MalformedAuthToken.into_error(),
            Rejection::SignatureInvalid => {
                ErrorKind::Unauthorized.with_message("Token signature is invalid")
            }
            Rejection::Expired => ErrorKind::Unauthorized.with_message("Token has expired"),
            Rejection::NoSubject => ErrorKind::Unauthorized.with_message("Token has no subject"),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (AuthError::Malformed, StatusCode::UNAUTHORIZED),
            (AuthError::Expired, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::permission_denied("owner only"), StatusCode::FORBIDDEN),
            (AuthError::not_found("project", 7), StatusCode::NOT_FOUND),
            (AuthError::AlreadyMember, StatusCode::CONFLICT),
            (AuthError::EmailTaken, StatusCode::CONFLICT),
            (AuthError::InvalidInviteToken, StatusCode::BAD_REQUEST),
            (AuthError::InvalidResetToken, StatusCode::BAD_REQUEST),
            (AuthError::ExpiredResetToken, StatusCode::BAD_REQUEST),
            (AuthError::Delivery("smtp down".into()), StatusCode::BAD_GATEWAY),
            (AuthError::Hashing("oom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (auth_error, status) in cases {
            let error: Error = auth_error.into();
            assert_eq!(error.kind().status_code(), status);
        }
    }

    #[test]
    fn denial_keeps_reason() {
        let error: Error = AuthError::permission_denied("only the owner can do that").into();
        assert_eq!(error.message(), Some("only the owner can do that"));
    }

    #[test]
    fn not_found_names_entity() {
        let error: Error = AuthError::not_found("project", 7).into();
        assert_eq!(error.message(), Some("Project not found"));
        assert_eq!(error.resource(), Some("project"));
        assert_eq!(error.context(), Some("id: 7"));
    }

    #[test]
    fn missing_token_rejection() {
        let error: Error = Rejection::NoToken.into();
        assert_eq!(error.kind(), ErrorKind::MissingAuthToken);
    }
}
