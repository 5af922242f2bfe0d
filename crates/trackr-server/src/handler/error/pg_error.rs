//! Database error and constraint violation to HTTP error conversion.

use trackr_postgres::PgError;
use trackr_postgres::types::{
    AccountConstraints, ConstraintViolation, PasswordResetTokenConstraints, ProjectConstraints,
    ProjectInviteConstraints, ProjectMemberConstraints,
};

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "trackr_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::Account(c) => c.into(),
            ConstraintViolation::Project(c) => c.into(),
            ConstraintViolation::ProjectMember(c) => c.into(),
            ConstraintViolation::ProjectInvite(c) => c.into(),
            ConstraintViolation::PasswordResetToken(c) => c.into(),
        }
    }
}

impl From<AccountConstraints> for Error<'static> {
    fn from(c: AccountConstraints) -> Self {
        let error = match c {
            AccountConstraints::EmailAddressLength => ErrorKind::BadRequest
                .with_message("Email address must be between 3 and 254 characters"),
            AccountConstraints::DisplayNameLength => ErrorKind::BadRequest
                .with_message("Display name must be between 1 and 64 characters"),
            AccountConstraints::EmailAddressUnique => {
                ErrorKind::Conflict.with_message("Email already registered")
            }
            AccountConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("account")
    }
}

impl From<ProjectConstraints> for Error<'static> {
    fn from(c: ProjectConstraints) -> Self {
        let error = match c {
            ProjectConstraints::DisplayNameLength => ErrorKind::BadRequest
                .with_message("Project name must be between 1 and 128 characters"),
            ProjectConstraints::DescriptionLength => ErrorKind::BadRequest
                .with_message("Project description cannot exceed 4096 characters"),
            ProjectConstraints::OwnerReference => {
                ErrorKind::NotFound.with_message("Project owner account not found")
            }
            ProjectConstraints::UpdatedAfterCreated => ErrorKind::InternalServerError.into_error(),
        };

        error.with_resource("project")
    }
}

impl From<ProjectMemberConstraints> for Error<'static> {
    fn from(c: ProjectMemberConstraints) -> Self {
        let error = match c {
            ProjectMemberConstraints::Membership => {
                ErrorKind::Conflict.with_message("Account is already a member of this project")
            }
            ProjectMemberConstraints::SingleOwner => {
                ErrorKind::Conflict.with_message("A project can only have one owner")
            }
            ProjectMemberConstraints::ProjectReference => {
                ErrorKind::NotFound.with_message("Project not found")
            }
            ProjectMemberConstraints::AccountReference => {
                ErrorKind::NotFound.with_message("Account not found")
            }
        };

        error.with_resource("project_member")
    }
}

impl From<ProjectInviteConstraints> for Error<'static> {
    fn from(c: ProjectInviteConstraints) -> Self {
        let error = match c {
            ProjectInviteConstraints::ProjectReference => {
                ErrorKind::NotFound.with_message("Project not found")
            }
            ProjectInviteConstraints::InviteTokenUnique
            | ProjectInviteConstraints::ExpiresAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("project_invite")
    }
}

impl From<PasswordResetTokenConstraints> for Error<'static> {
    fn from(c: PasswordResetTokenConstraints) -> Self {
        let error = match c {
            PasswordResetTokenConstraints::ResetTokenUnique
            | PasswordResetTokenConstraints::ExpiresAfterCreated => {
                ErrorKind::InternalServerError.into_error()
            }
        };

        error.with_resource("password_reset_token")
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout",
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(ref query_error) => {
                if let Some(constraint) = error.constraint_violation() {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        constraint = %constraint,
                        error = %query_error,
                        "query error (constraint violation)"
                    );
                    return constraint.into();
                }

                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_violation_is_conflict() {
        let error: Error = ConstraintViolation::new("project_members_pkey")
            .expect("known constraint")
            .into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
        assert_eq!(error.resource(), Some("project_member"));
    }

    #[test]
    fn duplicate_email_is_conflict() {
        let error: Error = AccountConstraints::EmailAddressUnique.into();
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn length_checks_are_bad_requests() {
        let error: Error = ProjectConstraints::DisplayNameLength.into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn infrastructure_errors_are_internal() {
        let error: Error = PgError::Config("missing url".into()).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
