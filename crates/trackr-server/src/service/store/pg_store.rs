//! Postgres-backed implementation of the store traits.

use async_trait::async_trait;
use trackr_postgres::error::DieselError;
use trackr_postgres::model::{
    Account, NewAccount, NewPasswordResetToken, NewProject, NewProjectInvite, NewProjectMember,
    PasswordResetToken, Project, ProjectInvite, ProjectMember, UpdateAccount, UpdateProject,
};
use trackr_postgres::query::{
    AccountRepository, Pagination, PasswordResetTokenRepository, ProjectInviteRepository,
    ProjectMemberRepository, ProjectRepository,
};
use trackr_postgres::types::{ConstraintViolation, ProjectMemberConstraints, ProjectRole};
use trackr_postgres::{PgClient, PgConn, PgError};
use uuid::Uuid;

use super::{InvitationStore, ProjectStore, ResetTokenStore, RoleStore, UserDirectory};
use crate::service::security::{AuthError, AuthResult};
use crate::utility::tracing_targets::STORE as TRACING_TARGET;

/// Store backed by the shared Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pg_client: PgClient,
}

impl PgStore {
    /// Creates a store over the given client.
    pub fn new(pg_client: PgClient) -> Self {
        Self { pg_client }
    }

    async fn connection(&self) -> AuthResult<PgConn> {
        self.pg_client.get_connection().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to acquire database connection"
            );
            AuthError::Storage(e)
        })
    }
}

/// Returns whether the error is a lookup that matched no row.
fn is_not_found(error: &PgError) -> bool {
    matches!(error, PgError::Query(DieselError::NotFound))
}

/// Returns whether the error is a duplicate (project, account) role record.
fn is_duplicate_membership(error: &PgError) -> bool {
    matches!(
        error.constraint_violation(),
        Some(ConstraintViolation::ProjectMember(
            ProjectMemberConstraints::Membership
        ))
    )
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        let mut conn = self.connection().await?;
        Ok(conn.find_account_by_email(email).await?)
    }

    async fn find_by_id(&self, account_id: Uuid) -> AuthResult<Option<Account>> {
        let mut conn = self.connection().await?;
        Ok(conn.find_account_by_id(account_id).await?)
    }

    async fn create_account(&self, account: NewAccount) -> AuthResult<Account> {
        let mut conn = self.connection().await?;
        conn.create_account(account).await.map_err(|e| {
            if e.is_unique_violation() {
                AuthError::EmailTaken
            } else {
                AuthError::Storage(e)
            }
        })
    }

    async fn update_password(
        &self,
        account_id: Uuid,
        password_hash: String,
    ) -> AuthResult<Account> {
        let mut conn = self.connection().await?;
        conn.update_account(account_id, UpdateAccount::password(password_hash))
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    AuthError::not_found("account", account_id)
                } else {
                    AuthError::Storage(e)
                }
            })
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn create_with_owner(&self, project: NewProject) -> AuthResult<Project> {
        let mut conn = self.connection().await?;
        Ok(conn.create_project_with_owner(project).await?)
    }

    async fn find_project(&self, project_id: Uuid) -> AuthResult<Option<Project>> {
        let mut conn = self.connection().await?;
        Ok(conn.find_project_by_id(project_id).await?)
    }

    async fn update_project(
        &self,
        project_id: Uuid,
        changes: UpdateProject,
    ) -> AuthResult<Project> {
        let mut conn = self.connection().await?;
        conn.update_project(project_id, changes)
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    AuthError::project_not_found(project_id)
                } else {
                    AuthError::Storage(e)
                }
            })
    }

    async fn delete_project(&self, project_id: Uuid) -> AuthResult<bool> {
        let mut conn = self.connection().await?;
        Ok(conn.delete_project(project_id).await?)
    }
}

#[async_trait]
impl RoleStore for PgStore {
    async fn add(
        &self,
        account_id: Uuid,
        project_id: Uuid,
        role: ProjectRole,
    ) -> AuthResult<ProjectMember> {
        let mut conn = self.connection().await?;
        let member = NewProjectMember::new(project_id, account_id, role);
        conn.add_project_member(member).await.map_err(|e| {
            if is_duplicate_membership(&e) {
                AuthError::AlreadyMember
            } else {
                AuthError::Storage(e)
            }
        })
    }

    async fn find_role(
        &self,
        account_id: Uuid,
        project_id: Uuid,
    ) -> AuthResult<Option<ProjectRole>> {
        let mut conn = self.connection().await?;
        Ok(conn.find_member_role(project_id, account_id).await?)
    }

    async fn remove(&self, account_id: Uuid, project_id: Uuid) -> AuthResult<bool> {
        let mut conn = self.connection().await?;
        Ok(conn.remove_project_member(project_id, account_id).await?)
    }

    async fn list_members(&self, project_id: Uuid) -> AuthResult<Vec<ProjectMember>> {
        let mut conn = self.connection().await?;
        let pagination = Pagination::new(Pagination::MAX_LIMIT, 0);
        Ok(conn.list_project_members(project_id, pagination).await?)
    }
}

#[async_trait]
impl InvitationStore for PgStore {
    async fn create_invitation(&self, invite: NewProjectInvite) -> AuthResult<ProjectInvite> {
        let mut conn = self.connection().await?;
        Ok(conn.create_project_invite(invite).await?)
    }

    async fn find_invitation(&self, token: &str) -> AuthResult<Option<ProjectInvite>> {
        let mut conn = self.connection().await?;
        Ok(conn.find_invite_by_token(token).await?)
    }

    async fn delete_invitation(&self, token: &str) -> AuthResult<bool> {
        let mut conn = self.connection().await?;
        Ok(conn.delete_invite_by_token(token).await?)
    }

    async fn redeem_invitation(
        &self,
        invite: &ProjectInvite,
        account_id: Uuid,
        role: ProjectRole,
    ) -> AuthResult<ProjectMember> {
        let mut conn = self.connection().await?;
        conn.redeem_project_invite(invite.id, account_id, role)
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    AuthError::InvalidInviteToken
                } else if is_duplicate_membership(&e) {
                    AuthError::AlreadyMember
                } else {
                    AuthError::Storage(e)
                }
            })
    }
}

#[async_trait]
impl ResetTokenStore for PgStore {
    async fn replace_reset_token(
        &self,
        token: NewPasswordResetToken,
    ) -> AuthResult<PasswordResetToken> {
        let mut conn = self.connection().await?;
        Ok(conn.replace_reset_token(token).await?)
    }

    async fn find_reset_token(&self, token: &str) -> AuthResult<Option<PasswordResetToken>> {
        let mut conn = self.connection().await?;
        Ok(conn.find_reset_token(token).await?)
    }

    async fn delete_reset_token(&self, token: &str) -> AuthResult<bool> {
        let mut conn = self.connection().await?;
        Ok(conn.delete_reset_token(token).await?)
    }

    async fn consume_reset_token(
        &self,
        token: &PasswordResetToken,
        password_hash: String,
    ) -> AuthResult<Account> {
        let mut conn = self.connection().await?;
        conn.consume_reset_token(token.id, password_hash)
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    AuthError::InvalidResetToken
                } else {
                    AuthError::Storage(e)
                }
            })
    }
}
