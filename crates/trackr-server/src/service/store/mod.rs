//! Persistence seams of the authentication and authorization core.
//!
//! The core never talks to a database directly. It goes through these
//! object-safe traits, which have a Postgres implementation ([`PgStore`]) and
//! an in-memory one ([`MemoryStore`]) used by tests and local tooling.

mod memory_store;
mod pg_store;

use std::sync::Arc;

use async_trait::async_trait;
use trackr_postgres::model::{
    Account, NewAccount, NewPasswordResetToken, NewProject, NewProjectInvite, PasswordResetToken,
    Project, ProjectInvite, ProjectMember, UpdateProject,
};
use trackr_postgres::types::ProjectRole;
use uuid::Uuid;

pub use self::memory_store::MemoryStore;
pub use self::pg_store::PgStore;
use crate::service::security::AuthResult;

/// Account lookups and mutations.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds an account by email address, ignoring case.
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>>;

    /// Finds an account by identifier.
    async fn find_by_id(&self, account_id: Uuid) -> AuthResult<Option<Account>>;

    /// Registers an account; fails with `EmailTaken` on a duplicate email.
    async fn create_account(&self, account: NewAccount) -> AuthResult<Account>;

    /// Replaces the stored password hash.
    async fn update_password(&self, account_id: Uuid, password_hash: String)
    -> AuthResult<Account>;
}

/// Project lifecycle.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Creates a project and its OWNER role record atomically.
    async fn create_with_owner(&self, project: NewProject) -> AuthResult<Project>;

    /// Finds a project by identifier.
    async fn find_project(&self, project_id: Uuid) -> AuthResult<Option<Project>>;

    /// Applies partial changes to a project.
    async fn update_project(&self, project_id: Uuid, changes: UpdateProject)
    -> AuthResult<Project>;

    /// Deletes a project together with its role records and invitations.
    async fn delete_project(&self, project_id: Uuid) -> AuthResult<bool>;
}

/// Persistent mapping of (account, project) to role.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Grants a role; fails with `AlreadyMember` when a record exists.
    async fn add(
        &self,
        account_id: Uuid,
        project_id: Uuid,
        role: ProjectRole,
    ) -> AuthResult<ProjectMember>;

    /// Returns the account's role in the project, if any.
    async fn find_role(&self, account_id: Uuid, project_id: Uuid)
    -> AuthResult<Option<ProjectRole>>;

    /// Removes the account's role record; returns whether one existed.
    async fn remove(&self, account_id: Uuid, project_id: Uuid) -> AuthResult<bool>;

    /// Lists every role record of the project, oldest first.
    async fn list_members(&self, project_id: Uuid) -> AuthResult<Vec<ProjectMember>>;
}

/// One-time project invitations.
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// Persists a new invitation.
    async fn create_invitation(&self, invite: NewProjectInvite) -> AuthResult<ProjectInvite>;

    /// Finds an invitation by its token.
    async fn find_invitation(&self, token: &str) -> AuthResult<Option<ProjectInvite>>;

    /// Deletes an invitation by its token; returns whether one existed.
    async fn delete_invitation(&self, token: &str) -> AuthResult<bool>;

    /// Grants the role and deletes the invitation atomically.
    ///
    /// Fails with `InvalidInviteToken` when the invitation is already gone and
    /// with `AlreadyMember` when the account already holds a role; the
    /// invitation is left in place in the latter case.
    async fn redeem_invitation(
        &self,
        invite: &ProjectInvite,
        account_id: Uuid,
        role: ProjectRole,
    ) -> AuthResult<ProjectMember>;
}

/// Password reset tokens.
#[async_trait]
pub trait ResetTokenStore: Send + Sync {
    /// Stores a token, replacing any outstanding token of the same account.
    async fn replace_reset_token(
        &self,
        token: NewPasswordResetToken,
    ) -> AuthResult<PasswordResetToken>;

    /// Finds a reset token by value.
    async fn find_reset_token(&self, token: &str) -> AuthResult<Option<PasswordResetToken>>;

    /// Deletes a reset token by value; returns whether one existed.
    async fn delete_reset_token(&self, token: &str) -> AuthResult<bool>;

    /// Stores the new password hash and deletes the token atomically.
    async fn consume_reset_token(
        &self,
        token: &PasswordResetToken,
        password_hash: String,
    ) -> AuthResult<Account>;
}

/// Shared handles to every store the core depends on.
#[derive(Clone)]
pub struct Stores {
    /// Accounts.
    pub users: Arc<dyn UserDirectory>,
    /// Projects.
    pub projects: Arc<dyn ProjectStore>,
    /// Role records.
    pub roles: Arc<dyn RoleStore>,
    /// Invitations.
    pub invitations: Arc<dyn InvitationStore>,
    /// Password reset tokens.
    pub reset_tokens: Arc<dyn ResetTokenStore>,
}

impl Stores {
    /// Backs every store with the same implementation.
    pub fn from_backend<T>(backend: T) -> Self
    where
        T: UserDirectory + ProjectStore + RoleStore + InvitationStore + ResetTokenStore + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            users: backend.clone(),
            projects: backend.clone(),
            roles: backend.clone(),
            invitations: backend.clone(),
            reset_tokens: backend,
        }
    }

    /// Backs every store with Postgres.
    pub fn postgres(pg_client: trackr_postgres::PgClient) -> Self {
        Self::from_backend(PgStore::new(pg_client))
    }

    /// Backs every store with a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::from_backend(MemoryStore::new())
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
