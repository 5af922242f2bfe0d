//! In-memory implementation of the store traits.
//!
//! Mirrors the Postgres schema rules that the core relies on: one role record
//! per (project, account), cascade deletes from projects, case-insensitive
//! email uniqueness and atomic multi-step mutations (a single write lock is
//! held for each operation).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use trackr_postgres::model::{
    Account, NewAccount, NewPasswordResetToken, NewProject, NewProjectInvite, PasswordResetToken,
    Project, ProjectInvite, ProjectMember, UpdateProject,
};
use trackr_postgres::types::ProjectRole;
use uuid::Uuid;

use super::{InvitationStore, ProjectStore, ResetTokenStore, RoleStore, UserDirectory};
use crate::service::security::{AuthError, AuthResult};

#[derive(Debug, Default)]
struct MemoryState {
    accounts: HashMap<Uuid, Account>,
    projects: HashMap<Uuid, Project>,
    members: Vec<ProjectMember>,
    invites: HashMap<String, ProjectInvite>,
    reset_tokens: HashMap<String, PasswordResetToken>,
}

impl MemoryState {
    fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.values().find(|account| account.has_email(email))
    }

    fn member_position(&self, account_id: Uuid, project_id: Uuid) -> Option<usize> {
        self.members
            .iter()
            .position(|m| m.account_id == account_id && m.project_id == project_id)
    }

    fn insert_member(
        &mut self,
        account_id: Uuid,
        project_id: Uuid,
        role: ProjectRole,
    ) -> AuthResult<ProjectMember> {
        if !self.projects.contains_key(&project_id) {
            return Err(AuthError::project_not_found(project_id));
        }
        if !self.accounts.contains_key(&account_id) {
            return Err(AuthError::not_found("account", account_id));
        }
        if self.member_position(account_id, project_id).is_some() {
            return Err(AuthError::AlreadyMember);
        }

        let member = ProjectMember {
            project_id,
            account_id,
            member_role: role,
            created_at: jiff::Timestamp::now().into(),
        };
        self.members.push(member.clone());
        Ok(member)
    }
}

/// Store keeping every record in process memory.
///
/// Cheap to clone; clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.account_by_email(email).cloned())
    }

    async fn find_by_id(&self, account_id: Uuid) -> AuthResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state.accounts.get(&account_id).cloned())
    }

    async fn create_account(&self, account: NewAccount) -> AuthResult<Account> {
        let mut state = self.state.write().await;
        if state.account_by_email(&account.email_address).is_some() {
            return Err(AuthError::EmailTaken);
        }

        let now = jiff::Timestamp::now();
        let account = Account {
            id: account.id,
            email_address: account.email_address,
            display_name: account.display_name,
            password_hash: account.password_hash,
            created_at: now.into(),
            updated_at: now.into(),
        };
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_password(
        &self,
        account_id: Uuid,
        password_hash: String,
    ) -> AuthResult<Account> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| AuthError::not_found("account", account_id))?;

        account.password_hash = password_hash;
        account.updated_at = jiff::Timestamp::now().into();
        Ok(account.clone())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn create_with_owner(&self, project: NewProject) -> AuthResult<Project> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&project.owner_id) {
            return Err(AuthError::not_found("account", project.owner_id));
        }

        let now = jiff::Timestamp::now();
        let project = Project {
            id: project.id,
            display_name: project.display_name,
            description: project.description,
            owner_id: project.owner_id,
            created_at: now.into(),
            updated_at: now.into(),
        };
        state.projects.insert(project.id, project.clone());
        state.insert_member(project.owner_id, project.id, ProjectRole::Owner)?;
        Ok(project)
    }

    async fn find_project(&self, project_id: Uuid) -> AuthResult<Option<Project>> {
        let state = self.state.read().await;
        Ok(state.projects.get(&project_id).cloned())
    }

    async fn update_project(
        &self,
        project_id: Uuid,
        changes: UpdateProject,
    ) -> AuthResult<Project> {
        let mut state = self.state.write().await;
        let project = state
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| AuthError::project_not_found(project_id))?;

        if let Some(display_name) = changes.display_name {
            project.display_name = display_name;
        }
        if let Some(description) = changes.description {
            project.description = Some(description);
        }
        project.updated_at = changes
            .updated_at
            .unwrap_or_else(|| jiff::Timestamp::now().into());
        Ok(project.clone())
    }

    async fn delete_project(&self, project_id: Uuid) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        if state.projects.remove(&project_id).is_none() {
            return Ok(false);
        }

        state.members.retain(|m| m.project_id != project_id);
        state.invites.retain(|_, invite| invite.project_id != project_id);
        Ok(true)
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn add(
        &self,
        account_id: Uuid,
        project_id: Uuid,
        role: ProjectRole,
    ) -> AuthResult<ProjectMember> {
        let mut state = self.state.write().await;
        state.insert_member(account_id, project_id, role)
    }

    async fn find_role(
        &self,
        account_id: Uuid,
        project_id: Uuid,
    ) -> AuthResult<Option<ProjectRole>> {
        let state = self.state.read().await;
        let role = state
            .member_position(account_id, project_id)
            .map(|position| state.members[position].member_role);
        Ok(role)
    }

    async fn remove(&self, account_id: Uuid, project_id: Uuid) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        match state.member_position(account_id, project_id) {
            Some(position) => {
                state.members.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_members(&self, project_id: Uuid) -> AuthResult<Vec<ProjectMember>> {
        let state = self.state.read().await;
        let members = state
            .members
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        Ok(members)
    }
}

#[async_trait]
impl InvitationStore for MemoryStore {
    async fn create_invitation(&self, invite: NewProjectInvite) -> AuthResult<ProjectInvite> {
        let mut state = self.state.write().await;
        if !state.projects.contains_key(&invite.project_id) {
            return Err(AuthError::project_not_found(invite.project_id));
        }

        let invite = ProjectInvite {
            id: invite.id,
            project_id: invite.project_id,
            invitee_email: invite.invitee_email,
            invite_token: invite.invite_token,
            created_by: invite.created_by,
            created_at: jiff::Timestamp::now().into(),
            expires_at: invite.expires_at,
        };
        state
            .invites
            .insert(invite.invite_token.clone(), invite.clone());
        Ok(invite)
    }

    async fn find_invitation(&self, token: &str) -> AuthResult<Option<ProjectInvite>> {
        let state = self.state.read().await;
        Ok(state.invites.get(token).cloned())
    }

    async fn delete_invitation(&self, token: &str) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.invites.remove(token).is_some())
    }

    async fn redeem_invitation(
        &self,
        invite: &ProjectInvite,
        account_id: Uuid,
        role: ProjectRole,
    ) -> AuthResult<ProjectMember> {
        let mut state = self.state.write().await;
        let project_id = match state.invites.get(&invite.invite_token) {
            Some(stored) if stored.id == invite.id => stored.project_id,
            _ => return Err(AuthError::InvalidInviteToken),
        };

        let member = state.insert_member(account_id, project_id, role)?;
        state.invites.remove(&invite.invite_token);
        Ok(member)
    }
}

#[async_trait]
impl ResetTokenStore for MemoryStore {
    async fn replace_reset_token(
        &self,
        token: NewPasswordResetToken,
    ) -> AuthResult<PasswordResetToken> {
        let mut state = self.state.write().await;
        state
            .reset_tokens
            .retain(|_, existing| existing.account_id != token.account_id);

        let token = PasswordResetToken {
            id: token.id,
            account_id: token.account_id,
            reset_token: token.reset_token,
            created_at: jiff::Timestamp::now().into(),
            expires_at: token.expires_at,
        };
        state
            .reset_tokens
            .insert(token.reset_token.clone(), token.clone());
        Ok(token)
    }

    async fn find_reset_token(&self, token: &str) -> AuthResult<Option<PasswordResetToken>> {
        let state = self.state.read().await;
        Ok(state.reset_tokens.get(token).cloned())
    }

    async fn delete_reset_token(&self, token: &str) -> AuthResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.reset_tokens.remove(token).is_some())
    }

    async fn consume_reset_token(
        &self,
        token: &PasswordResetToken,
        password_hash: String,
    ) -> AuthResult<Account> {
        let mut state = self.state.write().await;
        let stored = state
            .reset_tokens
            .remove(&token.reset_token)
            .filter(|stored| stored.id == token.id)
            .ok_or(AuthError::InvalidResetToken)?;

        let account = state
            .accounts
            .get_mut(&stored.account_id)
            .ok_or_else(|| AuthError::not_found("account", stored.account_id))?;
        account.password_hash = password_hash;
        account.updated_at = jiff::Timestamp::now().into();
        Ok(account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_account(store: &MemoryStore, email: &str) -> anyhow::Result<Account> {
        let account = NewAccount::new(email, "Test User", "$argon2id$stub");
        Ok(store.create_account(account).await?)
    }

    #[tokio::test]
    async fn email_lookup_ignores_case() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let account = seed_account(&store, "Alice@Example.com").await?;

        let found = store.find_by_email("alice@example.com").await?;
        assert_eq!(found.map(|a| a.id), Some(account.id));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_is_taken() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        seed_account(&store, "alice@example.com").await?;

        let duplicate = NewAccount::new("ALICE@example.com", "Other", "$argon2id$stub");
        let result = store.create_account(duplicate).await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
        Ok(())
    }

    #[tokio::test]
    async fn project_creation_records_owner() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let owner = seed_account(&store, "owner@example.com").await?;
        let project = store
            .create_with_owner(NewProject::new(owner.id, "Roadmap"))
            .await?;

        let role = store.find_role(owner.id, project.id).await?;
        assert_eq!(role, Some(ProjectRole::Owner));
        assert_eq!(store.list_members(project.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn second_add_is_already_member() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let owner = seed_account(&store, "owner@example.com").await?;
        let member = seed_account(&store, "member@example.com").await?;
        let project = store
            .create_with_owner(NewProject::new(owner.id, "Roadmap"))
            .await?;

        store.add(member.id, project.id, ProjectRole::Member).await?;
        assert_eq!(
            store.find_role(member.id, project.id).await?,
            Some(ProjectRole::Member)
        );

        let again = store.add(member.id, project.id, ProjectRole::Administrator).await;
        assert!(matches!(again, Err(AuthError::AlreadyMember)));
        Ok(())
    }

    #[tokio::test]
    async fn deleting_project_cascades() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let owner = seed_account(&store, "owner@example.com").await?;
        let project = store
            .create_with_owner(NewProject::new(owner.id, "Roadmap"))
            .await?;

        assert!(store.delete_project(project.id).await?);
        assert_eq!(store.find_role(owner.id, project.id).await?, None);
        assert!(store.list_members(project.id).await?.is_empty());
        assert!(!store.delete_project(project.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn remove_reports_whether_record_existed() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let owner = seed_account(&store, "owner@example.com").await?;
        let project = store
            .create_with_owner(NewProject::new(owner.id, "Roadmap"))
            .await?;

        assert!(store.remove(owner.id, project.id).await?);
        assert!(!store.remove(owner.id, project.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn update_project_changes_fields() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let owner = seed_account(&store, "owner@example.com").await?;
        let project = store
            .create_with_owner(NewProject::new(owner.id, "Roadmap"))
            .await?;

        let changes = UpdateProject {
            display_name: Some("Roadmap 2".into()),
            ..Default::default()
        };
        let updated = store.update_project(project.id, changes).await?;
        assert_eq!(updated.display_name, "Roadmap 2");
        assert_eq!(updated.description, None);
        Ok(())
    }
}
