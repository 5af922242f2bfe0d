//! Allow/deny decisions for project-scoped actions.
//!
//! Role-gated actions consult the [`RoleStore`]. Actions on resources owned by
//! external collaborators (issues, comments, attachments, categories, tags,
//! milestones) carry the ownership facts of that resource, so the engine can
//! decide without knowing how those resources are stored.

use std::sync::Arc;

use trackr_postgres::types::ProjectRole;
use uuid::Uuid;

use super::{AuthError, AuthResult};
use crate::service::store::RoleStore;
use crate::utility::tracing_targets::AUTHORIZATION as TRACING_TARGET;

/// Something a caller wants to do inside a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Delete the project.
    DeleteProject,
    /// Invite a user to the project.
    InviteUser,
    /// Assign a role to a user.
    AssignRole,
    /// Remove a user's role record.
    RemoveMember,
    /// List the project team.
    ViewMembers,
    /// Update project fields; `owner_id` is the project's owner reference.
    UpdateProject { owner_id: Uuid },
    /// Create or delete a category owned by `owner_id`.
    ManageCategory { owner_id: Uuid },
    /// Create or delete a tag owned by `owner_id`.
    ManageTag { owner_id: Uuid },
    /// Delete an issue.
    DeleteIssue { project_owner_id: Uuid },
    /// Fully update an issue.
    EditIssue {
        project_owner_id: Uuid,
        assignee_id: Option<Uuid>,
    },
    /// Delete a comment written by `author_id`.
    DeleteComment { author_id: Uuid },
    /// Delete an attachment uploaded by `uploader_id`.
    DeleteAttachment {
        uploader_id: Uuid,
        project_owner_id: Uuid,
    },
    /// Create or delete a milestone.
    ManageMilestone { project_owner_id: Uuid },
}

impl Action {
    /// Returns a short name for logging.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DeleteProject => "delete_project",
            Self::InviteUser => "invite_user",
            Self::AssignRole => "assign_role",
            Self::RemoveMember => "remove_member",
            Self::ViewMembers => "view_members",
            Self::UpdateProject { .. } => "update_project",
            Self::ManageCategory { .. } => "manage_category",
            Self::ManageTag { .. } => "manage_tag",
            Self::DeleteIssue { .. } => "delete_issue",
            Self::EditIssue { .. } => "edit_issue",
            Self::DeleteComment { .. } => "delete_comment",
            Self::DeleteAttachment { .. } => "delete_attachment",
            Self::ManageMilestone { .. } => "manage_milestone",
        }
    }
}

/// Decides whether a caller may perform an action on a project.
#[derive(Clone)]
pub struct AuthorizationEngine {
    roles: Arc<dyn RoleStore>,
}

impl AuthorizationEngine {
    /// Creates an engine reading roles from the given store.
    pub fn new(roles: Arc<dyn RoleStore>) -> Self {
        Self { roles }
    }

    /// Returns whether the account holds the OWNER role in the project.
    pub async fn is_owner(&self, account_id: Uuid, project_id: Uuid) -> AuthResult<bool> {
        let role = self.roles.find_role(account_id, project_id).await?;
        Ok(role.is_some_and(ProjectRole::is_owner))
    }

    /// Returns whether the account holds any role in the project.
    pub async fn is_member(&self, account_id: Uuid, project_id: Uuid) -> AuthResult<bool> {
        let role = self.roles.find_role(account_id, project_id).await?;
        Ok(role.is_some())
    }

    /// Allows the action or fails with [`AuthError::PermissionDenied`].
    pub async fn authorize(
        &self,
        caller_id: Uuid,
        project_id: Uuid,
        action: Action,
    ) -> AuthResult<()> {
        let decision = self.decide(caller_id, project_id, action).await?;

        match decision {
            Ok(()) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    caller_id = %caller_id,
                    project_id = %project_id,
                    action = action.as_str(),
                    "action allowed"
                );
                Ok(())
            }
            Err(reason) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    caller_id = %caller_id,
                    project_id = %project_id,
                    action = action.as_str(),
                    reason,
                    "action denied"
                );
                Err(AuthError::permission_denied(reason))
            }
        }
    }

    /// Returns the decision; storage failures are the outer error.
    async fn decide(
        &self,
        caller_id: Uuid,
        project_id: Uuid,
        action: Action,
    ) -> AuthResult<Result<(), &'static str>> {
        let decision = match action {
            Action::DeleteProject => self
                .require_owner(caller_id, project_id, "only the project owner can delete it")
                .await?,
            Action::InviteUser => self
                .require_owner(caller_id, project_id, "only the project owner can invite users")
                .await?,
            Action::AssignRole => self
                .require_owner(caller_id, project_id, "only the project owner can assign roles")
                .await?,
            Action::RemoveMember => self
                .require_owner(caller_id, project_id, "only the project owner can remove members")
                .await?,
            Action::ViewMembers => {
                if self.is_member(caller_id, project_id).await? {
                    Ok(())
                } else {
                    Err("only project members can view the team")
                }
            }
            Action::UpdateProject { owner_id } => {
                require_same(caller_id, owner_id, "only the project owner can update it")
            }
            Action::ManageCategory { owner_id } => {
                require_same(caller_id, owner_id, "only the category owner can change it")
            }
            Action::ManageTag { owner_id } => {
                require_same(caller_id, owner_id, "only the tag owner can change it")
            }
            Action::DeleteIssue { project_owner_id } => require_same(
                caller_id,
                project_owner_id,
                "only the project owner can delete issues",
            ),
            Action::EditIssue {
                project_owner_id,
                assignee_id,
            } => {
                if caller_id == project_owner_id || assignee_id == Some(caller_id) {
                    Ok(())
                } else {
                    Err("only the project owner or the assignee can edit the issue")
                }
            }
            Action::DeleteComment { author_id } => {
                require_same(caller_id, author_id, "only the author can delete the comment")
            }
            Action::DeleteAttachment {
                uploader_id,
                project_owner_id,
            } => {
                if caller_id == uploader_id || caller_id == project_owner_id {
                    Ok(())
                } else {
                    Err("only the uploader or the project owner can delete the attachment")
                }
            }
            Action::ManageMilestone { project_owner_id } => {
                if caller_id == project_owner_id || self.is_member(caller_id, project_id).await? {
                    Ok(())
                } else {
                    Err("only the project owner or team members can manage milestones")
                }
            }
        };

        Ok(decision)
    }

    async fn require_owner(
        &self,
        caller_id: Uuid,
        project_id: Uuid,
        reason: &'static str,
    ) -> AuthResult<Result<(), &'static str>> {
        if self.is_owner(caller_id, project_id).await? {
            Ok(Ok(()))
        } else {
            Ok(Err(reason))
        }
    }
}

fn require_same(caller_id: Uuid, expected: Uuid, reason: &'static str) -> Result<(), &'static str> {
    if caller_id == expected {
        Ok(())
    } else {
        Err(reason)
    }
}

impl std::fmt::Debug for AuthorizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use trackr_postgres::model::{NewAccount, NewProject};

    use super::*;
    use crate::service::store::{MemoryStore, ProjectStore, UserDirectory};

    struct Fixture {
        engine: AuthorizationEngine,
        store: MemoryStore,
        owner: Uuid,
        member: Uuid,
        outsider: Uuid,
        project: Uuid,
    }

    async fn fixture() -> anyhow::Result<Fixture> {
        let store = MemoryStore::new();
        let owner = store
            .create_account(NewAccount::new("owner@x.com", "Owner", "hash"))
            .await?
            .id;
        let member = store
            .create_account(NewAccount::new("member@x.com", "Member", "hash"))
            .await?
            .id;
        let outsider = store
            .create_account(NewAccount::new("outsider@x.com", "Outsider", "hash"))
            .await?
            .id;
        let project = store
            .create_with_owner(NewProject::new(owner, "Roadmap"))
            .await?
            .id;
        store.add(member, project, ProjectRole::Member).await?;

        let engine = AuthorizationEngine::new(Arc::new(store.clone()));
        Ok(Fixture {
            engine,
            store,
            owner,
            member,
            outsider,
            project,
        })
    }

    fn is_denied(result: AuthResult<()>) -> bool {
        matches!(result, Err(AuthError::PermissionDenied(_)))
    }

    #[tokio::test]
    async fn only_owner_deletes_project() -> anyhow::Result<()> {
        let f = fixture().await?;
        let engine = &f.engine;

        engine.authorize(f.owner, f.project, Action::DeleteProject).await?;
        assert!(is_denied(
            engine.authorize(f.member, f.project, Action::DeleteProject).await
        ));
        assert!(is_denied(
            engine.authorize(f.outsider, f.project, Action::DeleteProject).await
        ));
        Ok(())
    }

    #[tokio::test]
    async fn only_owner_invites_and_assigns() -> anyhow::Result<()> {
        let f = fixture().await?;
        for action in [Action::InviteUser, Action::AssignRole, Action::RemoveMember] {
            f.engine.authorize(f.owner, f.project, action).await?;
            assert!(is_denied(f.engine.authorize(f.member, f.project, action).await));
        }
        Ok(())
    }

    #[tokio::test]
    async fn administrator_is_not_owner() -> anyhow::Result<()> {
        let f = fixture().await?;
        let admin = f
            .store
            .create_account(NewAccount::new("admin@x.com", "Admin", "hash"))
            .await?
            .id;
        f.store.add(admin, f.project, ProjectRole::Administrator).await?;

        assert!(!f.engine.is_owner(admin, f.project).await?);
        assert!(f.engine.is_member(admin, f.project).await?);
        assert!(is_denied(
            f.engine.authorize(admin, f.project, Action::DeleteProject).await
        ));
        Ok(())
    }

    #[tokio::test]
    async fn update_project_checks_owner_reference() -> anyhow::Result<()> {
        let engine = AuthorizationEngine::new(Arc::new(MemoryStore::new()));
        let owner = Uuid::from_u128(42);
        let other = Uuid::from_u128(99);
        let project = Uuid::from_u128(7);
        let action = Action::UpdateProject { owner_id: owner };

        engine.authorize(owner, project, action).await?;
        assert!(is_denied(engine.authorize(other, project, action).await));
        Ok(())
    }

    #[tokio::test]
    async fn edit_issue_allows_owner_or_assignee() -> anyhow::Result<()> {
        let f = fixture().await?;
        let action = Action::EditIssue {
            project_owner_id: f.owner,
            assignee_id: Some(f.member),
        };

        f.engine.authorize(f.owner, f.project, action).await?;
        f.engine.authorize(f.member, f.project, action).await?;
        assert!(is_denied(f.engine.authorize(f.outsider, f.project, action).await));

        let unassigned = Action::EditIssue {
            project_owner_id: f.owner,
            assignee_id: None,
        };
        assert!(is_denied(f.engine.authorize(f.member, f.project, unassigned).await));
        Ok(())
    }

    #[tokio::test]
    async fn delete_issue_requires_project_owner() -> anyhow::Result<()> {
        let f = fixture().await?;
        let action = Action::DeleteIssue {
            project_owner_id: f.owner,
        };

        f.engine.authorize(f.owner, f.project, action).await?;
        assert!(is_denied(f.engine.authorize(f.member, f.project, action).await));
        Ok(())
    }

    #[tokio::test]
    async fn attachments_and_comments() -> anyhow::Result<()> {
        let f = fixture().await?;
        let attachment = Action::DeleteAttachment {
            uploader_id: f.member,
            project_owner_id: f.owner,
        };
        f.engine.authorize(f.member, f.project, attachment).await?;
        f.engine.authorize(f.owner, f.project, attachment).await?;
        assert!(is_denied(
            f.engine.authorize(f.outsider, f.project, attachment).await
        ));

        let comment = Action::DeleteComment {
            author_id: f.member,
        };
        f.engine.authorize(f.member, f.project, comment).await?;
        assert!(is_denied(f.engine.authorize(f.owner, f.project, comment).await));
        Ok(())
    }

    #[tokio::test]
    async fn categories_and_tags_follow_owner_reference() -> anyhow::Result<()> {
        let f = fixture().await?;
        for action in [
            Action::ManageCategory { owner_id: f.member },
            Action::ManageTag { owner_id: f.member },
        ] {
            f.engine.authorize(f.member, f.project, action).await?;
            assert!(is_denied(f.engine.authorize(f.owner, f.project, action).await));
        }
        Ok(())
    }

    #[tokio::test]
    async fn milestones_allow_team_members() -> anyhow::Result<()> {
        let f = fixture().await?;
        let action = Action::ManageMilestone {
            project_owner_id: f.owner,
        };

        f.engine.authorize(f.owner, f.project, action).await?;
        f.engine.authorize(f.member, f.project, action).await?;
        assert!(is_denied(f.engine.authorize(f.outsider, f.project, action).await));
        Ok(())
    }

    #[tokio::test]
    async fn members_view_team() -> anyhow::Result<()> {
        let f = fixture().await?;
        f.engine.authorize(f.member, f.project, Action::ViewMembers).await?;
        assert!(is_denied(
            f.engine.authorize(f.outsider, f.project, Action::ViewMembers).await
        ));
        Ok(())
    }
}
