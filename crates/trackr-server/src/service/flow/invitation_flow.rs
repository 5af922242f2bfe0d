//! Invitation-based onboarding into a project.
//!
//! An invitation moves through `created -> redeemed -> deleted`. Expired
//! invitations are deleted the first time someone presents them and are
//! reported the same way as unknown ones.

use std::sync::Arc;
use std::time::Duration;

use trackr_postgres::model::{NewProjectInvite, ProjectInvite, ProjectMember};
use trackr_postgres::types::ProjectRole;
use uuid::Uuid;

use super::{expiry_after, generate_token};
use crate::service::notify::{EmailKind, EmailSender};
use crate::service::security::{AuthError, AuthResult};
use crate::service::store::InvitationStore;
use crate::utility::tracing_targets::INVITATION as TRACING_TARGET;

/// Issues and redeems one-time project invitations.
#[derive(Clone)]
pub struct InvitationFlow {
    invitations: Arc<dyn InvitationStore>,
    email_sender: Arc<dyn EmailSender>,
    base_url: Arc<str>,
    ttl: Duration,
}

impl InvitationFlow {
    /// Creates the flow.
    ///
    /// `base_url` is the public origin of the web client, without a trailing
    /// slash.
    pub fn new(
        invitations: Arc<dyn InvitationStore>,
        email_sender: Arc<dyn EmailSender>,
        base_url: impl Into<Arc<str>>,
        ttl: Duration,
    ) -> Self {
        Self {
            invitations,
            email_sender,
            base_url: base_url.into(),
            ttl,
        }
    }

    /// Returns the invitation lifetime.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Builds the acceptance link for a token.
    pub fn acceptance_link(&self, token: &str) -> String {
        format!("{}/accept_invitation?token={}", self.base_url, token)
    }

    /// Persists a new invitation and emails its acceptance link.
    ///
    /// Every call creates a fresh invitation. A delivery failure is returned
    /// after the invitation has been stored.
    pub async fn send_invitation(
        &self,
        invitee_email: &str,
        project_id: Uuid,
        inviter_id: Uuid,
    ) -> AuthResult<ProjectInvite> {
        self.send_invitation_at(invitee_email, project_id, inviter_id, jiff::Timestamp::now())
            .await
    }

    /// Same as [`send_invitation`](Self::send_invitation) with an explicit clock.
    pub async fn send_invitation_at(
        &self,
        invitee_email: &str,
        project_id: Uuid,
        inviter_id: Uuid,
        now: jiff::Timestamp,
    ) -> AuthResult<ProjectInvite> {
        let new_invite = NewProjectInvite {
            id: Uuid::now_v7(),
            project_id,
            invitee_email: invitee_email.trim().to_owned(),
            invite_token: generate_token(),
            created_by: inviter_id,
            expires_at: expiry_after(now, self.ttl).into(),
        };

        let invite = self.invitations.create_invitation(new_invite).await?;
        let link = self.acceptance_link(&invite.invite_token);
        self.email_sender
            .send(&invite.invitee_email, &link, EmailKind::Invitation)
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            invite_id = %invite.id,
            project_id = %project_id,
            inviter_id = %inviter_id,
            "invitation sent"
        );

        Ok(invite)
    }

    /// Looks up a live invitation by token.
    pub async fn accept_invitation(&self, token: &str) -> AuthResult<ProjectInvite> {
        self.accept_invitation_at(token, jiff::Timestamp::now()).await
    }

    /// Same as [`accept_invitation`](Self::accept_invitation) with an explicit clock.
    pub async fn accept_invitation_at(
        &self,
        token: &str,
        now: jiff::Timestamp,
    ) -> AuthResult<ProjectInvite> {
        let Some(invite) = self.invitations.find_invitation(token).await? else {
            tracing::debug!(target: TRACING_TARGET, "unknown invitation token");
            return Err(AuthError::InvalidInviteToken);
        };

        if invite.is_expired_at(now) {
            self.invitations.delete_invitation(token).await?;
            tracing::debug!(
                target: TRACING_TARGET,
                invite_id = %invite.id,
                "expired invitation deleted"
            );
            return Err(AuthError::InvalidInviteToken);
        }

        Ok(invite)
    }

    /// Redeems an invitation: grants the MEMBER role, then deletes the token.
    pub async fn redeem(&self, token: &str, account_id: Uuid) -> AuthResult<ProjectMember> {
        self.redeem_at(token, account_id, jiff::Timestamp::now())
            .await
    }

    /// Same as [`redeem`](Self::redeem) with an explicit clock.
    pub async fn redeem_at(
        &self,
        token: &str,
        account_id: Uuid,
        now: jiff::Timestamp,
    ) -> AuthResult<ProjectMember> {
        let invite = self.accept_invitation_at(token, now).await?;
        let member = self
            .invitations
            .redeem_invitation(&invite, account_id, ProjectRole::Member)
            .await?;

        tracing::info!(
            target: TRACING_TARGET,
            invite_id = %invite.id,
            project_id = %member.project_id,
            account_id = %account_id,
            "invitation redeemed"
        );

        Ok(member)
    }
}

impl std::fmt::Debug for InvitationFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationFlow")
            .field("base_url", &self.base_url)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use trackr_postgres::model::{NewAccount, NewProject};

    use super::*;
    use crate::service::notify::RecordingEmailSender;
    use crate::service::store::Stores;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 3600);

    struct Fixture {
        stores: Stores,
        sender: RecordingEmailSender,
        flow: InvitationFlow,
        owner_id: Uuid,
        invitee_id: Uuid,
        project_id: Uuid,
    }

    async fn fixture() -> anyhow::Result<Fixture> {
        let stores = Stores::in_memory();
        let sender = RecordingEmailSender::new();
        let flow = InvitationFlow::new(
            stores.invitations.clone(),
            Arc::new(sender.clone()),
            "http://localhost:5173",
            WEEK,
        );

        let owner = stores
            .users
            .create_account(NewAccount::new("owner@x.com", "Owner", "hash"))
            .await?;
        let invitee = stores
            .users
            .create_account(NewAccount::new("b@x.com", "Invitee", "hash"))
            .await?;
        let project = stores
            .projects
            .create_with_owner(NewProject::new(owner.id, "Roadmap"))
            .await?;

        Ok(Fixture {
            stores,
            sender,
            flow,
            owner_id: owner.id,
            invitee_id: invitee.id,
            project_id: project.id,
        })
    }

    #[tokio::test]
    async fn send_persists_and_emails_link() -> anyhow::Result<()> {
        let fx = fixture().await?;
        let invite = fx
            .flow
            .send_invitation("b@x.com", fx.project_id, fx.owner_id)
            .await?;

        let email = fx.sender.last().expect("an email");
        assert_eq!(email.kind, EmailKind::Invitation);
        assert_eq!(email.to_email, "b@x.com");
        assert_eq!(
            email.link,
            format!("http://localhost:5173/accept_invitation?token={}", invite.invite_token)
        );
        assert_eq!(email.token().as_deref(), Some(invite.invite_token.as_str()));
        Ok(())
    }

    #[tokio::test]
    async fn sending_twice_creates_two_invitations() -> anyhow::Result<()> {
        let fx = fixture().await?;
        let first = fx.flow.send_invitation("b@x.com", fx.project_id, fx.owner_id).await?;
        let second = fx.flow.send_invitation("b@x.com", fx.project_id, fx.owner_id).await?;

        assert_ne!(first.invite_token, second.invite_token);
        assert_eq!(fx.sender.sent().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn redeem_succeeds_exactly_once() -> anyhow::Result<()> {
        let fx = fixture().await?;
        let invite = fx.flow.send_invitation("b@x.com", fx.project_id, fx.owner_id).await?;

        let accepted = fx.flow.accept_invitation(&invite.invite_token).await?;
        assert_eq!(accepted.project_id, fx.project_id);

        let member = fx.flow.redeem(&invite.invite_token, fx.invitee_id).await?;
        assert_eq!(member.member_role, ProjectRole::Member);
        assert_eq!(
            fx.stores.roles.find_role(fx.invitee_id, fx.project_id).await?,
            Some(ProjectRole::Member)
        );

        let again = fx.flow.redeem(&invite.invite_token, fx.invitee_id).await;
        assert!(matches!(again, Err(AuthError::InvalidInviteToken)));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() -> anyhow::Result<()> {
        let fx = fixture().await?;
        let result = fx.flow.accept_invitation("does-not-exist").await;
        assert!(matches!(result, Err(AuthError::InvalidInviteToken)));
        Ok(())
    }

    #[tokio::test]
    async fn expired_invitation_is_rejected_and_deleted() -> anyhow::Result<()> {
        let fx = fixture().await?;
        let sent_at = jiff::Timestamp::now();
        let invite = fx
            .flow
            .send_invitation_at("b@x.com", fx.project_id, fx.owner_id, sent_at)
            .await?;

        let later = expiry_after(sent_at, WEEK + Duration::from_secs(1));
        let result = fx
            .flow
            .redeem_at(&invite.invite_token, fx.invitee_id, later)
            .await;
        assert!(matches!(result, Err(AuthError::InvalidInviteToken)));
        assert!(
            fx.stores
                .invitations
                .find_invitation(&invite.invite_token)
                .await?
                .is_none()
        );
        assert_eq!(fx.stores.roles.find_role(fx.invitee_id, fx.project_id).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn existing_member_keeps_invitation() -> anyhow::Result<()> {
        let fx = fixture().await?;
        let invite = fx.flow.send_invitation("owner@x.com", fx.project_id, fx.owner_id).await?;

        let result = fx.flow.redeem(&invite.invite_token, fx.owner_id).await;
        assert!(matches!(result, Err(AuthError::AlreadyMember)));
        assert!(
            fx.stores
                .invitations
                .find_invitation(&invite.invite_token)
                .await?
                .is_some()
        );
        Ok(())
    }

    #[tokio::test]
    async fn delivery_failure_surfaces_after_persisting() -> anyhow::Result<()> {
        let stores = Stores::in_memory();
        let owner = stores
            .users
            .create_account(NewAccount::new("owner@x.com", "Owner", "hash"))
            .await?;
        let project = stores
            .projects
            .create_with_owner(NewProject::new(owner.id, "Roadmap"))
            .await?;
        let flow = InvitationFlow::new(
            stores.invitations.clone(),
            Arc::new(RecordingEmailSender::failing()),
            "http://localhost:5173",
            WEEK,
        );

        let result = flow.send_invitation("b@x.com", project.id, owner.id).await;
        assert!(matches!(result, Err(AuthError::Delivery(_))));
        Ok(())
    }
}
