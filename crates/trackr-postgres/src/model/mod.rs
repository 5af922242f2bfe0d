//! Database models for all tables.

mod account;
mod password_reset_token;
mod project;
mod project_invite;
mod project_member;

pub use account::{Account, NewAccount, UpdateAccount};
pub use password_reset_token::{NewPasswordResetToken, PasswordResetToken};
pub use project::{NewProject, Project, UpdateProject};
pub use project_invite::{NewProjectInvite, ProjectInvite};
pub use project_member::{NewProjectMember, ProjectMember};
