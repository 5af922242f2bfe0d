//! Contains constraints, enumerations and other custom types.

mod constraint;
mod enums;

pub use constraint::{
    AccountConstraints, ConstraintCategory, ConstraintViolation, PasswordResetTokenConstraints,
    ProjectConstraints, ProjectInviteConstraints, ProjectMemberConstraints,
};
pub use enums::ProjectRole;
