//! Repository traits implemented for [`PgConnection`].
//!
//! Each repository groups the queries of one table. All of them are
//! implemented directly on the async connection, so any pooled connection or
//! transaction handle can call them.
//!
//! [`PgConnection`]: crate::PgConnection

pub mod account;
pub mod password_reset_token;
pub mod project;
pub mod project_invite;
pub mod project_member;

pub use account::AccountRepository;
pub use password_reset_token::PasswordResetTokenRepository;
pub use project::ProjectRepository;
pub use project_invite::ProjectInviteRepository;
pub use project_member::ProjectMemberRepository;

/// Limit/offset pagination for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Largest page size accepted by list queries.
    pub const MAX_LIMIT: i64 = 1000;

    /// Creates a new pagination, clamping the limit to `1..=MAX_LIMIT`.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset: offset.max(0),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_is_clamped() {
        assert_eq!(Pagination::new(0, -5), Pagination { limit: 1, offset: 0 });
        assert_eq!(Pagination::new(5000, 10).limit, Pagination::MAX_LIMIT);
        assert_eq!(Pagination::default().limit, 50);
    }
}
