//! Database enumeration types for type-safe queries.

pub mod project_role;

pub use project_role::ProjectRole;
