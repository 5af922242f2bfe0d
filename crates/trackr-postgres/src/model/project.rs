//! Project model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::projects;

/// A project and its owner reference.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Project {
    /// Unique project identifier.
    pub id: Uuid,
    /// Human-readable project name.
    pub display_name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Account that owns the project.
    pub owner_id: Uuid,
    /// Timestamp when the project was created.
    pub created_at: Timestamp,
    /// Timestamp when the project was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new project.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewProject {
    /// Project ID.
    pub id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Description.
    pub description: Option<String>,
    /// Owner account ID.
    pub owner_id: Uuid,
}

impl NewProject {
    /// Creates a new project owned by the given account.
    pub fn new(owner_id: Uuid, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            display_name: display_name.into(),
            description: None,
            owner_id,
        }
    }

    /// Sets the project description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Data for updating a project.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateProject {
    /// Display name.
    pub display_name: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<Timestamp>,
}

impl UpdateProject {
    /// Returns whether the changeset carries no field changes.
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.description.is_none()
    }
}

impl Project {
    /// Returns whether the given account is the owner reference of this project.
    #[inline]
    pub fn is_owned_by(&self, account_id: Uuid) -> bool {
        self.owner_id == account_id
    }
}
