//! Project response types.

use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use trackr_postgres::model;
use uuid::Uuid;

/// A project.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID.
    pub project_id: Uuid,
    /// Display name.
    pub display_name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Account that owns the project.
    pub owner_id: Uuid,
    /// Timestamp when the project was created.
    pub created_at: Timestamp,
    /// Timestamp when the project was last updated.
    pub updated_at: Timestamp,
}

impl Project {
    /// Creates a project response from the database model.
    pub fn from_model(project: model::Project) -> Self {
        Self {
            project_id: project.id,
            display_name: project.display_name,
            description: project.description,
            owner_id: project.owner_id,
            created_at: project.created_at.into(),
            updated_at: project.updated_at.into(),
        }
    }
}
