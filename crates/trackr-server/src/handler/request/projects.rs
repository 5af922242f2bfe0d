//! Project request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use trackr_postgres::model::{NewProject, UpdateProject as UpdateProjectModel};
use uuid::Uuid;
use validator::Validate;

/// Request payload for creating a project.
///
/// The caller becomes the project owner.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    /// Display name of the project.
    #[validate(length(min = 1, max = 128))]
    pub display_name: String,

    /// Optional description of the project.
    #[validate(length(max = 4096))]
    pub description: Option<String>,
}

impl CreateProject {
    /// Converts the request into a model owned by `owner_id`.
    pub fn into_model(self, owner_id: Uuid) -> NewProject {
        let project = NewProject::new(owner_id, self.display_name.trim());
        match self.description {
            Some(description) => project.with_description(description),
            None => project,
        }
    }
}

/// Request payload for updating a project.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    /// New display name.
    #[validate(length(min = 1, max = 128))]
    pub display_name: Option<String>,

    /// New description.
    #[validate(length(max = 4096))]
    pub description: Option<String>,
}

impl UpdateProject {
    /// Converts the request into a changeset.
    pub fn into_model(self) -> UpdateProjectModel {
        UpdateProjectModel {
            display_name: self.display_name.map(|name| name.trim().to_owned()),
            description: self.description,
            ..Default::default()
        }
    }
}
