//! Projects table constraint violations.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::ConstraintCategory;

/// Projects table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ProjectConstraints {
    // Project validation constraints
    #[strum(serialize = "projects_display_name_length")]
    DisplayNameLength,
    #[strum(serialize = "projects_description_length")]
    DescriptionLength,

    // Project chronological constraints
    #[strum(serialize = "projects_updated_after_created")]
    UpdatedAfterCreated,

    // Project reference constraints
    #[strum(serialize = "projects_owner_id_fkey")]
    OwnerReference,
}

impl ProjectConstraints {
    /// Creates a new [`ProjectConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            ProjectConstraints::DisplayNameLength
            | ProjectConstraints::DescriptionLength => ConstraintCategory::Validation,

            ProjectConstraints::UpdatedAfterCreated => ConstraintCategory::Chronological,

            ProjectConstraints::OwnerReference => ConstraintCategory::BusinessLogic,
        }
    }
}

impl From<ProjectConstraints> for String {
    #[inline]
    fn from(val: ProjectConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ProjectConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
