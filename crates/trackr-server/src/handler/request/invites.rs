//! Project invitation request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for inviting someone to a project.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendInvite {
    /// Project to invite into.
    pub project_id: Uuid,

    /// Email address of the invitee.
    #[validate(email, length(min = 3, max = 254))]
    pub invitee_email: String,
}

/// Query parameters of the invitation acceptance link.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInvite {
    /// Token from the invitation email.
    #[validate(length(min = 1, max = 128))]
    pub token: String,
}
