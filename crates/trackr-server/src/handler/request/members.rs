//! Project member request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request payload for granting a role to an account.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRole {
    /// Account receiving the role.
    pub account_id: Uuid,

    /// Role name, matched case-insensitively (`administrator`, `MEMBER`, ...).
    #[validate(length(min = 1, max = 32))]
    pub role: String,
}
