//! Authentication request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for sign-up.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    /// Display name of the account.
    #[validate(length(min = 1, max = 64))]
    pub display_name: String,

    /// Email address of the account.
    #[validate(email, length(min = 3, max = 254))]
    pub email_address: String,

    /// Password of the account.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Request payload for sign-in.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Signin {
    /// Email address of the account.
    #[validate(length(min = 1, max = 254))]
    pub email_address: String,

    /// Password of the account.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,
}

/// Request payload for exchanging a refresh token.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Refresh {
    /// Refresh token issued at sign-in.
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Request payload for password reset initiation.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPassword {
    /// Email address of the account to reset the password for.
    #[validate(email, length(min = 3, max = 254))]
    pub email_address: String,
}

/// Request payload for password reset confirmation.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    /// Token from the reset link.
    #[validate(length(min = 1, max = 128))]
    pub token: String,

    /// New password.
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}
