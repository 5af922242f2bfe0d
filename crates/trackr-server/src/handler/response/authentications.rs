//! Authentication response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::service::flow::TokenPair;

/// Tokens returned after sign-up, sign-in and refresh.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// Access token presented as `Authorization: Bearer <token>`.
    pub access_token: String,
    /// Refresh token exchanged at `/auth/refresh`.
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

impl From<TokenPair> for AuthTokens {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "Bearer".to_owned(),
            expires_in: tokens.expires_in.as_secs(),
        }
    }
}
