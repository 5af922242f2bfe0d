//! Tracing target constants for consistent logging.
//!
//! Every `tracing` macro in this crate names one of these targets explicitly,
//! so `RUST_LOG` directives such as `trackr_server::authentication=debug`
//! select exactly one concern.

/// Identity resolution and token verification.
pub const AUTHENTICATION: &str = "trackr_server::authentication";

/// Role lookups and allow/deny decisions.
pub const AUTHORIZATION: &str = "trackr_server::authorization";

/// Sending, accepting and redeeming project invitations.
pub const INVITATION: &str = "trackr_server::invitation";

/// Password reset requests and completions.
pub const PASSWORD_RESET: &str = "trackr_server::password_reset";

/// Account registration, sign-in and token refresh.
pub const ACCOUNT: &str = "trackr_server::account";

/// Argon2 hashing and verification.
pub const PASSWORD_HASHER: &str = "trackr_server::password_hasher";

/// Signing key loading.
pub const TOKEN_KEYS: &str = "trackr_server::token_keys";

/// Outbound email delivery.
pub const EMAIL: &str = "trackr_server::email";

/// Persistence adapters behind the store traits.
pub const STORE: &str = "trackr_server::store";

/// Middleware failures (timeouts, panics).
pub const MIDDLEWARE: &str = "trackr_server::middleware";

/// Service state assembly at startup.
pub const SERVICE: &str = "trackr_server::service";

/// Request body and query string rejections.
pub const VALIDATION: &str = "trackr_server::validation";

/// HTTP handlers.
pub const HANDLER: &str = "trackr_server::handler";
