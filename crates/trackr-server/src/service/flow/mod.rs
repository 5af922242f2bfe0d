//! Multi-step workflows built on top of the security primitives and stores.

mod account_flow;
mod invitation_flow;
mod password_reset_flow;

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

pub use self::account_flow::{AUTHORITIES_CLAIM, AccountFlow, TokenPair};
pub use self::invitation_flow::InvitationFlow;
pub use self::password_reset_flow::{PASSWORD_RESET_TTL, PasswordResetFlow};

/// Number of random bytes behind every emailed token.
const TOKEN_BYTES: usize = 32;

/// Generates an unguessable URL-safe token.
pub(crate) fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Returns `now + ttl`, saturating at the latest representable instant.
pub(crate) fn expiry_after(now: jiff::Timestamp, ttl: Duration) -> jiff::Timestamp {
    now.checked_add(ttl).unwrap_or(jiff::Timestamp::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let first = generate_token();
        let second = generate_token();

        assert_eq!(first.len(), 43);
        assert_ne!(first, second);
        assert!(
            first
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn expiry_saturates() {
        let now = jiff::Timestamp::from_second(1_700_000_000).unwrap();
        assert_eq!(
            expiry_after(now, Duration::from_secs(3600)).as_second(),
            1_700_003_600
        );
        assert_eq!(
            expiry_after(now, Duration::from_secs(u64::MAX)),
            jiff::Timestamp::MAX
        );
    }
}
