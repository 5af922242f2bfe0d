//! Compact signed tokens carrying a subject and a permission claim.
//!
//! Tokens are HS256 JWTs over the claims `{sub, iat, exp, authorities}`.
//! Verification is a pure function of the token, the signing secret and the
//! current time: nothing is stored and nothing is looked up.

use std::time::Duration;

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthResult, TokenKeys};

/// Lifetime of access tokens.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Lifetime of refresh tokens.
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Wire claims of a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    iat: i64,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    authorities: Option<String>,
}

/// Claims recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    /// Caller identifier, typically an email address.
    pub subject: Option<String>,
    /// When the token was issued.
    pub issued_at: jiff::Timestamp,
    /// When the token stops being accepted.
    pub expires_at: jiff::Timestamp,
    /// Comma-joined authority strings, absent on tokens issued without one.
    pub permission_claim: Option<String>,
}

/// Issues and verifies signed tokens.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    keys: TokenKeys,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec over the given signing keys.
    pub fn new(keys: TokenKeys) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against an explicit clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self { keys, validation }
    }

    /// Issues a token that expires `ttl` from now.
    pub fn issue(&self, subject: &str, permission_claim: &str, ttl: Duration) -> AuthResult<String> {
        self.issue_at(subject, permission_claim, ttl, jiff::Timestamp::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        permission_claim: &str,
        ttl: Duration,
        now: jiff::Timestamp,
    ) -> AuthResult<String> {
        let claims = TokenClaims {
            sub: Some(subject.to_owned()),
            iat: now.as_second(),
            exp: expiry_second(now, ttl)?,
            authorities: Some(permission_claim.to_owned()),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.keys.encoding_key(),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verifies a token against the current time.
    pub fn verify(&self, token: &str) -> AuthResult<SignedToken> {
        self.verify_at(token, jiff::Timestamp::now())
    }

    /// Verifies a token as if the current time were `now`.
    ///
    /// The segment shape is checked before any signature computation, and the
    /// signature is checked before any claim is read.
    pub fn verify_at(&self, token: &str, now: jiff::Timestamp) -> AuthResult<SignedToken> {
        if !has_compact_shape(token) {
            return Err(AuthError::Malformed);
        }

        let data = decode::<TokenClaims>(token, self.keys.decoding_key(), &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature => AuthError::SignatureInvalid,
                _ => AuthError::Malformed,
            })?;

        let claims = data.claims;
        let issued_at =
            jiff::Timestamp::from_second(claims.iat).map_err(|_| AuthError::Malformed)?;
        let expires_at =
            jiff::Timestamp::from_second(claims.exp).map_err(|_| AuthError::Malformed)?;

        if now >= expires_at {
            return Err(AuthError::Expired);
        }

        Ok(SignedToken {
            subject: claims.sub,
            issued_at,
            expires_at,
            permission_claim: claims.authorities,
        })
    }
}

/// Returns the expiry claim for a token issued at `now` with the given lifetime.
///
/// Rounds up to the next whole second so a sub-second lifetime still yields a
/// token that verifies at `now`.
fn expiry_second(now: jiff::Timestamp, ttl: Duration) -> AuthResult<i64> {
    let out_of_range = || AuthError::Signing("token lifetime is out of range".into());

    let expires_at = jiff::SignedDuration::try_from(ttl)
        .ok()
        .and_then(|ttl| now.checked_add(ttl).ok())
        .ok_or_else(out_of_range)?;

    let mut second = expires_at.as_second();
    if expires_at.subsec_nanosecond() > 0 {
        second += 1;
    }

    jiff::Timestamp::from_second(second).map_err(|_| out_of_range())?;
    Ok(second)
}

/// Returns whether the token is exactly three non-empty dot-separated segments.
pub(crate) fn has_compact_shape(token: &str) -> bool {
    let mut segments = 0;
    for segment in token.split('.') {
        if segment.is_empty() {
            return false;
        }
        segments += 1;
    }
    segments == 3
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn codec() -> TokenCodec {
        TokenCodec::new(TokenKeys::from_secret(SECRET).unwrap())
    }

    fn now() -> jiff::Timestamp {
        jiff::Timestamp::from_second(1_750_000_000).unwrap()
    }

    #[test]
    fn round_trip_before_expiry() -> anyhow::Result<()> {
        let codec = codec();
        let token = codec.issue_at("a@x.com", "", ACCESS_TOKEN_TTL, now())?;

        let signed = codec.verify_at(&token, now())?;
        assert_eq!(signed.subject.as_deref(), Some("a@x.com"));
        assert_eq!(signed.permission_claim.as_deref(), Some(""));
        assert_eq!(signed.issued_at, now());
        assert_eq!(
            signed.expires_at,
            now() + SignedDuration::from_secs(3600)
        );
        Ok(())
    }

    #[test]
    fn expired_after_ttl() -> anyhow::Result<()> {
        let codec = codec();
        let token = codec.issue_at("a@x.com", "", ACCESS_TOKEN_TTL, now())?;

        let later = now() + SignedDuration::from_hours(2);
        assert!(matches!(
            codec.verify_at(&token, later),
            Err(AuthError::Expired)
        ));
        Ok(())
    }

    #[test]
    fn expired_exactly_at_expiry() -> anyhow::Result<()> {
        let codec = codec();
        let token = codec.issue_at("a@x.com", "", ACCESS_TOKEN_TTL, now())?;

        let at_expiry = now() + SignedDuration::from_secs(3600);
        assert!(matches!(
            codec.verify_at(&token, at_expiry),
            Err(AuthError::Expired)
        ));

        let just_before = now() + SignedDuration::from_secs(3599);
        assert!(codec.verify_at(&token, just_before).is_ok());
        Ok(())
    }

    #[test]
    fn refresh_tokens_live_seven_days() -> anyhow::Result<()> {
        let codec = codec();
        let token = codec.issue_at("a@x.com", "ROLE_USER", REFRESH_TOKEN_TTL, now())?;

        let six_days = now() + SignedDuration::from_hours(6 * 24);
        assert!(codec.verify_at(&token, six_days).is_ok());

        let eight_days = now() + SignedDuration::from_hours(8 * 24);
        assert!(matches!(
            codec.verify_at(&token, eight_days),
            Err(AuthError::Expired)
        ));
        Ok(())
    }

    #[test]
    fn sub_second_ttl_verifies_until_next_second() -> anyhow::Result<()> {
        let codec = codec();
        let token = codec.issue_at("a@x.com", "", Duration::from_millis(900), now())?;

        let signed = codec.verify_at(&token, now())?;
        assert_eq!(signed.expires_at, now() + SignedDuration::from_secs(1));

        let later = now() + SignedDuration::from_secs(1);
        assert!(matches!(
            codec.verify_at(&token, later),
            Err(AuthError::Expired)
        ));
        Ok(())
    }

    #[test]
    fn fractional_ttl_rounds_expiry_up() -> anyhow::Result<()> {
        let codec = codec();
        let token = codec.issue_at("a@x.com", "", Duration::from_millis(1500), now())?;

        let signed = codec.verify_at(&token, now() + SignedDuration::from_secs(1))?;
        assert_eq!(signed.expires_at, now() + SignedDuration::from_secs(2));
        Ok(())
    }

    #[test]
    fn unrepresentable_ttl_is_rejected_at_issue() {
        let ten_thousand_years = Duration::from_secs(10_000 * 365 * 24 * 60 * 60);
        assert!(matches!(
            codec().issue_at("a@x.com", "", ten_thousand_years, now()),
            Err(AuthError::Signing(_))
        ));

        assert!(matches!(
            codec().issue_at("a@x.com", "", Duration::MAX, now()),
            Err(AuthError::Signing(_))
        ));
    }

    #[test]
    fn tampered_payload_fails_signature() -> anyhow::Result<()> {
        let codec = codec();
        let token = codec.issue_at("a@x.com", "ROLE_USER", ACCESS_TOKEN_TTL, now())?;

        let segments: Vec<&str> = token.split('.').collect();
        let payload = segments[1];
        let middle = payload.len() / 2;
        let original = payload.as_bytes()[middle];
        let replacement = if original == b'A' { 'B' } else { 'A' };

        let mut tampered_payload = payload.to_owned();
        tampered_payload.replace_range(middle..=middle, &replacement.to_string());
        let tampered = format!("{}.{}.{}", segments[0], tampered_payload, segments[2]);

        assert!(matches!(
            codec.verify_at(&tampered, now()),
            Err(AuthError::SignatureInvalid)
        ));
        Ok(())
    }

    #[test]
    fn other_secret_fails_signature() -> anyhow::Result<()> {
        let token = codec().issue_at("a@x.com", "", ACCESS_TOKEN_TTL, now())?;
        let other = TokenCodec::new(TokenKeys::from_secret("ffffffffffffffffffffffffffffffff")?);

        assert!(matches!(
            other.verify_at(&token, now()),
            Err(AuthError::SignatureInvalid)
        ));
        Ok(())
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let codec = codec();
        for token in ["", "abc", "a.b", "a.b.c.d", "a..c", ".b.c", "a.b."] {
            assert!(
                matches!(codec.verify_at(token, now()), Err(AuthError::Malformed)),
                "{token:?} should be malformed"
            );
        }
    }

    #[test]
    fn garbage_segments_are_malformed() {
        assert!(matches!(
            codec().verify_at("not.a.token", now()),
            Err(AuthError::Malformed)
        ));
    }

    #[test]
    fn compact_shape() {
        assert!(has_compact_shape("a.b.c"));
        assert!(!has_compact_shape("a.b"));
        assert!(!has_compact_shape("a.b.c.d"));
        assert!(!has_compact_shape("a..c"));
    }
}
