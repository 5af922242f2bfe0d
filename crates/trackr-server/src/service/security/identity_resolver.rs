//! Resolves the caller's identity from an `Authorization` header value.

use std::collections::BTreeSet;

use strum::{Display, IntoStaticStr};

use super::{AuthError, TokenCodec};
use crate::utility::tracing_targets::AUTHENTICATION as TRACING_TARGET;

/// Scheme prefix expected in front of the token.
const BEARER_PREFIX: &str = "Bearer ";

/// An authenticated caller.
///
/// Rebuilt from a verified token on every request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
    permissions: BTreeSet<String>,
}

impl Principal {
    /// Creates a principal from a subject and its granted permissions.
    pub fn new<I, P>(subject: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            subject: subject.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the caller's subject, typically an email address.
    #[inline]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the granted permissions.
    #[inline]
    pub fn permissions(&self) -> &BTreeSet<String> {
        &self.permissions
    }

    /// Returns whether the caller was granted the given permission.
    #[inline]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// Why a request carries no authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    /// No `Bearer` credential was presented.
    NoToken,
    /// The credential is not a well-formed token.
    Malformed,
    /// The token signature does not verify.
    SignatureInvalid,
    /// The token has expired.
    Expired,
    /// The token names no subject.
    NoSubject,
}

impl From<&AuthError> for Rejection {
    fn from(error: &AuthError) -> Self {
        match error {
            AuthError::SignatureInvalid => Self::SignatureInvalid,
            AuthError::Expired => Self::Expired,
            AuthError::NoSubject => Self::NoSubject,
            _ => Self::Malformed,
        }
    }
}

/// Turns raw header values into principals.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    codec: TokenCodec,
}

impl IdentityResolver {
    /// Creates a resolver verifying tokens with the given codec.
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Returns the codec used for verification.
    #[inline]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Resolves a raw `Authorization` header value against the current time.
    pub fn resolve(&self, header: Option<&str>) -> Result<Principal, Rejection> {
        self.resolve_at(header, jiff::Timestamp::now())
    }

    /// Resolves a raw `Authorization` header value as if the time were `now`.
    pub fn resolve_at(
        &self,
        header: Option<&str>,
        now: jiff::Timestamp,
    ) -> Result<Principal, Rejection> {
        let result = self.try_resolve(header, now);
        if let Err(rejection) = result {
            tracing::debug!(
                target: TRACING_TARGET,
                reason = %rejection,
                "request credential rejected",
            );
        }
        result
    }

    fn try_resolve(&self, header: Option<&str>, now: jiff::Timestamp) -> Result<Principal, Rejection> {
        let token = header
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(Rejection::NoToken)?
            .trim();

        if token.is_empty() || !super::token_codec::has_compact_shape(token) {
            return Err(Rejection::Malformed);
        }

        let signed = self
            .codec
            .verify_at(token, now)
            .map_err(|e| Rejection::from(&e))?;

        let subject = signed
            .subject
            .filter(|subject| !subject.is_empty())
            .ok_or(Rejection::NoSubject)?;

        Ok(Principal::new(
            subject,
            parse_permissions(signed.permission_claim.as_deref()),
        ))
    }
}

/// Splits a comma-joined permission claim; an absent claim grants nothing.
fn parse_permissions(claim: Option<&str>) -> impl Iterator<Item = &str> {
    claim
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|permission| !permission.is_empty())
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;
    use crate::service::security::{ACCESS_TOKEN_TTL, TokenKeys};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn resolver() -> IdentityResolver {
        let keys = TokenKeys::from_secret(SECRET).unwrap();
        IdentityResolver::new(TokenCodec::new(keys))
    }

    fn now() -> jiff::Timestamp {
        jiff::Timestamp::from_second(1_750_000_000).unwrap()
    }

    fn bearer(resolver: &IdentityResolver, subject: &str, claim: &str) -> String {
        let token = resolver
            .codec()
            .issue_at(subject, claim, ACCESS_TOKEN_TTL, now())
            .unwrap();
        format!("Bearer {token}")
    }

    #[test]
    fn missing_header_is_no_token() {
        assert_eq!(resolver().resolve_at(None, now()), Err(Rejection::NoToken));
    }

    #[test]
    fn other_scheme_is_no_token() {
        let header = Some("Basic dXNlcjpwYXNz");
        assert_eq!(resolver().resolve_at(header, now()), Err(Rejection::NoToken));
    }

    #[test]
    fn empty_bearer_is_malformed() {
        let header = Some("Bearer    ");
        assert_eq!(resolver().resolve_at(header, now()), Err(Rejection::Malformed));
    }

    #[test]
    fn two_segments_are_malformed() {
        let header = Some("Bearer abc.def");
        assert_eq!(resolver().resolve_at(header, now()), Err(Rejection::Malformed));
    }

    #[test]
    fn resolves_subject_and_permissions() {
        let resolver = resolver();
        let header = bearer(&resolver, "a@x.com", "ROLE_USER, ROLE_ADMIN,,");

        let principal = resolver.resolve_at(Some(&header), now()).unwrap();
        assert_eq!(principal.subject(), "a@x.com");
        assert_eq!(principal.permissions().len(), 2);
        assert!(principal.has_permission("ROLE_USER"));
        assert!(principal.has_permission("ROLE_ADMIN"));
    }

    #[test]
    fn empty_claim_grants_nothing() {
        let resolver = resolver();
        let header = bearer(&resolver, "a@x.com", "");

        let principal = resolver.resolve_at(Some(&header), now()).unwrap();
        assert!(principal.permissions().is_empty());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let resolver = resolver();
        let header = format!("{}  ", bearer(&resolver, "a@x.com", ""));
        assert!(resolver.resolve_at(Some(&header), now()).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let resolver = resolver();
        let header = bearer(&resolver, "a@x.com", "");

        let later = now() + SignedDuration::from_hours(2);
        assert_eq!(
            resolver.resolve_at(Some(&header), later),
            Err(Rejection::Expired)
        );
    }

    #[test]
    fn empty_subject_is_rejected() {
        let resolver = resolver();
        let header = bearer(&resolver, "", "ROLE_USER");
        assert_eq!(
            resolver.resolve_at(Some(&header), now()),
            Err(Rejection::NoSubject)
        );
    }

    #[test]
    fn absent_claim_parses_to_empty_set() {
        assert_eq!(parse_permissions(None).count(), 0);
        assert_eq!(
            parse_permissions(Some(" a , b ")).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }
}
