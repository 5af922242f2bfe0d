//! Caller identity attached to each request.
//!
//! The authentication middleware resolves the `Authorization` header once
//! and stores the outcome as an [`Authentication`] request extension. The
//! extension is dropped with the request, so identity never outlives it.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use derive_more::{Deref, From};
use trackr_postgres::model::Account;

use crate::handler::{Error, Result};
use crate::service::flow::AccountFlow;
use crate::service::security::{IdentityResolver, Principal, Rejection};

/// Outcome of resolving the request's credential.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub struct Authentication(std::result::Result<Principal, Rejection>);

impl Authentication {
    /// Resolves the `Authorization` header among the request headers.
    pub fn from_headers(headers: &HeaderMap, resolver: &IdentityResolver) -> Self {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        Self(resolver.resolve(header))
    }

    /// Returns the caller if the credential was accepted.
    #[inline]
    pub fn principal(&self) -> Option<&Principal> {
        self.0.as_ref().ok()
    }

    /// Returns why the credential was refused.
    #[inline]
    pub fn rejection(&self) -> Option<Rejection> {
        self.0.as_ref().err().copied()
    }

    /// Returns whether a caller is attached.
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.0.is_ok()
    }

    /// Converts into the caller or the rejection.
    #[inline]
    pub fn into_result(self) -> std::result::Result<Principal, Rejection> {
        self.0
    }
}

impl<S> FromRequestParts<S> for Authentication
where
    S: Send + Sync,
    IdentityResolver: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        if let Some(authentication) = parts.extensions.get::<Self>() {
            return Ok(authentication.clone());
        }

        // Routes mounted without the middleware resolve lazily.
        let resolver = IdentityResolver::from_ref(state);
        let authentication = Self::from_headers(&parts.headers, &resolver);
        parts.extensions.insert(authentication.clone());
        Ok(authentication)
    }
}

/// Authenticated caller; rejects with 401 when none is attached.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct AuthPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
    IdentityResolver: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let authentication =
            <Authentication as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        let principal = authentication.into_result()?;
        Ok(Self(principal))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
    IdentityResolver: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Option<Self>> {
        let authentication =
            <Authentication as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        Ok(authentication.into_result().ok().map(Self))
    }
}

/// Account of the authenticated caller.
///
/// Loaded once per request and cached in the request extensions.
#[must_use]
#[derive(Debug, Clone, Deref)]
pub struct AuthAccount(pub Account);

impl AuthAccount {
    /// Returns the account identifier.
    #[inline]
    pub fn account_id(&self) -> uuid::Uuid {
        self.0.id
    }
}

impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
    IdentityResolver: FromRef<S>,
    AccountFlow: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        if let Some(account) = parts.extensions.get::<Self>() {
            return Ok(account.clone());
        }

        let AuthPrincipal(principal) =
            <AuthPrincipal as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        let account = AccountFlow::from_ref(state)
            .current_account(&principal)
            .await?;

        let account = Self(account);
        parts.extensions.insert(account.clone());
        Ok(account)
    }
}
