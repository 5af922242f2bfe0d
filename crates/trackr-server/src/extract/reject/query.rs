//! Query string extractor.

use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};
use crate::utility::tracing_targets::VALIDATION as TRACING_TARGET;

/// Query extractor with descriptive rejections.
///
/// A missing required parameter names the parameter in the error context.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Consumes the wrapper and returns the inner query parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = <AxumQuery<T> as FromRequestParts<S>>::from_request_parts(parts, state).await;
        match query {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<QueryRejection> for Error<'static> {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(
            target: TRACING_TARGET,
            error = %rejection,
            "query string rejected"
        );

        let message = rejection.body_text();
        if message.contains("missing field") {
            ErrorKind::BadRequest
                .with_message("Missing required query parameter")
                .with_context(format!(
                    "parameter: {}",
                    extract_field_name(&message).unwrap_or("unknown")
                ))
        } else {
            ErrorKind::BadRequest
                .with_message("Invalid query parameters")
                .with_context(message)
        }
    }
}

/// Pulls the backtick-quoted field name out of a serde error message.
fn extract_field_name(message: &str) -> Option<&str> {
    let start = message.find('`')? + 1;
    let end = message[start..].find('`')?;
    Some(&message[start..start + end])
}
