//! Request extractors.
//!
//! - [`Authentication`] and [`AuthPrincipal`] read the caller identity that
//!   the authentication middleware attached to the request.
//! - [`AuthAccount`] loads the account behind that caller.
//! - [`Json`], [`ValidateJson`], [`Path`] and [`Query`] replace their axum
//!   counterparts and reject with the crate's JSON error body.

mod authentication;
pub mod reject;

pub use crate::extract::authentication::{AuthAccount, AuthPrincipal, Authentication};
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
