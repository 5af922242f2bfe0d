//! Middleware for `axum::Router` and HTTP request processing.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use axum::Router;
//! use trackr_server::middleware::RouterExt;
//!
//! let app: Router = Router::new()
//!     .with_error_handling_layer(Duration::from_secs(30))
//!     .with_observability_layer()
//!     .with_default_security_layer();
//! ```

mod authentication;
mod error_handling;
mod extensions;
mod observability;
pub mod security;

pub use authentication::{RouterAuthExt, authenticate_request, require_authentication};
pub use extensions::RouterExt;
pub use security::CorsConfig;
