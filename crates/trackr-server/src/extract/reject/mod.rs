//! Extractors that reject with [`Error`] instead of axum's plain-text bodies.
//!
//! [`Error`]: crate::handler::Error

mod json;
mod path;
mod query;
mod validated_json;

pub use self::json::Json;
pub use self::path::Path;
pub use self::query::Query;
pub use self::validated_json::ValidateJson;
