//! Cross-origin settings for browser clients.

mod cors;

pub use cors::CorsConfig;
pub(crate) use cors::create_cors_layer;
