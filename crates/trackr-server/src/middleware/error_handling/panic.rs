use std::any::Any;

use axum::response::{IntoResponse, Response};

use crate::handler::ErrorKind;
use crate::utility::tracing_targets::MIDDLEWARE as TRACING_TARGET;

type Panic = Box<dyn Any + Send + 'static>;

/// Logs the panic payload and answers with a bare 500.
pub fn catch_panic(err: Panic) -> Response {
    let detail = if let Some(panic) = err.downcast_ref::<String>() {
        panic.as_str()
    } else if let Some(panic) = err.downcast_ref::<&str>() {
        panic
    } else {
        "unknown panic type"
    };

    tracing::error!(target: TRACING_TARGET, panic = detail, "service panic");
    ErrorKind::InternalServerError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn string_payload() {
        let response = catch_panic(Box::new(String::from("boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn opaque_payload() {
        let response = catch_panic(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
