//! Converts handler panics into the standard JSON error response.

use std::any::Any;

use axum::response::{IntoResponse, Response};

use pushrelay_common::error::AppError;

/// Panic handler for `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };

    tracing::error!(panic = %detail, "Request handler panicked");
    AppError::Internal("internal server error".to_string()).into_response()
}
