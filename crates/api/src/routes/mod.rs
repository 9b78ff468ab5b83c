pub mod index;
pub mod notify;
pub mod status;
pub mod subscribe;
pub mod vapid;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use pushrelay_common::error::AppError;

use crate::middleware::cors::cors_layer;
use crate::middleware::panic::handle_panic;
use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(index::router())
        .merge(subscribe::router())
        .merge(notify::router())
        .merge(status::router())
        .merge(vapid::router())
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
}

/// Router plus the middleware stack the server runs with.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let body_limit = state.config.body_limit_bytes;
    let cors = cors_layer(&state.config.allowed_origins)?;

    Ok(create_router(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
