//! CORS policy built from `ALLOWED_ORIGINS`.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use pushrelay_common::error::AppError;

/// Build the CORS layer.
///
/// With no configured origins every origin is allowed (without credentials).
/// Otherwise only the listed origins are allowed, with credentials.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, AppError> {
    if allowed_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| AppError::Config(format!("Invalid origin in ALLOWED_ORIGINS: {}", origin)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}
