//! Lenient JSON body extractor.
//!
//! Unlike `axum::Json`, `JsonBody` does not insist on a `Content-Type`
//! header, treats an empty body as `{}`, and reports malformed input as an
//! `AppError::Validation` so clients always get a `{ "error": ... }` body.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;

use pushrelay_common::error::AppError;

#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(e.body_text())
            } else {
                AppError::Validation(format!("Unreadable request body: {}", e.body_text()))
            }
        })?;

        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };

        serde_json::from_slice(raw)
            .map(JsonBody)
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))
    }
}
