use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/vapidPublicKey", get(vapid_public_key))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VapidKeyResponse {
    pub public_key: String,
}

/// GET /vapidPublicKey — Application server key for `pushManager.subscribe`.
async fn vapid_public_key(State(state): State<AppState>) -> Json<VapidKeyResponse> {
    Json(VapidKeyResponse {
        public_key: state.config.vapid_public_key.clone(),
    })
}
