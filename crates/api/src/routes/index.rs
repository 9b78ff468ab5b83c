//! Service metadata endpoint.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Web Push Notification Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "subscribe": "/subscribe",
            "notify": "/notify",
            "status": "/status",
            "vapidPublicKey": "/vapidPublicKey"
        }
    }))
}
