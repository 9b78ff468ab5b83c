//! Operator-triggered fan-out.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use pushrelay_common::error::AppError;
use pushrelay_common::types::{DispatchSummary, NotificationPayload};

use crate::extract::JsonBody;
use crate::state::AppState;

const DEFAULT_TITLE: &str = "task complete";
const DEFAULT_BODY: &str = "you have a new notification";

pub fn router() -> Router<AppState> {
    Router::new().route("/notify", post(notify))
}

/// Body of `POST /notify`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct NotifyRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: Option<serde_json::Value>,
}

impl NotifyRequest {
    pub fn into_payload(self) -> NotificationPayload {
        NotificationPayload {
            title: self.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: self.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
            data: self.data.unwrap_or_else(|| serde_json::json!({})),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: DispatchSummary,
}

/// POST /notify — Deliver a notification to every stored subscription.
async fn notify(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<NotifyRequest>,
) -> Result<Json<NotifyResponse>, AppError> {
    let payload = req.into_payload();
    let summary = state.dispatcher.dispatch(&payload).await?;

    let message = if summary.total == 0 {
        "No active subscriptions"
    } else {
        "Push complete"
    };

    Ok(Json(NotifyResponse {
        message: message.to_string(),
        summary,
    }))
}
