//! Subscription registration.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use pushrelay_common::error::AppError;
use pushrelay_common::types::{NewSubscription, SubscriptionKeys};

use crate::extract::JsonBody;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}

/// Body of `POST /subscribe`: the browser's `PushSubscription` serialized as JSON.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub endpoint: Option<String>,
    pub keys: Option<SubscribeKeys>,
    pub expiration_time: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscribeKeys {
    pub p256dh: Option<String>,
    pub auth: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub message: String,
    pub endpoint: String,
}

impl SubscribeRequest {
    /// Check required fields and convert into a store record.
    pub fn validate(self) -> Result<NewSubscription, AppError> {
        let endpoint = non_empty(self.endpoint)
            .ok_or_else(|| AppError::Validation("Invalid subscription: missing endpoint".to_string()))?;

        let keys = self.keys.unwrap_or_default();
        let (Some(p256dh), Some(auth)) = (non_empty(keys.p256dh), non_empty(keys.auth)) else {
            return Err(AppError::Validation(
                "Invalid subscription: missing keys.p256dh or keys.auth".to_string(),
            ));
        };

        Ok(NewSubscription {
            endpoint,
            keys: SubscriptionKeys { p256dh, auth },
            expiration_time: self.expiration_time,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /subscribe — Insert or refresh a push subscription.
async fn subscribe(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, AppError> {
    let new = req.validate()?;
    let sub = state.store.upsert(new).await?;

    tracing::info!(endpoint = %sub.endpoint, "Subscription stored");

    Ok(Json(SubscribeResponse {
        message: "Subscribed".to_string(),
        endpoint: sub.endpoint,
    }))
}
