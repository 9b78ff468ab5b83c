//! Push transport — delivers one encrypted message to one push service endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use thiserror::Error;
use web_push::{
    ContentEncoding, PartialVapidSignatureBuilder, SubscriptionInfo, URL_SAFE_NO_PAD,
    VapidSignatureBuilder, WebPushMessage, WebPushMessageBuilder,
};

use pushrelay_common::config::AppConfig;
use pushrelay_common::error::AppError;
use pushrelay_common::types::Subscription;

/// Longest push-service response body kept in an error message.
const MAX_REASON_LEN: usize = 200;

/// Why a single delivery attempt failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("push service responded with {status}: {reason}")]
    Rejected { status: u16, reason: String },

    #[error("push request failed: {0}")]
    Network(String),

    #[error("failed to build push message: {0}")]
    Encoding(String),
}

impl TransportError {
    /// HTTP status returned by the push service, if it answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TransportError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The push service reported the subscription as gone; it must be discarded.
    pub fn is_permanent(&self) -> bool {
        self.status_code() == Some(StatusCode::GONE.as_u16())
    }
}

/// Delivery seam between the dispatcher and the push services.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Deliver `payload` to the browser behind `subscription`.
    async fn send(&self, subscription: &Subscription, payload: &[u8]) -> Result<(), TransportError>;
}

/// Production transport: `web-push` encryption + VAPID, `reqwest` delivery.
pub struct WebPushTransport {
    client: reqwest::Client,
    signer: PartialVapidSignatureBuilder,
    subject: String,
    ttl: u32,
}

impl WebPushTransport {
    /// Build the transport from configuration, validating the VAPID private key.
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        // VAPID keys are URL-safe base64 without padding
        let signer =
            VapidSignatureBuilder::from_base64_no_sub(&config.vapid_private_key, URL_SAFE_NO_PAD)
                .map_err(|e| AppError::Config(format!("Invalid VAPID_PRIVATE_KEY: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.push_timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            signer,
            subject: format!("mailto:{}", config.vapid_email),
            ttl: config.push_ttl_seconds,
        })
    }

    /// Encrypt and sign `payload` for one subscription.
    fn build_message(
        &self,
        subscription: &Subscription,
        payload: &[u8],
    ) -> Result<WebPushMessage, TransportError> {
        let info = SubscriptionInfo::new(
            subscription.endpoint.as_str(),
            subscription.keys.p256dh.as_str(),
            subscription.keys.auth.as_str(),
        );

        let mut vapid = self.signer.clone().add_sub_info(&info);
        vapid.add_claim("sub", self.subject.as_str());
        let signature = vapid
            .build()
            .map_err(|e| TransportError::Encoding(e.to_string()))?;

        let mut builder = WebPushMessageBuilder::new(&info);
        builder.set_ttl(self.ttl);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_vapid_signature(signature);
        builder
            .build()
            .map_err(|e| TransportError::Encoding(e.to_string()))
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn send(&self, subscription: &Subscription, payload: &[u8]) -> Result<(), TransportError> {
        let message = self.build_message(subscription, payload)?;

        let mut request = self
            .client
            .post(&subscription.endpoint)
            .header("TTL", message.ttl.to_string());

        if let Some(topic) = message.topic {
            request = request.header("Topic", topic);
        }

        if let Some(payload) = message.payload {
            request = request
                .header(CONTENT_ENCODING, payload.content_encoding.to_str())
                .header(CONTENT_TYPE, "application/octet-stream");
            for (name, value) in payload.crypto_headers {
                request = request.header(name, value);
            }
            request = request.body(payload.content);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(rejection(status, &body))
    }
}

/// Turn a non-success push service response into a `TransportError`.
fn rejection(status: StatusCode, body: &str) -> TransportError {
    let body = body.trim();
    let reason = if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown").to_string()
    } else {
        body.chars().take(MAX_REASON_LEN).collect()
    };

    TransportError::Rejected {
        status: status.as_u16(),
        reason,
    }
}
