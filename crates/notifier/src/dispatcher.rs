//! Fan-out dispatcher.
//!
//! One run:
//! 1. Snapshots the subscription list once
//! 2. Delivers the serialized payload to each subscription, sequentially
//! 3. Logs every attempt to the push log
//! 4. Drops subscriptions the push service reports as gone (410)
//!
//! A failed delivery never aborts the run; outcomes are aggregated into a
//! `DispatchSummary`.

use std::sync::Arc;

use pushrelay_common::error::AppError;
use pushrelay_common::types::{DispatchSummary, FailedDelivery, NotificationPayload, PushLogEntry};
use pushrelay_store::{PushLog, SubscriptionStore};

use crate::transport::PushTransport;

/// Delivers notification payloads to every stored subscription.
pub struct Dispatcher {
    store: Arc<SubscriptionStore>,
    log: Arc<PushLog>,
    transport: Arc<dyn PushTransport>,
}

impl Dispatcher {
    /// Number of failures reported back to the caller of a run.
    pub const MAX_REPORTED_FAILURES: usize = 10;

    pub fn new(
        store: Arc<SubscriptionStore>,
        log: Arc<PushLog>,
        transport: Arc<dyn PushTransport>,
    ) -> Self {
        Self {
            store,
            log,
            transport,
        }
    }

    /// Deliver `payload` to every current subscription.
    ///
    /// Subscriptions added while the run is in progress are not included.
    pub async fn dispatch(&self, payload: &NotificationPayload) -> Result<DispatchSummary, AppError> {
        let subscriptions = self.store.list().await;

        if subscriptions.is_empty() {
            tracing::debug!("No subscriptions to notify");
            return Ok(DispatchSummary::default());
        }

        let body = serde_json::to_vec(payload)
            .map_err(|e| AppError::Internal(format!("Failed to serialize payload: {}", e)))?;

        let mut summary = DispatchSummary {
            total: subscriptions.len(),
            ..Default::default()
        };

        tracing::info!(total = summary.total, title = %payload.title, "Dispatch started");

        for sub in &subscriptions {
            match self.transport.send(sub, &body).await {
                Ok(()) => {
                    summary.sent += 1;
                    tracing::debug!(endpoint = %sub.endpoint, "Push delivered");
                    self.log.append(PushLogEntry::success(&sub.endpoint)).await;
                }
                Err(e) => {
                    summary.failed += 1;
                    let message = e.to_string();
                    tracing::warn!(endpoint = %sub.endpoint, error = %message, "Push failed");
                    self.log
                        .append(PushLogEntry::failure(&sub.endpoint, message.clone()))
                        .await;

                    if summary.failed_subs.len() < Self::MAX_REPORTED_FAILURES {
                        summary.failed_subs.push(FailedDelivery {
                            endpoint: sub.endpoint.clone(),
                            error: message,
                        });
                    }

                    if e.is_permanent() {
                        match self.store.remove(&sub.endpoint).await {
                            Ok(true) => summary.removed += 1,
                            Ok(false) => {}
                            Err(err) => tracing::error!(
                                endpoint = %sub.endpoint,
                                error = %err,
                                "Failed to remove expired subscription"
                            ),
                        }
                    }
                }
            }
        }

        tracing::info!(
            total = summary.total,
            sent = summary.sent,
            failed = summary.failed,
            removed = summary.removed,
            "Dispatch finished"
        );

        Ok(summary)
    }
}
