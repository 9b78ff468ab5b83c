//! Shared application state for the Axum API server.

use std::sync::Arc;
use std::time::Instant;

use pushrelay_common::config::AppConfig;
use pushrelay_notifier::{Dispatcher, PushTransport};
use pushrelay_store::{PushLog, SubscriptionStore};

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<SubscriptionStore>,
    pub push_log: Arc<PushLog>,
    pub dispatcher: Arc<Dispatcher>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<SubscriptionStore>,
        push_log: Arc<PushLog>,
        transport: Arc<dyn PushTransport>,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(
            store.clone(),
            push_log.clone(),
            transport,
        ));

        Self {
            config,
            store,
            push_log,
            dispatcher,
            started_at: Instant::now(),
        }
    }

    /// Open both data files under `config.data_dir` and assemble the state.
    pub async fn open(
        config: AppConfig,
        transport: Arc<dyn PushTransport>,
    ) -> Result<Self, pushrelay_common::error::AppError> {
        let store = Arc::new(SubscriptionStore::open(config.subscriptions_path()).await?);
        let push_log =
            Arc::new(PushLog::open(config.push_log_path(), config.push_log_capacity).await?);

        Ok(Self::new(config, store, push_log, transport))
    }
}
