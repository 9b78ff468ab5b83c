//! Subscription store — durable endpoint → subscription mapping.
//!
//! Records live in a single JSON array ordered by first insertion. There is no
//! row-level update: every mutation re-reads the file, merges in memory and
//! rewrites the whole array while holding the writer lock.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::Mutex;

use pushrelay_common::error::AppError;
use pushrelay_common::types::{NewSubscription, Subscription};

use crate::json_file;

/// File-backed registry of push subscriptions.
pub struct SubscriptionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SubscriptionStore {
    /// Open the store at `path`, creating an empty file if needed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        json_file::ensure_file(&path).await?;

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All subscriptions in insertion order.
    ///
    /// An unreadable or malformed file yields an empty list instead of an
    /// error so that the service keeps answering.
    pub async fn list(&self) -> Vec<Subscription> {
        json_file::read_array_or_empty(&self.path).await
    }

    /// Insert a subscription, or refresh an existing one with the same endpoint.
    ///
    /// Refreshing replaces the key material and bumps `last_used` while keeping
    /// the first `created_at`.
    pub async fn upsert(&self, new: NewSubscription) -> Result<Subscription, AppError> {
        let _guard = self.write_lock.lock().await;

        let mut subs = self.list().await;
        let now = Utc::now();

        let stored = match subs.iter_mut().find(|s| s.endpoint == new.endpoint) {
            Some(existing) => {
                existing.keys = new.keys;
                existing.expiration_time = new.expiration_time;
                existing.last_used = now.max(existing.last_used);
                tracing::debug!(endpoint = %existing.endpoint, "Subscription refreshed");
                existing.clone()
            }
            None => {
                let sub = Subscription {
                    endpoint: new.endpoint,
                    keys: new.keys,
                    expiration_time: new.expiration_time,
                    created_at: now,
                    last_used: now,
                };
                subs.push(sub.clone());
                tracing::info!(endpoint = %sub.endpoint, "Subscription created");
                sub
            }
        };

        json_file::write_array(&self.path, &subs).await?;
        Ok(stored)
    }

    /// Delete the subscription for `endpoint`. Returns true if one was removed.
    pub async fn remove(&self, endpoint: &str) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;

        let mut subs = self.list().await;
        let before = subs.len();
        subs.retain(|s| s.endpoint != endpoint);

        if subs.len() == before {
            return Ok(false);
        }

        json_file::write_array(&self.path, &subs).await?;
        tracing::info!(endpoint = %endpoint, "Subscription removed");
        Ok(true)
    }
}
