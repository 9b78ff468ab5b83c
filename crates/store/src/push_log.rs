//! Bounded append-only log of push delivery attempts.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use pushrelay_common::error::AppError;
use pushrelay_common::types::PushLogEntry;

use crate::json_file;

/// Default number of entries retained on disk.
pub const DEFAULT_CAPACITY: usize = 1000;

/// File-backed FIFO log capped at `capacity` entries.
pub struct PushLog {
    path: PathBuf,
    capacity: usize,
    write_lock: Mutex<()>,
}

impl PushLog {
    pub async fn open(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, AppError> {
        let path = path.into();
        json_file::ensure_file(&path).await?;

        Ok(Self {
            path,
            capacity: capacity.max(1),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry, evicting the oldest beyond capacity.
    ///
    /// Never fails: a write error is logged and the entry is dropped.
    pub async fn append(&self, entry: PushLogEntry) {
        let _guard = self.write_lock.lock().await;

        let mut entries: Vec<PushLogEntry> = json_file::read_array_or_empty(&self.path).await;
        entries.push(entry);
        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }

        if let Err(e) = json_file::write_array(&self.path, &entries).await {
            tracing::warn!(error = %e, "Failed to write push log");
        }
    }

    /// All retained entries, oldest first.
    pub async fn entries(&self) -> Vec<PushLogEntry> {
        json_file::read_array_or_empty(&self.path).await
    }

    /// The last `n` entries, oldest first.
    pub async fn recent(&self, n: usize) -> Vec<PushLogEntry> {
        let mut entries = self.entries().await;
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_temp(capacity: usize) -> (tempfile::TempDir, PushLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = PushLog::open(dir.path().join("push-logs.json"), capacity)
            .await
            .unwrap();
        (dir, log)
    }

    #[tokio::test]
    async fn test_capacity_drops_oldest_first() {
        let (_dir, log) = open_temp(DEFAULT_CAPACITY).await;

        for i in 0..=DEFAULT_CAPACITY {
            log.append(PushLogEntry::success(&format!("https://push/{}", i)))
                .await;
        }

        let entries = log.entries().await;
        assert_eq!(entries.len(), DEFAULT_CAPACITY);
        assert_eq!(entries[0].endpoint, "https://push/1");
        assert_eq!(
            entries[DEFAULT_CAPACITY - 1].endpoint,
            format!("https://push/{}", DEFAULT_CAPACITY)
        );
    }

    #[tokio::test]
    async fn test_recent_returns_tail() {
        let (_dir, log) = open_temp(10).await;
        for i in 0..5 {
            log.append(PushLogEntry::failure(&format!("e{}", i), "gone")).await;
        }

        let recent = log.recent(2).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].endpoint, "e3");
        assert_eq!(recent[1].endpoint, "e4");
        assert_eq!(recent[1].error.as_deref(), Some("gone"));

        assert_eq!(log.recent(50).await.len(), 5);
    }

    #[tokio::test]
    async fn test_append_survives_unwritable_file() {
        let (_dir, log) = open_temp(10).await;
        // Replace the log file with a directory so the rename fails
        tokio::fs::remove_file(log.path()).await.unwrap();
        tokio::fs::create_dir(log.path()).await.unwrap();

        log.append(PushLogEntry::success("e")).await;

        assert!(log.entries().await.is_empty());
    }
}
