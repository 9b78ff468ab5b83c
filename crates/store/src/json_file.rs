//! Whole-file JSON array persistence helpers.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use pushrelay_common::error::AppError;

/// Create the file (and its parent directory) seeded with `[]` if it does not exist.
pub(crate) async fn ensure_file(path: &Path) -> Result<(), AppError> {
    if tokio::fs::try_exists(path)
        .await
        .map_err(|e| AppError::storage(path, e))?
    {
        return Ok(());
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::storage(parent, e))?;
    }

    tokio::fs::write(path, b"[]")
        .await
        .map_err(|e| AppError::storage(path, e))?;

    tracing::info!(path = %path.display(), "Created empty data file");
    Ok(())
}

/// Read a JSON array from disk. An empty file reads as an empty array.
pub(crate) async fn read_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, AppError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::storage(path, e))?;

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice(&raw).map_err(|e| AppError::storage(path, e))
}

/// Read a JSON array, degrading to an empty array when the file is unreadable or malformed.
pub(crate) async fn read_array_or_empty<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    match read_array(path).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable data file, treating as empty");
            Vec::new()
        }
    }
}

/// Replace the file contents atomically: write a sibling temp file, then rename over.
pub(crate) async fn write_array<T: Serialize>(path: &Path, items: &[T]) -> Result<(), AppError> {
    let json = serde_json::to_vec_pretty(items).map_err(|e| AppError::storage(path, e))?;
    let tmp = temp_path(path);

    tokio::fs::write(&tmp, &json)
        .await
        .map_err(|e| AppError::storage(&tmp, e))?;

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(AppError::storage(path, e));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
