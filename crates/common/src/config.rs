use std::path::PathBuf;

use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// VAPID public key (URL-safe base64), handed to browsers for subscribing
    pub vapid_public_key: String,

    /// VAPID private key (URL-safe base64) used to sign push requests
    pub vapid_private_key: String,

    /// Contact address placed in the VAPID `sub` claim
    pub vapid_email: String,

    /// CORS allow-list; empty means any origin
    pub allowed_origins: Vec<String>,

    /// HTTP listen port
    pub port: u16,

    /// Directory holding `subscriptions.json` and `push-logs.json`
    pub data_dir: PathBuf,

    /// TTL attached to every push message, in seconds (default: 4 weeks)
    pub push_ttl_seconds: u32,

    /// Timeout for a single outbound push request, in seconds
    pub push_timeout_seconds: u64,

    /// Maximum accepted request body size in bytes (default: 10 MiB)
    pub body_limit_bytes: usize,

    /// Maximum number of entries kept in the push log (default: 1000)
    pub push_log_capacity: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        Ok(Self {
            vapid_public_key: required("VAPID_PUBLIC_KEY")?,
            vapid_private_key: required("VAPID_PRIVATE_KEY")?,
            vapid_email: lookup("VAPID_EMAIL")
                .unwrap_or_else(|| "your-email@example.com".to_string()),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid u16"))?,
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            push_ttl_seconds: lookup("PUSH_TTL_SECONDS")
                .unwrap_or_else(|| "2419200".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PUSH_TTL_SECONDS must be a valid u32"))?,
            push_timeout_seconds: lookup("PUSH_TIMEOUT_SECONDS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PUSH_TIMEOUT_SECONDS must be a valid u64"))?,
            body_limit_bytes: lookup("BODY_LIMIT_BYTES")
                .unwrap_or_else(|| (10 * 1024 * 1024).to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("BODY_LIMIT_BYTES must be a valid usize"))?,
            push_log_capacity: lookup("PUSH_LOG_CAPACITY")
                .unwrap_or_else(|| "1000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PUSH_LOG_CAPACITY must be a valid usize"))?,
        })
    }

    pub fn subscriptions_path(&self) -> PathBuf {
        self.data_dir.join("subscriptions.json")
    }

    pub fn push_log_path(&self) -> PathBuf {
        self.data_dir.join("push-logs.json")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
