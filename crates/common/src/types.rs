use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Encryption material handed out by the browser's push manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    /// Client public key (P-256 ECDH, URL-safe base64)
    pub p256dh: String,
    /// Client authentication secret (URL-safe base64)
    pub auth: String,
}

/// A browser push subscription as persisted in the subscription file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Push service URL; unique key of the record
    pub endpoint: String,
    pub keys: SubscriptionKeys,
    /// Passed through verbatim when the browser supplies it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

/// A validated subscribe request, before timestamps are assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
    pub expiration_time: Option<serde_json::Value>,
}

/// One delivery attempt recorded in the push log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushLogEntry {
    pub endpoint: String,
    pub success: bool,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PushLogEntry {
    pub fn success(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            success: true,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(endpoint: &str, error: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            success: false,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Notification content fanned out to every subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    /// Arbitrary metadata forwarded to the service worker
    pub data: serde_json::Value,
}

/// A single failed delivery reported back to the caller of `/notify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedDelivery {
    pub endpoint: String,
    pub error: String,
}

/// Aggregate outcome of one dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSummary {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
    /// Subscriptions dropped after a permanent (410) failure
    #[serde(skip_serializing)]
    pub removed: usize,
    /// First failures only; see `Dispatcher::MAX_REPORTED_FAILURES`
    pub failed_subs: Vec<FailedDelivery>,
}

/// Rolling success statistics over the tail of the push log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
    pub success_rate: String,
}

impl RecentActivity {
    pub fn from_entries(entries: &[PushLogEntry]) -> Self {
        let total = entries.len();
        let success = entries.iter().filter(|e| e.success).count();
        let success_rate = if total > 0 {
            format!("{:.2}%", success as f64 / total as f64 * 100.0)
        } else {
            "0%".to_string()
        };

        Self {
            total,
            success,
            failure: total - success,
            success_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_uses_camel_case_on_disk() {
        let now = Utc::now();
        let sub = Subscription {
            endpoint: "https://push.example/abc".to_string(),
            keys: SubscriptionKeys {
                p256dh: "p".to_string(),
                auth: "a".to_string(),
            },
            expiration_time: None,
            created_at: now,
            last_used: now,
        };
        let json = serde_json::to_value(&sub).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("lastUsed").is_some());
        assert!(json.get("expirationTime").is_none());
        assert_eq!(json["keys"]["p256dh"], "p");
    }

    #[test]
    fn test_recent_activity_rate() {
        let entries = vec![
            PushLogEntry::success("a"),
            PushLogEntry::success("b"),
            PushLogEntry::failure("c", "boom"),
        ];
        let activity = RecentActivity::from_entries(&entries);
        assert_eq!(activity.total, 3);
        assert_eq!(activity.success, 2);
        assert_eq!(activity.failure, 1);
        assert_eq!(activity.success_rate, "66.67%");
    }

    #[test]
    fn test_recent_activity_empty() {
        let activity = RecentActivity::from_entries(&[]);
        assert_eq!(activity.total, 0);
        assert_eq!(activity.success_rate, "0%");
    }

    #[test]
    fn test_dispatch_summary_hides_removed_count() {
        let summary = DispatchSummary {
            total: 1,
            failed: 1,
            removed: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("removed").is_none());
        assert_eq!(json["failedSubs"], serde_json::json!([]));
    }
}
