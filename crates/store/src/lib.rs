//! Flat-file persistence for push subscriptions and delivery logs.
//!
//! Both stores keep a pretty-printed JSON array on disk and rewrite the whole
//! file on every mutation (temp file + rename), serialized by an async mutex.

mod json_file;
pub mod push_log;
pub mod subscription;

pub use push_log::PushLog;
pub use subscription::SubscriptionStore;
