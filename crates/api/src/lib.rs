//! HTTP surface of the push relay.
//!
//! Endpoints:
//! - GET  /               — service metadata
//! - POST /subscribe      — store a browser push subscription
//! - POST /notify         — fan a notification out to every subscription
//! - GET  /status         — subscription count and recent delivery health
//! - GET  /vapidPublicKey — public key for `pushManager.subscribe`

pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;
