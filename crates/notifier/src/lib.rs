//! Web push fan-out.
//!
//! `Dispatcher` walks the subscription store and hands one encrypted message
//! per subscription to a `PushTransport`. `WebPushTransport` is the production
//! transport: `web-push` builds the aes128gcm payload and VAPID headers and
//! `reqwest` delivers it to the push service.

pub mod dispatcher;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use transport::{PushTransport, TransportError, WebPushTransport};
