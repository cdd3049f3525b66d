//! Notification source adapters
//!
//! REST client (list + outbound pushes), wire models, and the WebSocket
//! stream listener.

pub mod client;
pub mod models;
pub mod stream;

pub use client::{PushClient, PushFetcher, PushSink};
pub use models::{OutboundPush, StreamSignal};
pub use stream::{ConnectionState, PushListener};
