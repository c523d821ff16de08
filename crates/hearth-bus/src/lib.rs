//! WebSocket message-bus client for the hearth dashboard.
//!
//! The bus is a retained-topic broker: subscribing replays the last value
//! of every matching topic, then streams further updates. This crate
//! handles the connection (with reconnect + backoff), the JSON frame
//! codec, and client-side filtering; it knows nothing about widgets or
//! control semantics — consumers feed [`BusMessage`]s into whatever
//! state they keep.

pub mod client;
pub mod error;
pub mod message;

pub use client::{BusClient, BusConfig, BusEvent, BusPublisher, ReconnectConfig};
pub use error::Error;
pub use message::{BusMessage, Frame, filter_matches};
