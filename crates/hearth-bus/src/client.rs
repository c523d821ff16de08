//! Bus connection with auto-reconnect.
//!
//! Connects to the WebSocket message bus, subscribes to the configured
//! topic filter, and streams matching updates through an
//! [`tokio::sync::mpsc`] channel. Reconnects with exponential backoff +
//! jitter, re-subscribing after every new connection; queued publishes
//! flush once the link is back.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::message::{BusMessage, Frame, filter_matches};

// ── ReconnectConfig ──────────────────────────────────────────────────────

/// Exponential backoff configuration for bus reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on the backoff delay. Default: 30s.
    pub max_delay: Duration,

    /// Maximum reconnection attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

// ── BusConfig ────────────────────────────────────────────────────────────

/// Everything the client needs to reach and scope the bus.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// WebSocket endpoint, `ws://` or `wss://`.
    pub url: Url,

    /// Topic filter sent with the subscription, e.g. `home/#`. Also
    /// applied client-side to inbound frames.
    pub filter: String,

    pub reconnect: ReconnectConfig,
}

// ── BusEvent ─────────────────────────────────────────────────────────────

/// What the client reports to its consumer.
///
/// Link-state transitions ride the same channel as updates so the UI can
/// render connection status without a second subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// Link established and the subscription sent.
    Connected,
    /// Link lost; the client is backing off before the next attempt.
    Disconnected,
    /// One retained-topic update matching the subscription filter.
    Message(BusMessage),
}

// ── BusClient ────────────────────────────────────────────────────────────

/// Handle to a running bus connection.
///
/// Dropping the handle does not stop the background task; call
/// [`shutdown`](Self::shutdown) to tear it down.
#[derive(Debug)]
pub struct BusClient {
    publish_tx: mpsc::UnboundedSender<(String, String)>,
    cancel: CancellationToken,
}

impl BusClient {
    /// Spawn the reconnection loop onto the ambient Tokio runtime and
    /// return the handle plus the event stream.
    ///
    /// Returns immediately; the first connection attempt happens in the
    /// background and announces itself with [`BusEvent::Connected`].
    #[must_use]
    pub fn connect(
        config: BusConfig,
        cancel: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<BusEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (publish_tx, publish_rx) = mpsc::unbounded_channel();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            bus_loop(config, event_tx, publish_rx, task_cancel).await;
        });

        (Self { publish_tx, cancel }, event_rx)
    }

    /// A cheap clonable handle for publishing updates.
    #[must_use]
    pub fn publisher(&self) -> BusPublisher {
        BusPublisher { publish_tx: self.publish_tx.clone() }
    }

    /// Signal the background task to shut down gracefully.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Fire-and-forget publishing handle.
///
/// `publish` is synchronous: it queues the update for the write half and
/// returns. Updates queued while the link is down flush after reconnect;
/// if the client has shut down they are silently dropped.
#[derive(Debug, Clone)]
pub struct BusPublisher {
    publish_tx: mpsc::UnboundedSender<(String, String)>,
}

impl BusPublisher {
    pub fn publish(&self, topic: &str, payload: &str) {
        let _ = self.publish_tx.send((topic.to_owned(), payload.to_owned()));
    }
}

// ── Background reconnection loop ─────────────────────────────────────────

/// Main loop: connect → subscribe → pump → on error, backoff → reconnect.
async fn bus_loop(
    config: BusConfig,
    event_tx: mpsc::UnboundedSender<BusEvent>,
    mut publish_rx: mpsc::UnboundedReceiver<(String, String)>,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = connect_and_pump(&config, &event_tx, &mut publish_rx, &cancel) => {
                let _ = event_tx.send(BusEvent::Disconnected);
                match result {
                    // Clean disconnect (server close frame or stream ended).
                    // Reset the attempt counter and reconnect immediately.
                    Ok(()) => {
                        tracing::info!("bus disconnected cleanly, reconnecting");
                        attempt = 0;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, attempt, "bus connection error");

                        if let Some(max) = config.reconnect.max_retries {
                            if attempt >= max {
                                tracing::error!(
                                    max_retries = max,
                                    "bus reconnection limit reached, giving up"
                                );
                                break;
                            }
                        }

                        let delay = calculate_backoff(attempt, &config.reconnect);
                        tracing::info!(
                            delay_ms = delay.as_millis() as u64,
                            attempt,
                            "waiting before reconnect"
                        );

                        tokio::select! {
                            biased;
                            _ = cancel.cancelled() => break,
                            _ = tokio::time::sleep(delay) => {}
                        }

                        attempt += 1;
                    }
                }
            }
        }
    }
}

// ── Single connection lifecycle ──────────────────────────────────────────

/// Establish one connection, subscribe, then pump frames both ways until
/// the link drops.
///
/// The subscription is per-connection state: the server replays retained
/// values after each `subscribe`, which is exactly what a fresh or
/// reconnected dashboard needs to rebuild its view.
async fn connect_and_pump(
    config: &BusConfig,
    event_tx: &mpsc::UnboundedSender<BusEvent>,
    publish_rx: &mut mpsc::UnboundedReceiver<(String, String)>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    tracing::info!(url = %config.url, "connecting to bus");

    let uri: tungstenite::http::Uri = config
        .url
        .as_str()
        .parse()
        .map_err(|e: tungstenite::http::uri::InvalidUri| Error::Connect(e.to_string()))?;

    let (ws_stream, _response) = tokio_tungstenite::connect_async(uri)
        .await
        .map_err(|e| Error::Connect(e.to_string()))?;

    let (mut write, mut read) = ws_stream.split();

    let subscribe = Frame::Subscribe { filter: config.filter.clone() }.encode()?;
    write
        .send(tungstenite::Message::Text(subscribe.into()))
        .await
        .map_err(|e| Error::Send(e.to_string()))?;

    tracing::info!(filter = %config.filter, "bus connected and subscribed");
    let _ = event_tx.send(BusEvent::Connected);

    let mut commands_open = true;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            command = publish_rx.recv(), if commands_open => {
                match command {
                    Some((topic, payload)) => {
                        let frame = Frame::Message { topic, payload }.encode()?;
                        write
                            .send(tungstenite::Message::Text(frame.into()))
                            .await
                            .map_err(|e| Error::Send(e.to_string()))?;
                    }
                    // All publishers dropped; read-only from here on.
                    None => commands_open = false,
                }
            }
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        forward_update(&text, &config.filter, event_tx);
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite handles pong replies automatically
                        tracing::trace!("bus ping");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        if let Some(ref cf) = frame {
                            tracing::info!(code = %cf.code, reason = %cf.reason, "bus close frame");
                        } else {
                            tracing::info!("bus close frame (no payload)");
                        }
                        return Ok(());
                    }
                    Some(Err(e)) => {
                        return Err(Error::Connect(e.to_string()));
                    }
                    None => {
                        // Stream ended without a close frame
                        tracing::info!("bus stream ended");
                        return Ok(());
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }
}

// ── Inbound frame handling ───────────────────────────────────────────────

/// Parse one inbound text frame and forward it if it is a message inside
/// the subscription filter.
///
/// Unparsable text, non-message frames, and foreign topics are logged and
/// dropped here, so a chatty server cannot push anything past the filter
/// into the engine.
fn forward_update(text: &str, filter: &str, event_tx: &mpsc::UnboundedSender<BusEvent>) {
    let frame = match Frame::decode(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(error = %e, "unparsable bus frame");
            return;
        }
    };

    let Frame::Message { topic, payload } = frame else {
        tracing::debug!("ignoring non-message frame");
        return;
    };

    if !filter_matches(filter, &topic) {
        tracing::debug!(topic, "dropping update outside subscription filter");
        return;
    }

    // Ignore send errors -- just means the consumer is gone.
    let _ = event_tx.send(BusEvent::Message(BusMessage { topic, payload }));
}

// ── Backoff calculation ──────────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) + jitter`
///
/// Jitter is +-25% to spread out reconnection storms from multiple
/// dashboards pointed at the same bus.
fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(attempt as i32);
    let capped = base.min(config.max_delay.as_secs_f64());

    // Deterministic "jitter" seeded from the attempt number.
    // Not cryptographically random, but good enough for backoff spread.
    let jitter_factor = 1.0 + 0.25 * ((attempt as f64 * 7.3).sin());
    let with_jitter = (capped * jitter_factor).max(0.0);

    Duration::from_secs_f64(with_jitter)
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_reconnect_config() {
        let config = ReconnectConfig::default();
        assert_eq!(config.initial_delay, Duration::from_secs(1));
        assert_eq!(config.max_delay, Duration::from_secs(30));
        assert!(config.max_retries.is_none());
    }

    #[test]
    fn backoff_increases_exponentially() {
        let config = ReconnectConfig::default();

        let d0 = calculate_backoff(0, &config);
        let d1 = calculate_backoff(1, &config);
        let d2 = calculate_backoff(2, &config);

        // Each step should roughly double (within jitter bounds)
        assert!(d1 > d0, "d1 ({d1:?}) should be greater than d0 ({d0:?})");
        assert!(d2 > d1, "d2 ({d2:?}) should be greater than d1 ({d1:?})");
    }

    #[test]
    fn backoff_caps_at_max_delay() {
        let config = ReconnectConfig {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            max_retries: None,
        };

        let d10 = calculate_backoff(10, &config);
        // With jitter factor up to 1.25, max effective is 12.5s
        assert!(
            d10 <= Duration::from_secs(13),
            "delay at attempt 10 ({d10:?}) should be capped near max_delay"
        );
    }

    #[test]
    fn matching_updates_are_forwarded() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        forward_update(
            r#"{"type":"message","topic":"home/kitchen/oven_1/power","payload":"on"}"#,
            "home/#",
            &tx,
        );

        assert_eq!(
            rx.try_recv().unwrap(),
            BusEvent::Message(BusMessage {
                topic: "home/kitchen/oven_1/power".to_owned(),
                payload: "on".to_owned(),
            })
        );
    }

    #[test]
    fn foreign_topics_stop_at_the_filter() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        forward_update(
            r#"{"type":"message","topic":"work/desk_1/lamp/power","payload":"on"}"#,
            "home/#",
            &tx,
        );

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn empty_payloads_are_forwarded() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        forward_update(
            r#"{"type":"message","topic":"home/hall/display_1/message","payload":""}"#,
            "home/#",
            &tx,
        );

        assert_eq!(
            rx.try_recv().unwrap(),
            BusEvent::Message(BusMessage {
                topic: "home/hall/display_1/message".to_owned(),
                payload: String::new(),
            })
        );
    }

    #[test]
    fn malformed_and_non_message_frames_are_skipped() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<BusEvent>();

        forward_update("not json at all", "home/#", &tx);
        forward_update(r#"{"type":"subscribe","filter":"home/#"}"#, "home/#", &tx);

        // Should not panic, should just log and skip
        assert!(rx.try_recv().is_err());
    }
}
