//! Wire frames and topic filters.
//!
//! The bus speaks JSON text frames over the WebSocket, internally tagged
//! by a `type` field. Two frames cover the whole protocol: a client
//! registers interest with `subscribe`, and retained-topic updates travel
//! as `message` in both directions.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One retained-topic update, as delivered to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub topic: String,
    pub payload: String,
}

/// A JSON text frame on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// Client → server: register interest in a topic filter. The server
    /// replays retained values for every matching topic, then streams
    /// further updates.
    Subscribe { filter: String },
    /// Either direction: one topic's new value. An empty payload is a
    /// value like any other, not a deletion.
    Message { topic: String, payload: String },
}

impl Frame {
    /// Serialize for the write half.
    pub fn encode(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an inbound text frame.
    pub fn decode(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }
}

/// MQTT-style topic filter match, trailing multi-level wildcard only.
///
/// `home/#` matches `home` itself and every topic below it; a filter
/// without `#` matches exactly one topic. Segment boundaries are
/// respected: `home/#` does not match `homework`.
#[must_use]
pub fn filter_matches(filter: &str, topic: &str) -> bool {
    if filter == "#" {
        return true;
    }
    if let Some(parent) = filter.strip_suffix("/#") {
        return match topic.strip_prefix(parent) {
            Some("") => true,
            Some(rest) => rest.starts_with('/'),
            None => false,
        };
    }
    filter == topic
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn subscribe_frame_wire_shape() {
        let frame = Frame::Subscribe { filter: "home/#".to_owned() };
        let encoded: serde_json::Value = serde_json::from_str(&frame.encode().unwrap()).unwrap();
        assert_eq!(encoded, json!({ "type": "subscribe", "filter": "home/#" }));
    }

    #[test]
    fn message_frame_round_trips() {
        let text = r#"{"type":"message","topic":"home/kitchen/oven_1/power","payload":"on"}"#;
        let frame = Frame::decode(text).unwrap();
        assert_eq!(
            frame,
            Frame::Message {
                topic: "home/kitchen/oven_1/power".to_owned(),
                payload: "on".to_owned(),
            }
        );
        assert_eq!(Frame::decode(&frame.encode().unwrap()).unwrap(), frame);
    }

    #[test]
    fn empty_payload_is_legal() {
        let frame = Frame::decode(r#"{"type":"message","topic":"home/hall/display_1/message","payload":""}"#)
            .unwrap();
        assert_eq!(
            frame,
            Frame::Message {
                topic: "home/hall/display_1/message".to_owned(),
                payload: String::new(),
            }
        );
    }

    #[test]
    fn unknown_frame_types_are_rejected() {
        assert!(Frame::decode(r#"{"type":"publish","topic":"t","payload":"p"}"#).is_err());
        assert!(Frame::decode("not json").is_err());
    }

    #[test]
    fn wildcard_filter_matches_subtree() {
        assert!(filter_matches("home/#", "home"));
        assert!(filter_matches("home/#", "home/kitchen"));
        assert!(filter_matches("home/#", "home/kitchen/oven_1/power"));
        assert!(filter_matches("#", "anything/at/all"));
    }

    #[test]
    fn wildcard_respects_segment_boundaries() {
        assert!(!filter_matches("home/#", "homework"));
        assert!(!filter_matches("home/#", "homework/desk_1/power"));
        assert!(!filter_matches("home/#", "work/kitchen/oven_1/power"));
    }

    #[test]
    fn bare_filters_match_exactly() {
        assert!(filter_matches("home/kitchen/oven_1/power", "home/kitchen/oven_1/power"));
        assert!(!filter_matches("home/kitchen/oven_1/power", "home/kitchen/oven_1"));
        assert!(!filter_matches("home", "home/kitchen"));
    }
}
