//! Topic string parsing and naming conventions.
//!
//! Topics are `/`-separated paths: `home/zone/device/control` for a leaf
//! control, with a fifth `values` segment for an enum's option-list
//! companion. Zone and device identity are prefixes of the control topic,
//! so the strings themselves double as widget identifiers.

/// Split a topic into its `/`-separated segments.
///
/// Callers lean on exact counts: four segments make a leaf control, five
/// make an option-list companion, anything else is recorded but never
/// rendered.
pub fn segments(topic: &str) -> Vec<&str> {
    topic.split('/').collect()
}

/// Whether `topic` is a well-formed leaf control under `prefix`:
/// exactly four segments, the first equal to the installation prefix.
pub fn is_control(topic: &str, prefix: &str) -> bool {
    let parts = segments(topic);
    parts.len() == 4 && parts.first() == Some(&prefix)
}

/// The last segment of a topic.
pub fn last_segment(topic: &str) -> &str {
    topic.rsplit('/').next().unwrap_or(topic)
}

/// Human-facing name for a zone, device, or control topic.
///
/// Takes the last segment, drops everything from the first `_` onward,
/// and turns the first `-` into a space: `lamp_2` → `lamp`,
/// `living-room` → `living room`. Only the first occurrence of each
/// separator is processed — a quirk of the naming convention that callers
/// depend on, not something to fix here.
pub fn label(topic: &str) -> String {
    let last = last_segment(topic);
    let base = last.split('_').next().unwrap_or(last);
    base.replacen('-', " ", 1)
}

/// Display unit for a sensor reading, derived from the topic suffix.
pub fn unit(topic: &str) -> &'static str {
    if topic.ends_with("celsius") {
        "°C"
    } else if topic.ends_with("percent") {
        "%"
    } else {
        ""
    }
}

/// Identity of the zone containing `topic`: its first two segments.
pub fn zone_id(topic: &str) -> Option<&str> {
    leading_segments(topic, 2)
}

/// Identity of the device containing `topic`: its first three segments.
pub fn device_id(topic: &str) -> Option<&str> {
    leading_segments(topic, 3)
}

/// The prefix of `topic` covering its first `count` segments, if the
/// topic has at least that many.
fn leading_segments(topic: &str, count: usize) -> Option<&str> {
    match topic.match_indices('/').nth(count - 1) {
        Some((at, _)) => Some(&topic[..at]),
        None if segments(topic).len() == count => Some(topic),
        None => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn segments_split_on_slash() {
        assert_eq!(
            segments("home/kitchen/oven_1/power"),
            ["home", "kitchen", "oven_1", "power"]
        );
        assert_eq!(segments("home/den/fan_1/enum/values").len(), 5);
    }

    #[test]
    fn control_shape_requires_four_segments_and_prefix() {
        assert!(is_control("home/kitchen/oven_1/power", "home"));
        assert!(!is_control("home/kitchen/oven_1", "home"));
        assert!(!is_control("home/den/fan_1/enum/values", "home"));
        assert!(!is_control("work/kitchen/oven_1/power", "home"));
    }

    #[test]
    fn label_strips_from_first_underscore() {
        assert_eq!(label("home/kitchen/lamp_2/power"), "power");
        assert_eq!(label("home/kitchen/lamp_2"), "lamp");
        assert_eq!(label("x_y_z"), "x");
    }

    #[test]
    fn label_replaces_first_dash_with_space() {
        assert_eq!(label("home/living-room"), "living room");
        // Only the first dash is touched — convention quirk.
        assert_eq!(label("a-b-c"), "a b-c");
        assert_eq!(label("a-b-c_x_y"), "a b-c");
    }

    #[test]
    fn unit_from_suffix() {
        assert_eq!(unit("home/bedroom/hygrothermograph_1/temperature_celsius"), "°C");
        assert_eq!(unit("home/bedroom/hygrothermograph_1/humidity_percent"), "%");
        assert_eq!(unit("home/kitchen/oven_1/power"), "");
    }

    #[test]
    fn zone_and_device_identity_are_topic_prefixes() {
        let topic = "home/kitchen/oven_1/power";
        assert_eq!(zone_id(topic), Some("home/kitchen"));
        assert_eq!(device_id(topic), Some("home/kitchen/oven_1"));
    }

    #[test]
    fn identity_of_exact_length_topics() {
        assert_eq!(zone_id("home/kitchen"), Some("home/kitchen"));
        assert_eq!(device_id("home/kitchen"), None);
        assert_eq!(zone_id("home"), None);
    }
}
