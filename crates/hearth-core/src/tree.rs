//! Retained widget tree mirroring the dashboard's control topics.
//!
//! Three fixed levels — zone sections, device sections, control widgets —
//! each identified by its topic-prefix string. Containers appear on demand
//! when their first control materializes, always at the sorted position
//! among siblings, and are never removed or reordered afterward.

use serde::Serialize;

use crate::classify::RangeBounds;
use crate::topic;

// ── Per-kind display state ───────────────────────────────────────────────

/// Mutable display state of a materialized control.
///
/// Updaters rewrite these fields in place; the containing widget is never
/// rebuilt or replaced after materialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ControlState {
    Toggle {
        #[serde(rename = "value")]
        on: bool,
    },
    Range {
        value: i64,
        #[serde(flatten)]
        bounds: RangeBounds,
    },
    Enum {
        #[serde(rename = "value")]
        selected: String,
        #[serde(rename = "values")]
        options: Vec<String>,
    },
    Sensor {
        #[serde(rename = "value")]
        reading: String,
        unit: &'static str,
    },
    Text {
        #[serde(rename = "value")]
        text: String,
    },
}

// ── Widgets ──────────────────────────────────────────────────────────────

/// A leaf control row: identity, display title, and live state.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlWidget {
    topic: String,
    title: String,
    state: ControlState,
}

impl ControlWidget {
    pub(crate) fn new(topic: impl Into<String>, state: ControlState) -> Self {
        let topic = topic.into();
        let title = topic::label(&topic);
        Self { topic, title, state }
    }

    /// Full four-segment topic — the widget's identity.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Human-facing name derived from the last topic segment.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut ControlState {
        &mut self.state
    }
}

/// Container for one device's controls.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSection {
    id: String,
    title: String,
    controls: Vec<ControlWidget>,
}

impl DeviceSection {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: topic::label(id),
            controls: Vec::new(),
        }
    }

    /// Device identity: the first three topic segments.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn controls(&self) -> &[ControlWidget] {
        &self.controls
    }

    /// Insert a control at its sorted position among siblings.
    pub(crate) fn insert_control(&mut self, widget: ControlWidget) {
        let at = insertion_point(self.controls.iter().map(ControlWidget::topic), widget.topic());
        self.controls.insert(at, widget);
    }
}

/// Container for one zone's devices.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSection {
    id: String,
    title: String,
    devices: Vec<DeviceSection>,
}

impl ZoneSection {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: topic::label(id),
            devices: Vec::new(),
        }
    }

    /// Zone identity: the first two topic segments.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn devices(&self) -> &[DeviceSection] {
        &self.devices
    }

    /// Find or create the device container with `id`, keeping siblings
    /// sorted by id.
    pub(crate) fn ensure_device(&mut self, id: &str) -> &mut DeviceSection {
        match self.devices.iter().position(|device| device.id == id) {
            Some(at) => &mut self.devices[at],
            None => {
                let at = insertion_point(self.devices.iter().map(DeviceSection::id), id);
                self.devices.insert(at, DeviceSection::new(id));
                &mut self.devices[at]
            }
        }
    }
}

// ── The tree ─────────────────────────────────────────────────────────────

/// Root of the retained view: zone sections in ascending id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetTree {
    zones: Vec<ZoneSection>,
}

impl WidgetTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn zones(&self) -> &[ZoneSection] {
        &self.zones
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Find or create the zone container with `id`, keeping siblings
    /// sorted by id.
    pub(crate) fn ensure_zone(&mut self, id: &str) -> &mut ZoneSection {
        match self.zones.iter().position(|zone| zone.id == id) {
            Some(at) => &mut self.zones[at],
            None => {
                let at = insertion_point(self.zones.iter().map(ZoneSection::id), id);
                self.zones.insert(at, ZoneSection::new(id));
                &mut self.zones[at]
            }
        }
    }

    /// The control widget for `topic`, if it has materialized.
    ///
    /// Navigates via the zone and device ids derived from the topic, so a
    /// malformed topic simply resolves to `None`.
    #[must_use]
    pub fn control(&self, topic: &str) -> Option<&ControlWidget> {
        let zone_id = topic::zone_id(topic)?;
        let device_id = topic::device_id(topic)?;
        let zone = self.zones.iter().find(|zone| zone.id == zone_id)?;
        let device = zone.devices.iter().find(|device| device.id == device_id)?;
        device.controls.iter().find(|control| control.topic == topic)
    }

    pub(crate) fn control_mut(&mut self, topic: &str) -> Option<&mut ControlWidget> {
        let zone_id = topic::zone_id(topic)?;
        let device_id = topic::device_id(topic)?;
        let zone = self.zones.iter_mut().find(|zone| zone.id == zone_id)?;
        let device = zone.devices.iter_mut().find(|device| device.id == device_id)?;
        device.controls.iter_mut().find(|control| control.topic == topic)
    }
}

/// Index before the first id comparing greater than `id`, else the count.
///
/// Linear and stable: equal ids never occur (callers check presence
/// first), and sibling lists are small enough that a scan beats the
/// bookkeeping of anything cleverer.
fn insertion_point<'a>(ids: impl Iterator<Item = &'a str>, id: &str) -> usize {
    let mut at = 0;
    for existing in ids {
        if existing > id {
            return at;
        }
        at += 1;
    }
    at
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn toggle(topic: &str) -> ControlWidget {
        ControlWidget::new(topic, ControlState::Toggle { on: false })
    }

    #[test]
    fn zones_insert_in_ascending_id_order() {
        let mut tree = WidgetTree::new();
        tree.ensure_zone("home/kitchen");
        tree.ensure_zone("home/attic");
        tree.ensure_zone("home/den");
        let ids: Vec<&str> = tree.zones().iter().map(ZoneSection::id).collect();
        assert_eq!(ids, ["home/attic", "home/den", "home/kitchen"]);
    }

    #[test]
    fn ensure_zone_is_idempotent() {
        let mut tree = WidgetTree::new();
        tree.ensure_zone("home/den");
        tree.ensure_zone("home/den");
        assert_eq!(tree.zones().len(), 1);
    }

    #[test]
    fn controls_insert_sorted_within_their_device() {
        let mut tree = WidgetTree::new();
        let device = tree.ensure_zone("home/kitchen").ensure_device("home/kitchen/lamp_1");
        device.insert_control(toggle("home/kitchen/lamp_1/power"));
        device.insert_control(toggle("home/kitchen/lamp_1/brightness_percent"));
        device.insert_control(toggle("home/kitchen/lamp_1/hue_degrees"));
        let topics: Vec<&str> = device.controls().iter().map(ControlWidget::topic).collect();
        assert_eq!(
            topics,
            [
                "home/kitchen/lamp_1/brightness_percent",
                "home/kitchen/lamp_1/hue_degrees",
                "home/kitchen/lamp_1/power",
            ]
        );
    }

    #[test]
    fn lookup_navigates_by_derived_identity() {
        let mut tree = WidgetTree::new();
        tree.ensure_zone("home/kitchen")
            .ensure_device("home/kitchen/oven_1")
            .insert_control(toggle("home/kitchen/oven_1/power"));

        let control = tree.control("home/kitchen/oven_1/power").unwrap();
        assert_eq!(control.title(), "power");
        assert!(tree.control("home/kitchen/oven_1/door").is_none());
        assert!(tree.control("nonsense").is_none());
    }

    #[test]
    fn titles_come_from_the_naming_convention() {
        let mut tree = WidgetTree::new();
        let zone = tree.ensure_zone("home/living-room");
        assert_eq!(zone.title(), "living room");
        let device = zone.ensure_device("home/living-room/lamp_2");
        assert_eq!(device.title(), "lamp");
    }
}
