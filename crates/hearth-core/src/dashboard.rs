//! Update dispatch: the inbound `set` path and outbound interactions.
//!
//! [`Dashboard::set`] is the single entry point for bus traffic. Each call
//! records the value, materializes the widget on first sight, and runs
//! exactly one in-place updater — in that order, unconditionally, so the
//! displayed state always reflects the last write without diffing.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::classify::{ControlKind, classify};
use crate::command::CommandSink;
use crate::error::Error;
use crate::store::ValueStore;
use crate::topic;
use crate::tree::{ControlState, ControlWidget, WidgetTree};

/// Payload a toggle reports when switched on; anything else reads as off.
const TOGGLE_ON: &str = "on";
/// Payload emitted to switch a toggle off.
const TOGGLE_OFF: &str = "off";
/// Suffix of the companion topic carrying an enum's option list.
const VALUES_SUFFIX: &str = "/values";

/// Which way an enum selection moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Live dashboard state for one installation.
///
/// Owns the value store, the per-topic updater cache, and the widget
/// tree. Inbound updates flow through [`set`](Self::set); user
/// interactions go out through the supplied [`CommandSink`] and never
/// touch local state directly.
#[derive(Debug)]
pub struct Dashboard<S> {
    prefix: String,
    store: ValueStore,
    updaters: HashMap<String, ControlKind>,
    tree: WidgetTree,
    sink: S,
}

impl<S: CommandSink> Dashboard<S> {
    /// Create a dashboard scoped to `prefix`, the mandatory first segment
    /// of every topic it will materialize widgets for.
    pub fn new(prefix: impl Into<String>, sink: S) -> Result<Self, Error> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(Error::EmptyPrefix);
        }
        Ok(Self {
            prefix,
            store: ValueStore::new(),
            updaters: HashMap::new(),
            tree: WidgetTree::new(),
            sink,
        })
    }

    /// The namespace prefix this dashboard materializes widgets under.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The live widget tree, for rendering.
    #[must_use]
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// The raw topic → value map behind the tree.
    #[must_use]
    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    // ── Inbound path ─────────────────────────────────────────────────────

    /// Apply one bus update. Call once per message, in arrival order.
    ///
    /// Never fails. Malformed topics are recorded in the store and nothing
    /// more; well-formed first sightings materialize their widget; either
    /// way the call ends with one updater pass, a silent no-op when no
    /// widget exists for the topic.
    pub fn set(&mut self, topic: &str, value: &str) {
        let first_sight = self.store.insert(topic, value);
        let kind = self.updater(topic);

        if first_sight
            && topic::is_control(topic, &self.prefix)
            && kind != ControlKind::EnumValues
        {
            self.materialize(topic, kind);
        }

        self.apply(kind, topic, value);
        trace!(topic, value, %kind, first_sight, "applied update");
    }

    /// Cached updater kind for `topic`, resolving on first use.
    ///
    /// A topic's kind never changes after first sighting: if a bus ever
    /// sends conflicting shapes for one topic, later updates are read
    /// under the original classification.
    fn updater(&mut self, topic: &str) -> ControlKind {
        if let Some(&kind) = self.updaters.get(topic) {
            return kind;
        }
        let kind = classify(topic);
        self.updaters.insert(topic.to_owned(), kind);
        kind
    }

    /// Build the widget for a first-seen control topic, creating its zone
    /// and device containers as needed, all at sorted positions.
    fn materialize(&mut self, topic: &str, kind: ControlKind) {
        let (Some(zone_id), Some(device_id)) = (topic::zone_id(topic), topic::device_id(topic))
        else {
            return;
        };
        let state = self.initial_state(kind, topic);
        self.tree
            .ensure_zone(zone_id)
            .ensure_device(device_id)
            .insert_control(ControlWidget::new(topic, state));
        debug!(topic, %kind, "materialized control");
    }

    /// Initial display state for a fresh widget, bound to the store's
    /// current values — including an option list that arrived before its
    /// enum did.
    fn initial_state(&self, kind: ControlKind, topic: &str) -> ControlState {
        let value = self.store.get_or(topic, "");
        match kind {
            ControlKind::Toggle => ControlState::Toggle { on: value == TOGGLE_ON },
            ControlKind::Range(bounds) => ControlState::Range { value: bounds.parse(value), bounds },
            ControlKind::Enum => {
                let values_topic = format!("{topic}{VALUES_SUFFIX}");
                let mut options = split_options(self.store.get_or(&values_topic, ""));
                ensure_option(&mut options, value);
                ControlState::Enum { selected: value.to_owned(), options }
            }
            ControlKind::Sensor => ControlState::Sensor {
                reading: value.to_owned(),
                unit: topic::unit(topic),
            },
            // EnumValues is filtered out before materialization.
            ControlKind::Text | ControlKind::EnumValues => {
                ControlState::Text { text: value.to_owned() }
            }
        }
    }

    /// Route a stored update through its kind's in-place updater.
    ///
    /// Updaters that find no widget do nothing: malformed topics, foreign
    /// prefixes, and option lists whose enum has not materialized yet all
    /// land here harmlessly.
    fn apply(&mut self, kind: ControlKind, topic: &str, value: &str) {
        match kind {
            ControlKind::Toggle => {
                if let Some(ControlState::Toggle { on }) = self.state_mut(topic) {
                    *on = value == TOGGLE_ON;
                }
            }
            ControlKind::Range(bounds) => {
                if let Some(ControlState::Range { value: shown, .. }) = self.state_mut(topic) {
                    *shown = bounds.parse(value);
                }
            }
            ControlKind::Enum => {
                if let Some(ControlState::Enum { selected, options }) = self.state_mut(topic) {
                    *selected = value.to_owned();
                    ensure_option(options, value);
                }
            }
            ControlKind::EnumValues => {
                let Some(parent) = topic.strip_suffix(VALUES_SUFFIX) else {
                    return;
                };
                if let Some(ControlState::Enum { selected, options }) = self.state_mut(parent) {
                    *options = split_options(value);
                    let current = selected.clone();
                    ensure_option(options, &current);
                }
            }
            ControlKind::Sensor => {
                if let Some(ControlState::Sensor { reading, .. }) = self.state_mut(topic) {
                    *reading = value.to_owned();
                }
            }
            ControlKind::Text => {
                if let Some(ControlState::Text { text }) = self.state_mut(topic) {
                    *text = value.to_owned();
                }
            }
        }
    }

    fn state(&self, topic: &str) -> Option<&ControlState> {
        self.tree.control(topic).map(ControlWidget::state)
    }

    fn state_mut(&mut self, topic: &str) -> Option<&mut ControlState> {
        self.tree.control_mut(topic).map(ControlWidget::state_mut)
    }

    // ── Outbound path ────────────────────────────────────────────────────
    //
    // Interaction handlers compute the would-be value from displayed state
    // and emit it. The store and tree change only when the bus echoes the
    // update back through `set`.

    /// Flip a toggle control: emits the opposite of its displayed state.
    pub fn toggle(&self, topic: &str) {
        if let Some(ControlState::Toggle { on }) = self.state(topic) {
            let next = if *on { TOGGLE_OFF } else { TOGGLE_ON };
            self.sink.send(topic, next);
        }
    }

    /// Step a range control by `delta`, clamped to its bounds. Emits only
    /// when the value actually moves.
    pub fn step_range(&self, topic: &str, delta: i64) {
        if let Some(ControlState::Range { value, bounds }) = self.state(topic) {
            let next = bounds.clamp(value.saturating_add(delta));
            if next != *value {
                self.sink.send(topic, &next.to_string());
            }
        }
    }

    /// Move an enum selection one step through its options.
    ///
    /// Pins at the list ends rather than wrapping, like a native selector,
    /// and emits only when the selection actually moves.
    pub fn cycle_enum(&self, topic: &str, direction: Direction) {
        if let Some(ControlState::Enum { selected, options }) = self.state(topic) {
            let Some(at) = options.iter().position(|option| option == selected) else {
                return;
            };
            let next = match direction {
                Direction::Next => (at + 1).min(options.len().saturating_sub(1)),
                Direction::Prev => at.saturating_sub(1),
            };
            let Some(option) = options.get(next) else {
                return;
            };
            if next != at {
                self.sink.send(topic, option);
            }
        }
    }

    /// Submit a replacement value for a text control.
    pub fn submit_text(&self, topic: &str, text: &str) {
        if matches!(self.state(topic), Some(ControlState::Text { .. })) {
            self.sink.send(topic, text);
        }
    }

    /// Switch every toggle control in `zone_id` off, one command per
    /// toggle.
    pub fn zone_all_off(&self, zone_id: &str) {
        let Some(zone) = self.tree.zones().iter().find(|zone| zone.id() == zone_id) else {
            return;
        };
        for device in zone.devices() {
            for control in device.controls() {
                if matches!(control.state(), ControlState::Toggle { .. }) {
                    self.sink.send(control.topic(), TOGGLE_OFF);
                }
            }
        }
    }

    // ── Snapshot ─────────────────────────────────────────────────────────

    /// JSON tree of the materialized home, keyed by raw last segments:
    /// `{zone: {device: {control: state…}}}`.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let mut zones = Map::new();
        for zone in self.tree.zones() {
            let mut devices = Map::new();
            for device in zone.devices() {
                let mut controls = Map::new();
                for control in device.controls() {
                    if let Ok(state) = serde_json::to_value(control.state()) {
                        controls.insert(topic::last_segment(control.topic()).to_owned(), state);
                    }
                }
                devices.insert(topic::last_segment(device.id()).to_owned(), Value::Object(controls));
            }
            zones.insert(topic::last_segment(zone.id()).to_owned(), Value::Object(devices));
        }
        Value::Object(zones)
    }
}

// ── Option-list helpers ──────────────────────────────────────────────────

/// Split a newline-delimited option payload, dropping blank lines.
fn split_options(payload: &str) -> Vec<String> {
    payload
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Append `value` if the list lacks it, so the current selection always
/// has a visible row. Blank selections are not injected.
fn ensure_option(options: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !options.iter().any(|option| option == value) {
        options.push(value.to_owned());
    }
}
