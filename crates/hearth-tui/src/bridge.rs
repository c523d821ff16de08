//! Bus bridge — connects bus traffic (or a demo script) to TUI actions.
//!
//! Runs as a background task: forwards every inbound update and
//! link-state transition as an [`Action`] through the TUI's action
//! channel, and pumps outbound commands from the dashboard engine to the
//! bus. In demo mode a scripted home stands in for the bus, echoing
//! commands back the way a retained bus would.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use hearth_bus::{BusClient, BusConfig, BusEvent};
use hearth_core::CommandSink;

use crate::action::Action;

// ── Outbound command channel ─────────────────────────────────────────────

/// Command sink handed to the dashboard engine.
///
/// Interactions queue topic/value pairs here; the bridge forwards them to
/// the bus. Local state never changes on send — only the echo does that.
#[derive(Debug, Clone)]
pub struct CommandTx(mpsc::UnboundedSender<(String, String)>);

impl CommandTx {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<(String, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

impl CommandSink for CommandTx {
    fn send(&self, topic: &str, value: &str) {
        // Ignore send errors -- just means the bridge is gone.
        let _ = self.0.send((topic.to_owned(), value.to_owned()));
    }
}

// ── Traffic source ───────────────────────────────────────────────────────

/// Where dashboard traffic comes from.
pub enum BusMode {
    /// A live WebSocket bus.
    Live(BusConfig),
    /// Scripted in-process traffic under `prefix`, no bus required.
    Demo { prefix: String },
}

/// Pump traffic between the chosen source and the action channel until
/// cancelled.
pub async fn run_bridge(
    mode: BusMode,
    action_tx: mpsc::UnboundedSender<Action>,
    command_rx: mpsc::UnboundedReceiver<(String, String)>,
    cancel: CancellationToken,
) {
    match mode {
        BusMode::Live(config) => run_live(config, action_tx, command_rx, cancel).await,
        BusMode::Demo { prefix } => run_demo(&prefix, action_tx, command_rx, cancel).await,
    }
    debug!("bus bridge shut down");
}

// ── Live bus ─────────────────────────────────────────────────────────────

async fn run_live(
    config: BusConfig,
    action_tx: mpsc::UnboundedSender<Action>,
    mut command_rx: mpsc::UnboundedReceiver<(String, String)>,
    cancel: CancellationToken,
) {
    let (client, mut events) = BusClient::connect(config, cancel.clone());
    let publisher = client.publisher();

    let mut commands_open = true;
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            event = events.recv() => {
                match event {
                    Some(BusEvent::Connected) => {
                        let _ = action_tx.send(Action::Connected);
                    }
                    Some(BusEvent::Disconnected) => {
                        let _ = action_tx.send(Action::Disconnected);
                    }
                    Some(BusEvent::Message(message)) => {
                        let _ = action_tx.send(Action::BusUpdate {
                            topic: message.topic,
                            payload: message.payload,
                        });
                    }
                    // Client hit its retry limit and gave up.
                    None => break,
                }
            }

            command = command_rx.recv(), if commands_open => {
                match command {
                    Some((topic, payload)) => publisher.publish(&topic, &payload),
                    None => commands_open = false,
                }
            }
        }
    }

    client.shutdown();
}

// ── Demo script ──────────────────────────────────────────────────────────

/// Retained values of the demo home, as topic suffixes under the prefix.
const DEMO_HOME: &[(&str, &str)] = &[
    ("bedroom/hygrothermograph_1/humidity_percent", "47"),
    ("bedroom/hygrothermograph_1/temperature_celsius", "19.5"),
    ("bedroom/lamp_2/hue_degrees", "120"),
    ("bedroom/lamp_2/power", "off"),
    ("hall/display_1/message", "welcome home"),
    ("kitchen/coffee-maker_1/power", "off"),
    ("kitchen/coffee-maker_1/strength_enum", "mild"),
    ("kitchen/coffee-maker_1/strength_enum/values", "mild\nmedium\nstrong"),
    ("kitchen/oven_1/power", "off"),
    ("living-room/lamp_1/brightness_percent", "80"),
    ("living-room/lamp_1/power", "on"),
    ("living-room/lamp_1/temperature_kelvin", "2700"),
    ("living-room/media-player_1/input_enum", "aux"),
    ("living-room/media-player_1/input_enum/values", "aux\nbluetooth\nradio"),
    ("living-room/media-player_1/power", "on"),
    ("living-room/media-player_1/volume_percent", "35"),
];

/// Interval between scripted sensor readings.
const DRIFT_PERIOD: Duration = Duration::from_secs(5);

fn demo_seed(prefix: &str) -> Vec<(String, String)> {
    DEMO_HOME
        .iter()
        .map(|&(suffix, value)| (format!("{prefix}/{suffix}"), value.to_owned()))
        .collect()
}

/// Scripted bedroom readings: a slow sine wander around the seed values.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::as_conversions
)]
fn sensor_drift(tick: u64) -> (String, String) {
    let phase = tick as f64;
    let temperature = 19.5 + 1.5 * (phase * 0.7).sin();
    let humidity = (47.0 + 4.0 * (phase * 0.45).sin()).round() as i64;
    (format!("{temperature:.1}"), humidity.to_string())
}

async fn run_demo(
    prefix: &str,
    action_tx: mpsc::UnboundedSender<Action>,
    mut command_rx: mpsc::UnboundedReceiver<(String, String)>,
    cancel: CancellationToken,
) {
    let _ = action_tx.send(Action::Connected);
    for (topic, payload) in demo_seed(prefix) {
        let _ = action_tx.send(Action::BusUpdate { topic, payload });
    }

    let mut drift = tokio::time::interval(DRIFT_PERIOD);
    drift.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut tick: u64 = 0;
    let mut commands_open = true;
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            _ = drift.tick() => {
                let (temperature, humidity) = sensor_drift(tick);
                tick += 1;
                let _ = action_tx.send(Action::BusUpdate {
                    topic: format!("{prefix}/bedroom/hygrothermograph_1/temperature_celsius"),
                    payload: temperature,
                });
                let _ = action_tx.send(Action::BusUpdate {
                    topic: format!("{prefix}/bedroom/hygrothermograph_1/humidity_percent"),
                    payload: humidity,
                });
            }

            command = command_rx.recv(), if commands_open => {
                match command {
                    // A retained bus accepts the command and echoes it back.
                    Some((topic, payload)) => {
                        let _ = action_tx.send(Action::BusUpdate { topic, payload });
                    }
                    None => commands_open = false,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hearth_core::{ControlState, Dashboard};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn demo_seed_materializes_every_control_kind() {
        let sink = |_: &str, _: &str| {};
        let mut dash = Dashboard::new("home", sink).unwrap();
        for (topic, payload) in demo_seed("home") {
            dash.set(&topic, &payload);
        }

        let zones: Vec<&str> = dash.tree().zones().iter().map(|zone| zone.id()).collect();
        assert_eq!(
            zones,
            ["home/bedroom", "home/hall", "home/kitchen", "home/living-room"]
        );

        let states: Vec<&ControlState> = dash
            .tree()
            .zones()
            .iter()
            .flat_map(|zone| zone.devices())
            .flat_map(|device| device.controls())
            .map(|control| control.state())
            .collect();
        assert!(states.iter().any(|s| matches!(s, ControlState::Toggle { .. })));
        assert!(states.iter().any(|s| matches!(s, ControlState::Range { .. })));
        assert!(states.iter().any(|s| matches!(s, ControlState::Enum { .. })));
        assert!(states.iter().any(|s| matches!(s, ControlState::Sensor { .. })));
        assert!(states.iter().any(|s| matches!(s, ControlState::Text { .. })));
    }

    #[test]
    fn demo_enum_lists_arrive_with_their_options() {
        let sink = |_: &str, _: &str| {};
        let mut dash = Dashboard::new("home", sink).unwrap();
        for (topic, payload) in demo_seed("home") {
            dash.set(&topic, &payload);
        }

        let Some(ControlState::Enum { selected, options }) = dash
            .tree()
            .control("home/kitchen/coffee-maker_1/strength_enum")
            .map(|control| control.state())
        else {
            panic!("coffee strength enum should have materialized");
        };
        assert_eq!(selected, "mild");
        assert_eq!(
            options,
            &["mild".to_owned(), "medium".to_owned(), "strong".to_owned()]
        );
    }

    #[test]
    fn sensor_drift_starts_at_the_seeded_readings() {
        let (temperature, humidity) = sensor_drift(0);
        assert_eq!(temperature, "19.5");
        assert_eq!(humidity, "47");
    }
}
