//! Application core — event loop, action dispatch, chrome rendering.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::action::Action;
use crate::bridge::{self, BusMode, CommandTx};
use crate::event::{Event, EventReader};
use crate::screen::DashboardScreen;
use crate::theme;
use crate::tui::Tui;

/// Connection status as seen by the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// First connection attempt still in flight.
    #[default]
    Connecting,
    Connected,
    /// The first attempt failed before ever connecting.
    Disconnected,
    /// The link dropped; the bus client is backing off and retrying.
    Reconnecting,
}

/// Top-level application state and event loop.
pub struct App {
    screen: DashboardScreen,
    /// Namespace shown in the header.
    prefix: String,
    /// Scripted traffic instead of a live bus.
    demo: bool,
    running: bool,
    connection_status: ConnectionStatus,
    help_visible: bool,
    /// Action sender — the bridge dispatches bus traffic through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Shuts the bridge (and its bus client) down on exit.
    cancel: CancellationToken,
}

impl App {
    /// Create the app and spawn its bus bridge in the background.
    pub fn new(prefix: &str, mode: BusMode) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = CommandTx::channel();
        let screen = DashboardScreen::new(prefix, command_tx)?;
        let cancel = CancellationToken::new();
        let demo = matches!(mode, BusMode::Demo { .. });

        let bridge_tx = action_tx.clone();
        let bridge_cancel = cancel.clone();
        tokio::spawn(async move {
            bridge::run_bridge(mode, bridge_tx, command_rx, bridge_cancel).await;
        });

        Ok(Self {
            screen,
            prefix: prefix.to_owned(),
            demo,
            running: true,
            connection_status: ConnectionStatus::default(),
            help_visible: false,
            action_tx,
            action_rx,
            cancel,
        })
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions — bus updates queue
            // here between terminal events.
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action);

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else goes to the dashboard screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        // An open text editor captures every key.
        if self.screen.editing() {
            self.screen.handle_key(key);
            return None;
        }

        if self.help_visible {
            // In help mode, Esc or ? closes help
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            };
        }

        // Global keybindings
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Some(Action::ToggleHelp),
            _ => {}
        }

        self.screen.handle_key(key);
        None
    }

    /// Process a single action — update app state and the screen.
    fn process_action(&mut self, action: &Action) {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                // ratatui reflows on the next draw; nothing to retain
                debug!(width = w, height = h, "terminal resized");
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::BusUpdate { topic, payload } => {
                self.screen.apply_update(topic, payload);
            }

            Action::Connected => {
                self.connection_status = ConnectionStatus::Connected;
            }

            Action::Disconnected => {
                self.connection_status = match self.connection_status {
                    ConnectionStatus::Connecting => ConnectionStatus::Disconnected,
                    _ => ConnectionStatus::Reconnecting,
                };
            }

            // Render is handled in the main loop, not here
            Action::Render | Action::Tick => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [header bar] [dashboard content] [status bar]
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_header(frame, layout[0]);
        self.screen.render(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays on top (at most one is ever active)
        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
        self.screen.render_editor(frame, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" hearth", theme::title_style()),
            Span::styled(format!("  {}", self.prefix), theme::status_bar()),
        ];
        if self.demo {
            spans.push(Span::styled("  demo", theme::status_reconnecting()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the bottom status bar with connection status and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let connection_indicator = match self.connection_status {
            ConnectionStatus::Connected => Span::styled("● connected", theme::status_connected()),
            ConnectionStatus::Connecting => Span::styled("◐ connecting", theme::status_bar()),
            ConnectionStatus::Reconnecting => {
                Span::styled("◐ reconnecting", theme::status_reconnecting())
            }
            ConnectionStatus::Disconnected => {
                Span::styled("○ disconnected", theme::status_disconnected())
            }
        };

        let mut spans = vec![Span::raw(" "), connection_indicator];
        if let Some(hint) = self.screen.status_hint() {
            spans.push(Span::styled(" │ ", theme::key_hint()));
            spans.push(Span::styled(hint, theme::status_bar()));
        }
        // Hide the global hints when the terminal gets too narrow
        if area.width >= 50 {
            spans.push(Span::styled(" │ ? help  q quit", theme::key_hint()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_width = 48u16.min(area.width.saturating_sub(4));
        let help_height = 20u16.min(area.height.saturating_sub(4));

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        // Clear the background
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::overlay_border());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = Style::default().fg(theme::AMBER);
        let help_text = vec![
            Line::from(""),
            Line::from(Span::styled("  Navigation", section)),
            Line::from(Span::styled("  ──────────", theme::key_hint())),
            Line::from(vec![
                Span::styled("  j/k ↑/↓   ", theme::key_hint_key()),
                Span::styled("Select control", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  g/G       ", theme::key_hint_key()),
                Span::styled("First / last control", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled("  Controls", section)),
            Line::from(Span::styled("  ────────", theme::key_hint())),
            Line::from(vec![
                Span::styled("  Space     ", theme::key_hint_key()),
                Span::styled("Toggle on/off", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Enter     ", theme::key_hint_key()),
                Span::styled("Toggle / edit text", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  h/l ←/→   ", theme::key_hint_key()),
                Span::styled("Adjust range / cycle enum", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  o         ", theme::key_hint_key()),
                Span::styled("All off in selected zone", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled("  Global", section)),
            Line::from(Span::styled("  ──────", theme::key_hint())),
            Line::from(vec![
                Span::styled("  ?         ", theme::key_hint_key()),
                Span::styled("This help", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  q         ", theme::key_hint_key()),
                Span::styled("Quit", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "                      Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}
