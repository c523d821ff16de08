//! Ember palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const EMBER_ORANGE: Color = Color::Rgb(255, 140, 66); // #ff8c42
pub const AMBER: Color = Color::Rgb(224, 175, 104); // #e0af68
pub const SAGE_GREEN: Color = Color::Rgb(152, 195, 121); // #98c379
pub const CLAY_RED: Color = Color::Rgb(224, 108, 117); // #e06c75
pub const WARM_WHITE: Color = Color::Rgb(213, 206, 192); // #d5cec0

// ── Extended Palette ──────────────────────────────────────────────────

pub const ASH_GRAY: Color = Color::Rgb(110, 106, 100); // #6e6a64
pub const SMOKE_GRAY: Color = Color::Rgb(160, 155, 146); // #a09b92
pub const BG_HIGHLIGHT: Color = Color::Rgb(46, 40, 34); // #2e2822
pub const BG_DARK: Color = Color::Rgb(26, 22, 18); // #1a1612
pub const COOL_BLUE: Color = Color::Rgb(125, 174, 211); // #7daed3

// ── Semantic Styles ───────────────────────────────────────────────────

/// Application title in the header bar.
pub fn title_style() -> Style {
    Style::default()
        .fg(EMBER_ORANGE)
        .add_modifier(Modifier::BOLD)
}

/// Zone section header.
pub fn zone_header() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Device sub-header inside a zone.
pub fn device_header() -> Style {
    Style::default().fg(SMOKE_GRAY).add_modifier(Modifier::BOLD)
}

/// Normal control row text.
pub fn row_default() -> Style {
    Style::default().fg(WARM_WHITE)
}

/// Selected / highlighted control row.
pub fn row_selected() -> Style {
    Style::default()
        .fg(EMBER_ORANGE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// A toggle that is currently on.
pub fn value_on() -> Style {
    Style::default().fg(SAGE_GREEN).add_modifier(Modifier::BOLD)
}

/// A toggle that is currently off.
pub fn value_off() -> Style {
    Style::default().fg(ASH_GRAY)
}

/// Read-only sensor reading.
pub fn sensor_value() -> Style {
    Style::default().fg(COOL_BLUE)
}

/// Adjustable value (range position, enum selection, text body).
pub fn value_style() -> Style {
    Style::default().fg(AMBER)
}

/// Bus connection is up.
pub fn status_connected() -> Style {
    Style::default().fg(SAGE_GREEN)
}

/// Bus connection is down.
pub fn status_disconnected() -> Style {
    Style::default().fg(CLAY_RED)
}

/// Bus link retrying after a drop.
pub fn status_reconnecting() -> Style {
    Style::default().fg(AMBER)
}

/// Status bar text.
pub fn status_bar() -> Style {
    Style::default().fg(SMOKE_GRAY)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(ASH_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default()
        .fg(EMBER_ORANGE)
        .add_modifier(Modifier::BOLD)
}

/// Border for overlay windows (help, text editor).
pub fn overlay_border() -> Style {
    Style::default().fg(AMBER)
}
