//! Per-kind value rendering for a single control row.

use hearth_core::ControlState;
use ratatui::text::Span;

use crate::theme;
use crate::widgets::text_fmt;

/// Character width of a range control's level bar.
const BAR_WIDTH: u16 = 10;

/// Build the value cell of a control row as styled spans.
///
/// Each control kind has a fixed visual: toggles show a dot and state,
/// ranges a level bar plus the number, enums the selection between cycle
/// affordances, sensors the reading with its unit, text the raw string.
pub fn value_spans(state: &ControlState) -> Vec<Span<'static>> {
    match state {
        ControlState::Toggle { on: true } => vec![Span::styled("● on", theme::value_on())],
        ControlState::Toggle { on: false } => vec![Span::styled("○ off", theme::value_off())],
        ControlState::Range { value, bounds } => {
            let (filled, empty) =
                text_fmt::fmt_level_bar(*value, bounds.min, bounds.max, BAR_WIDTH);
            vec![
                Span::styled(filled, theme::value_style()),
                Span::styled(empty, theme::key_hint()),
                Span::styled(format!(" {value}"), theme::value_style()),
            ]
        }
        ControlState::Enum { selected, options } => {
            // Cycle affordances dim out when the selection pins at an end.
            let at = options.iter().position(|option| option == selected);
            let can_prev = at.is_some_and(|at| at > 0);
            let can_next = at.is_some_and(|at| at + 1 < options.len());
            vec![
                Span::styled("‹ ", arrow_style(can_prev)),
                Span::styled(selected.clone(), theme::value_style()),
                Span::styled(" ›", arrow_style(can_next)),
            ]
        }
        ControlState::Sensor { reading, unit } => {
            let shown = if unit.is_empty() {
                reading.clone()
            } else {
                format!("{reading} {unit}")
            };
            vec![Span::styled(shown, theme::sensor_value())]
        }
        ControlState::Text { text } => vec![Span::styled(text.clone(), theme::value_style())],
    }
}

/// Key hint for the selected control, shown in the status bar.
pub fn interaction_hint(state: &ControlState) -> &'static str {
    match state {
        ControlState::Toggle { .. } => "space toggle",
        ControlState::Range { .. } => "←/→ adjust",
        ControlState::Enum { .. } => "←/→ cycle",
        ControlState::Sensor { .. } => "read-only",
        ControlState::Text { .. } => "enter edit",
    }
}

fn arrow_style(active: bool) -> ratatui::style::Style {
    if active {
        theme::key_hint_key()
    } else {
        theme::key_hint()
    }
}
