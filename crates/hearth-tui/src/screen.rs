//! The dashboard screen: the widget tree rendered as selectable rows.
//!
//! Owns the dashboard engine and the cursor over its flattened control
//! list. Key handling turns into engine interactions; rendering walks the
//! tree zone by zone. A small text-editor overlay handles free-form
//! controls.

use crossterm::event::{KeyCode, KeyEvent};
use hearth_core::{ControlState, ControlWidget, Dashboard, Direction, Error, RangeBounds, topic};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::bridge::CommandTx;
use crate::theme;
use crate::widgets::{control_row, text_fmt};

/// Open text-entry overlay for one free-form control.
struct TextEditor {
    topic: String,
    input: Input,
}

/// Dashboard view state: engine, cursor, scroll, editor overlay.
pub struct DashboardScreen {
    dashboard: Dashboard<CommandTx>,
    /// Cursor into the flattened control list, in tree order.
    selected: usize,
    /// First visible content line.
    scroll: u16,
    editor: Option<TextEditor>,
}

impl DashboardScreen {
    pub fn new(prefix: &str, sink: CommandTx) -> Result<Self, Error> {
        Ok(Self {
            dashboard: Dashboard::new(prefix, sink)?,
            selected: 0,
            scroll: 0,
            editor: None,
        })
    }

    /// Feed one bus update into the engine.
    pub fn apply_update(&mut self, topic: &str, payload: &str) {
        self.dashboard.set(topic, payload);
    }

    /// Whether the text editor overlay is open and capturing keys.
    pub fn editing(&self) -> bool {
        self.editor.is_some()
    }

    /// Key hint for the selected control, for the status bar.
    pub fn status_hint(&self) -> Option<&'static str> {
        self.selected_control()
            .map(|control| control_row::interaction_hint(control.state()))
    }

    /// Count of materialized controls across all zones.
    pub fn control_count(&self) -> usize {
        self.dashboard
            .tree()
            .zones()
            .iter()
            .flat_map(|zone| zone.devices())
            .map(|device| device.controls().len())
            .sum()
    }

    // ── Key handling ─────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.editor.is_some() {
            self.handle_editor_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('h') | KeyCode::Left => self.adjust(Direction::Prev),
            KeyCode::Char('l') | KeyCode::Right => self.adjust(Direction::Next),
            KeyCode::Char(' ') | KeyCode::Enter => self.activate(),
            KeyCode::Char('o') => self.zone_off(),
            KeyCode::Char('g') => self.selected = 0,
            KeyCode::Char('G') => self.selected = self.control_count().saturating_sub(1),
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.editor = None,
            KeyCode::Enter => {
                if let Some(editor) = self.editor.take() {
                    self.dashboard.submit_text(&editor.topic, editor.input.value());
                }
            }
            _ => {
                if let Some(editor) = self.editor.as_mut() {
                    editor.input.handle_event(&crossterm::event::Event::Key(key));
                }
            }
        }
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.control_count() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The control under the cursor, if any control has materialized.
    fn selected_control(&self) -> Option<&ControlWidget> {
        self.dashboard
            .tree()
            .zones()
            .iter()
            .flat_map(|zone| zone.devices())
            .flat_map(|device| device.controls())
            .nth(self.selected)
    }

    /// Left/right on the selected control: step a range, cycle an enum.
    fn adjust(&self, direction: Direction) {
        let Some(control) = self.selected_control() else {
            return;
        };
        match control.state() {
            ControlState::Range { bounds, .. } => {
                let step = step_for(*bounds);
                let delta = match direction {
                    Direction::Next => step,
                    Direction::Prev => -step,
                };
                self.dashboard.step_range(control.topic(), delta);
            }
            ControlState::Enum { .. } => self.dashboard.cycle_enum(control.topic(), direction),
            _ => {}
        }
    }

    /// Space/enter on the selected control: flip a toggle, open the
    /// editor for free text.
    fn activate(&mut self) {
        let Some(control) = self.selected_control() else {
            return;
        };
        let opened = match control.state() {
            ControlState::Toggle { .. } => {
                self.dashboard.toggle(control.topic());
                None
            }
            ControlState::Text { text } => Some(TextEditor {
                topic: control.topic().to_owned(),
                input: Input::from(text.clone()),
            }),
            _ => None,
        };
        if opened.is_some() {
            self.editor = opened;
        }
    }

    /// Switch every toggle in the selected control's zone off.
    fn zone_off(&self) {
        let Some(control) = self.selected_control() else {
            return;
        };
        if let Some(zone_id) = topic::zone_id(control.topic()) {
            self.dashboard.zone_all_off(zone_id);
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if self.dashboard.tree().is_empty() {
            let waiting = Paragraph::new(Line::from(Span::styled(
                "waiting for retained updates…",
                theme::key_hint(),
            )))
            .centered();
            let y_offset = area.height.saturating_sub(1) / 2;
            let centered = Rect {
                x: area.x,
                y: area.y + y_offset,
                width: area.width,
                height: 1.min(area.height),
            };
            frame.render_widget(waiting, centered);
            return;
        }

        let (lines, selected_line) = self.build_lines();
        self.follow_selection(selected_line, area.height);

        let paragraph = Paragraph::new(lines).scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }

    /// Render the text editor overlay centered on the full frame area.
    pub fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let Some(editor) = &self.editor else {
            return;
        };

        let width = 46u16.min(area.width.saturating_sub(4));
        let height = 3u16.min(area.height);
        let x = area.width.saturating_sub(width) / 2;
        let y = area.height.saturating_sub(height) / 2;
        let editor_area = Rect::new(area.x + x, area.y + y, width, height);

        // Clear the background
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            editor_area,
        );

        let title = text_fmt::title_case(&topic::label(&editor.topic));
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::overlay_border());
        let inner = block.inner(editor_area);
        frame.render_widget(block, editor_area);

        let inner_width = usize::from(inner.width.saturating_sub(1));
        let visual_scroll = editor.input.visual_scroll(inner_width);
        let text = Paragraph::new(editor.input.value())
            .style(theme::row_default())
            .scroll((0, u16::try_from(visual_scroll).unwrap_or(0)));
        frame.render_widget(text, inner);

        let cursor_x = editor.input.visual_cursor().saturating_sub(visual_scroll);
        frame.set_cursor_position((
            inner.x + u16::try_from(cursor_x).unwrap_or(0),
            inner.y,
        ));
    }

    /// Flatten the tree into display lines, noting which line holds the
    /// cursor.
    fn build_lines(&self) -> (Vec<Line<'static>>, Option<usize>) {
        let mut lines = Vec::new();
        let mut selected_line = None;
        let mut control_idx = 0;

        for (zone_idx, zone) in self.dashboard.tree().zones().iter().enumerate() {
            if zone_idx > 0 {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                format!(" {}", text_fmt::title_case(zone.title())),
                theme::zone_header(),
            )));

            for device in zone.devices() {
                lines.push(Line::from(Span::styled(
                    format!("   {}", text_fmt::title_case(device.title())),
                    theme::device_header(),
                )));

                for control in device.controls() {
                    let is_selected = control_idx == self.selected;
                    if is_selected {
                        selected_line = Some(lines.len());
                    }
                    lines.push(control_line(control, is_selected));
                    control_idx += 1;
                }
            }
        }

        (lines, selected_line)
    }

    /// Keep the cursor's line inside the viewport.
    fn follow_selection(&mut self, selected_line: Option<usize>, height: u16) {
        let Some(line) = selected_line else {
            return;
        };
        let line = u16::try_from(line).unwrap_or(u16::MAX);
        if line < self.scroll {
            self.scroll = line;
        } else if height > 0 && line >= self.scroll.saturating_add(height) {
            self.scroll = line.saturating_sub(height - 1);
        }
    }
}

/// One row: cursor marker, padded title, per-kind value cell.
fn control_line(control: &ControlWidget, selected: bool) -> Line<'static> {
    let marker = if selected { "   ▸ " } else { "     " };
    let title_style = if selected {
        theme::row_selected()
    } else {
        theme::row_default()
    };

    let mut spans = vec![Span::styled(
        format!("{marker}{:<16}", control.title()),
        title_style,
    )];
    spans.extend(control_row::value_spans(control.state()));

    let line = Line::from(spans);
    if selected {
        line.style(Style::default().bg(theme::BG_HIGHLIGHT))
    } else {
        line
    }
}

/// One percent of the span, at least 1 -- coarse enough to sweep a kelvin
/// slider in a hundred keystrokes.
fn step_for(bounds: RangeBounds) -> i64 {
    ((bounds.max - bounds.min) / 100).max(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn demo_screen() -> (DashboardScreen, mpsc::UnboundedReceiver<(String, String)>) {
        let (tx, rx) = CommandTx::channel();
        let mut screen = DashboardScreen::new("home", tx).unwrap();
        screen.apply_update("home/den/fan_1/speed_enum", "low");
        screen.apply_update("home/den/fan_1/speed_enum/values", "low\nmedium\nhigh");
        screen.apply_update("home/hall/display_1/message", "hi");
        screen.apply_update("home/kitchen/oven_1/power", "off");
        screen.apply_update("home/kitchen/lamp_1/brightness_percent", "80");
        (screen, rx)
    }

    #[test]
    fn selection_walks_controls_in_tree_order() {
        let (mut screen, _rx) = demo_screen();
        assert_eq!(
            screen.selected_control().unwrap().topic(),
            "home/den/fan_1/speed_enum"
        );

        screen.handle_key(key(KeyCode::Char('j')));
        assert_eq!(
            screen.selected_control().unwrap().topic(),
            "home/hall/display_1/message"
        );

        screen.handle_key(key(KeyCode::Char('G')));
        assert_eq!(
            screen.selected_control().unwrap().topic(),
            "home/kitchen/oven_1/power"
        );

        // Pinned at the end.
        screen.handle_key(key(KeyCode::Char('j')));
        assert_eq!(
            screen.selected_control().unwrap().topic(),
            "home/kitchen/oven_1/power"
        );

        screen.handle_key(key(KeyCode::Char('g')));
        assert_eq!(
            screen.selected_control().unwrap().topic(),
            "home/den/fan_1/speed_enum"
        );
    }

    #[test]
    fn space_toggles_the_selected_control() {
        let (mut screen, mut rx) = demo_screen();
        screen.handle_key(key(KeyCode::Char('G')));
        screen.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(
            rx.try_recv().unwrap(),
            ("home/kitchen/oven_1/power".to_owned(), "on".to_owned())
        );
    }

    #[test]
    fn arrow_keys_adjust_the_selected_kind() {
        let (mut screen, mut rx) = demo_screen();

        // Enum under the cursor cycles forward.
        screen.handle_key(key(KeyCode::Right));
        assert_eq!(
            rx.try_recv().unwrap(),
            ("home/den/fan_1/speed_enum".to_owned(), "medium".to_owned())
        );

        // The brightness range steps by one percent.
        screen.handle_key(key(KeyCode::Char('j')));
        screen.handle_key(key(KeyCode::Char('j')));
        assert_eq!(
            screen.selected_control().unwrap().topic(),
            "home/kitchen/lamp_1/brightness_percent"
        );
        screen.handle_key(key(KeyCode::Left));
        assert_eq!(
            rx.try_recv().unwrap(),
            ("home/kitchen/lamp_1/brightness_percent".to_owned(), "79".to_owned())
        );
    }

    #[test]
    fn text_editor_submits_on_enter() {
        let (mut screen, mut rx) = demo_screen();
        screen.handle_key(key(KeyCode::Char('j')));
        screen.handle_key(key(KeyCode::Enter));
        assert!(screen.editing());

        // Keys route into the editor, not the dashboard.
        screen.handle_key(key(KeyCode::Char('!')));
        screen.handle_key(key(KeyCode::Enter));
        assert!(!screen.editing());
        assert_eq!(
            rx.try_recv().unwrap(),
            ("home/hall/display_1/message".to_owned(), "hi!".to_owned())
        );
    }

    #[test]
    fn editor_escape_discards_the_draft() {
        let (mut screen, mut rx) = demo_screen();
        screen.handle_key(key(KeyCode::Char('j')));
        screen.handle_key(key(KeyCode::Enter));
        screen.handle_key(key(KeyCode::Char('!')));
        screen.handle_key(key(KeyCode::Esc));
        assert!(!screen.editing());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn zone_off_targets_the_selected_zone() {
        let (mut screen, mut rx) = demo_screen();
        screen.handle_key(key(KeyCode::Char('G')));
        screen.handle_key(key(KeyCode::Char('o')));
        assert_eq!(
            rx.try_recv().unwrap(),
            ("home/kitchen/oven_1/power".to_owned(), "off".to_owned())
        );
        assert!(rx.try_recv().is_err(), "only toggles in the zone emit");
    }

    #[test]
    fn lines_group_controls_under_their_headers() {
        let (screen, _rx) = demo_screen();
        let (lines, selected_line) = screen.build_lines();
        let texts: Vec<String> = lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect();

        assert_eq!(texts[0], " Den");
        assert_eq!(texts[1], "   Fan");
        assert!(texts[2].contains("speed"));
        assert_eq!(texts[3], "");
        assert_eq!(texts[4], " Hall");
        assert_eq!(selected_line, Some(2));
    }
}
