//! FilterInput — wraps tui-input for use as the search bar in the song list.

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};
use unicode_width::UnicodeWidthChar;

use crate::theme::{C_FILTER_BG, C_FILTER_FG, C_MUTED};

pub enum FilterAction {
    Changed(String),
    Confirmed,
    Cancelled,
    None,
}

pub struct FilterInput {
    input: Input,
    pub active: bool,
    placeholder: String,
}

impl FilterInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            active: false,
            placeholder: placeholder.into(),
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Handle a key event. Returns what happened.
    ///
    /// Esc behaviour:
    ///   - If the input has text: clear the text, emit `Changed("")` (keeps filter open but empty)
    ///   - If the input is already empty: deactivate and emit `Cancelled`
    pub fn handle_key(&mut self, key: KeyEvent) -> FilterAction {
        match key.code {
            KeyCode::Esc => {
                if !self.input.value().is_empty() {
                    // First Esc: just clear the text
                    self.input = tui_input::Input::default();
                    FilterAction::Changed(String::new())
                } else {
                    // Second Esc (already empty): close filter
                    self.deactivate();
                    FilterAction::Cancelled
                }
            }
            KeyCode::Enter => {
                self.deactivate();
                FilterAction::Confirmed
            }
            _ => {
                self.input
                    .handle_event(&ratatui::crossterm::event::Event::Key(key));
                FilterAction::Changed(self.input.value().to_string())
            }
        }
    }

    /// Render the filter input bar into `area`.
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let scroll = self
            .input
            .visual_scroll(area.width.saturating_sub(4) as usize);
        let value = self.input.value();
        let display = if value.is_empty() {
            Span::styled(
                format!("/ {}", self.placeholder),
                Style::default().fg(C_MUTED),
            )
        } else {
            // visual_scroll counts display columns, not bytes
            let start = byte_at_col(value, scroll);
            Span::styled(
                format!("/ {}", &value[start..]),
                Style::default().fg(C_FILTER_FG),
            )
        };

        let paragraph =
            Paragraph::new(Line::from(vec![display])).style(Style::default().bg(C_FILTER_BG));
        frame.render_widget(paragraph, area);

        // Show cursor when active
        if self.active && !value.is_empty() {
            let cursor_x = area.x + 2 + (self.input.visual_cursor() - scroll) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

impl Default for FilterInput {
    fn default() -> Self {
        Self::new("buscar...")
    }
}

/// Byte index of the first char at or past `col` display columns.  A column
/// offset cannot slice the string directly: accented chars are multi-byte
/// but one column wide.
fn byte_at_col(s: &str, col: usize) -> usize {
    let mut width = 0;
    for (idx, ch) in s.char_indices() {
        if width >= col {
            return idx;
        }
        width += ch.width().unwrap_or(0);
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_at_col_stays_on_char_boundaries() {
        let q = "señor ten piedad de nosotros";
        // column 3 falls past the two-byte ñ
        let start = byte_at_col(q, 3);
        assert!(q.is_char_boundary(start));
        assert_eq!(&q[start..], "or ten piedad de nosotros");
    }

    #[test]
    fn test_byte_at_col_counts_columns_not_bytes() {
        // ú is two bytes; skipping 5 columns must drop 5 chars
        let q = "tú has venido a la orilla sin";
        assert_eq!(&q[byte_at_col(q, 5)..], "s venido a la orilla sin");
    }

    #[test]
    fn test_byte_at_col_any_offset_is_sliceable() {
        let q = "señor, dueño de mí";
        for col in 0..=q.chars().count() + 2 {
            assert!(q.is_char_boundary(byte_at_col(q, col)));
        }
        assert_eq!(byte_at_col(q, 0), 0);
        assert_eq!(byte_at_col(q, 99), q.len());
    }
}
