//! Color palette and style constants for the songbook TUI.

use ratatui::style::{Color, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(16, 14, 12);
pub const C_ACCENT: Color = Color::Rgb(230, 150, 60);
pub const C_ERROR: Color = Color::Rgb(255, 90, 80);
pub const C_MUTED: Color = Color::Rgb(92, 84, 70);
pub const C_SECONDARY: Color = Color::Rgb(152, 140, 120);
pub const C_PRIMARY: Color = Color::Rgb(228, 218, 200);
pub const C_SELECTION_BG: Color = Color::Rgb(42, 34, 24);
pub const C_PANEL_BORDER: Color = Color::Rgb(52, 44, 36);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(214, 160, 64); // warm amber, clear focus indicator
pub const C_NUMBER_HINT: Color = Color::Rgb(112, 100, 82); // brighter than border, dimmer than secondary
pub const C_SONG_NUMBER: Color = Color::Rgb(160, 124, 196);
pub const C_FILTER_BG: Color = Color::Rgb(30, 24, 16);
pub const C_FILTER_FG: Color = Color::Rgb(255, 200, 80);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(120, 190, 100);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_NORMAL: Color = Color::Rgb(152, 140, 120);
pub const C_MODE_FILTER: Color = Color::Rgb(255, 200, 80);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}
