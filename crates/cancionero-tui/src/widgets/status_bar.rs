//! Status bar — bottom line with input mode, catalog status, and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_ERROR, C_MODE_FILTER, C_MODE_NORMAL, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Filter,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Filter => "FILTER",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Filter => C_MODE_FILTER,
        }
    }
}

/// Draw the footer bar: mode badge, current status message, key hints.
pub fn draw_status_bar(frame: &mut Frame, area: Rect, mode: InputMode, status: &str, error: bool) {
    let status_style = if error {
        Style::default().fg(C_ERROR)
    } else {
        Style::default().fg(C_SECONDARY)
    };

    let keys = match mode {
        InputMode::Normal => {
            "↑↓/jk mover  Enter elegir  / buscar  Tab/1-2 panel  y copiar  r recargar  ? ayuda  q salir"
        }
        InputMode::Filter => "escribe para buscar  ↑↓ mover  Enter fijar  Esc borrar+cerrar",
    };

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default()
                .fg(mode.color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(status.to_string(), status_style),
        Span::raw("   "),
        Span::styled(keys, Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
