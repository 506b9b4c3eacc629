//! HelpOverlay component — centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
};

/// Visibility lives in the App; this component only renders the cheatsheet
/// and reports close requests.
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn new() -> Self {
        Self
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        match key.code {
            KeyCode::Esc => vec![Action::ToggleHelp],
            // The App closes the overlay on any other key
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        let popup = centered_rect(64, 24, area);

        let help_lines: Vec<Line> = vec![
            Line::from(Span::styled(
                " atajos de teclado",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                " navegación",
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )),
            help_row("↑ / ↓  o  j / k", "mover el cursor / desplazar la letra"),
            help_row("shift + ↑ / ↓", "saltar de 5 en 5"),
            help_row("pg up / pg dn", "saltar 10 filas"),
            help_row("home / end  o  g / G", "primera / última"),
            help_row("tab / shift-tab", "panel siguiente / anterior"),
            help_row("1 / 2", "foco directo: canciones / letra"),
            Line::from(""),
            Line::from(Span::styled(
                " canciones",
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )),
            help_row("enter  o  clic", "fijar la canción resaltada"),
            help_row("/", "buscar por título o letra"),
            help_row("esc", "borrar la búsqueda, luego cerrarla"),
            help_row("y", "copiar título y letra al portapapeles"),
            help_row("r", "recargar el catálogo"),
            Line::from(""),
            Line::from(Span::styled(
                " interfaz",
                Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
            )),
            help_row("?", "abrir / cerrar esta ayuda"),
            help_row("q / Ctrl+C", "salir"),
            Line::from(""),
            Line::from(Span::styled(
                " pulsa ? o esc para cerrar",
                Style::default().fg(C_MUTED),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(C_PANEL_BORDER))
                        .style(Style::default().bg(ratatui::style::Color::Rgb(24, 20, 14))),
                )
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn help_row<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<22}", key),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}
