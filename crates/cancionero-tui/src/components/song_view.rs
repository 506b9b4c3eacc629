//! SongView component — right pane with the selected song's title and text.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use cancionero_core::session::Detail;
use cancionero_core::song::SongId;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_muted, C_ACCENT, C_PANEL_BORDER, C_PRIMARY},
    widgets::pane_chrome::pane_chrome,
};

pub struct SongView {
    pub scroll: usize,
    /// Which song the scroll position belongs to; a selection change resets it.
    last_song: Option<SongId>,
}

impl SongView {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            last_song: None,
        }
    }

    fn build_lines(&self, detail: &Detail) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                detail.title.clone(),
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "─".repeat(detail.title.width().min(60)),
                Style::default().fg(C_PANEL_BORDER),
            ),
        ]));
        lines.push(Line::from(""));

        if detail.body.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled("(sin letra)".to_string(), style_muted()),
            ]));
        } else {
            for text in detail.body.lines() {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(text.to_string(), Style::default().fg(C_PRIMARY)),
                ]));
            }
        }

        lines
    }
}

impl Component for SongView {
    fn id(&self) -> ComponentId {
        ComponentId::SongView
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(step);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(step);
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                // scroll to bottom: clamped in draw
                self.scroll = usize::MAX;
            }

            KeyCode::Char('y') => {
                if let Some(d) = &state.plan.detail {
                    return vec![Action::CopyToClipboard(format!("{}\n\n{}", d.title, d.body))];
                }
            }

            _ => {}
        }

        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            MouseEventKind::ScrollDown => {
                self.scroll = self.scroll.saturating_add(1);
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        if area.height == 0 {
            return;
        }

        let block = pane_chrome("letra", Some('2'), focused, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        // A selection change restarts reading from the top.
        let current = state.session.selected_id();
        if current != self.last_song {
            self.last_song = current;
            self.scroll = 0;
        }

        let detail = match state.plan.detail.as_ref().filter(|_| state.plan.detail_visible) {
            Some(d) => d,
            None => {
                frame.render_widget(
                    Paragraph::new(Span::styled("  (sin selección)", style_muted())),
                    inner,
                );
                return;
            }
        };

        let lines = self.build_lines(detail);
        let total = lines.len();
        let height = inner.height as usize;

        // Clamp scroll
        let max_scroll = total.saturating_sub(height);
        if self.scroll > max_scroll {
            self.scroll = max_scroll;
        }

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll as u16, 0)),
            inner,
        );
    }
}
