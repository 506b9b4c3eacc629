//! SongList component — left pane with the filtered catalog.

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use cancionero_core::session::{ListRow, SessionPhase};
use cancionero_core::song::SongId;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_muted, C_ACCENT, C_ERROR, C_PRIMARY, C_SECONDARY, C_SELECTION_BG, C_SONG_NUMBER},
    widgets::{
        filter_input::{FilterAction, FilterInput},
        pane_chrome::{pane_chrome, Badge},
        scrollable_list::ScrollableList,
    },
};

pub struct SongList {
    pub list: ScrollableList<ListRow>,
    pub filter_input: FilterInput,
    list_state: ListState,
    /// Ids currently shown, to detect when the view itself was rebuilt
    /// (filter change, load, reload) versus a mere highlight update.
    row_ids: Vec<SongId>,
}

impl SongList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
            filter_input: FilterInput::new("título o letra..."),
            list_state: ListState::default(),
            row_ids: Vec::new(),
        }
    }

    /// Mirror the current render plan into the widget. When the set of rows
    /// changed, the cursor jumps to the active row; otherwise the user's
    /// cursor position is kept.
    pub fn sync_rows(&mut self, state: &AppState) {
        let ids: Vec<SongId> = state.plan.rows.iter().map(|r| r.id).collect();
        let rebuilt = ids != self.row_ids;
        self.list.set_items(state.plan.rows.clone());
        if rebuilt {
            self.row_ids = ids;
            if let Some(pos) = state.session.selection_view_index() {
                self.list.set_selected(pos);
            }
            self.list.scroll_offset = 0;
        }
    }

    fn render_item<'a>(&self, row: &'a ListRow, is_cursor: bool, show_numbers: bool) -> ListItem<'a> {
        let marker = if row.active {
            Span::styled("▸ ", Style::default().fg(C_ACCENT))
        } else {
            Span::raw("  ")
        };

        let label_style = if row.active {
            Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
        } else if is_cursor {
            Style::default().fg(C_PRIMARY)
        } else {
            Style::default().fg(C_SECONDARY)
        };

        let mut spans = vec![marker];
        // Labels are "N. title" when numbering is on; tint the ordinal.
        let split = if show_numbers {
            row.label.split_once(". ")
        } else {
            None
        };
        match split {
            Some((num, title)) => {
                spans.push(Span::styled(
                    format!("{}. ", num),
                    Style::default().fg(C_SONG_NUMBER),
                ));
                spans.push(Span::styled(title, label_style));
            }
            None => spans.push(Span::styled(row.label.as_str(), label_style)),
        }

        let item_bg = if is_cursor {
            Style::default().bg(C_SELECTION_BG)
        } else {
            Style::default()
        };
        ListItem::new(Line::from(spans)).style(item_bg)
    }

    fn draw_filter_bar(&self, frame: &mut Frame, inner: Rect) {
        if self.filter_input.is_active() && inner.height > 0 {
            let bar = Rect {
                y: inner.y + inner.height.saturating_sub(1),
                height: 1,
                ..inner
            };
            self.filter_input.draw(frame, bar);
        }
    }
}

impl Component for SongList {
    fn id(&self) -> ComponentId {
        ComponentId::SongList
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }

        // Filter mode input
        if self.filter_input.is_active() {
            match key.code {
                KeyCode::Up => {
                    self.list.select_up(1);
                    return vec![];
                }
                KeyCode::Down => {
                    self.list.select_down(1);
                    return vec![];
                }
                _ => {}
            }
            return match self.filter_input.handle_key(key) {
                FilterAction::Changed(q) => vec![Action::QueryChanged(q)],
                FilterAction::Confirmed => {
                    // Keep the narrowed view and promote the cursor row
                    let mut actions = vec![Action::CloseFilter];
                    if let Some(row) = self.list.selected_item() {
                        actions.push(Action::SelectSong(row.id));
                    }
                    actions
                }
                FilterAction::Cancelled => vec![Action::CloseFilter],
                FilterAction::None => vec![],
            };
        }

        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.list.select_up(step),
            KeyCode::Down | KeyCode::Char('j') => self.list.select_down(step),
            KeyCode::PageUp => self.list.select_up(10),
            KeyCode::PageDown => self.list.select_down(10),
            KeyCode::Home | KeyCode::Char('g') => self.list.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.select_last(),

            KeyCode::Enter => {
                if let Some(row) = self.list.selected_item() {
                    return vec![Action::SelectSong(row.id)];
                }
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

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        let rel_row = event.row.saturating_sub(area.y + 1) as usize; // +1 for the border row
        match event.kind {
            MouseEventKind::ScrollUp => {
                self.list.select_up(1);
            }
            MouseEventKind::ScrollDown => {
                self.list.select_down(1);
            }
            MouseEventKind::Down(ratatui::crossterm::event::MouseButton::Left) => {
                if self.list.handle_click(rel_row) {
                    if let Some(row) = self.list.selected_item() {
                        return vec![Action::SelectSong(row.id)];
                    }
                }
            }
            _ => {}
        }
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenFilter => self.filter_input.activate(),
            Action::CloseFilter => self.filter_input.deactivate(),
            // A reload resets the query; drop the stale input text with it.
            Action::Reload => {
                self.filter_input.clear();
                self.filter_input.deactivate();
            }
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let count = state.plan.count.clone();
        let block = pane_chrome(
            "canciones",
            Some('1'),
            focused,
            Some(Badge {
                text: &count,
                color: C_SECONDARY,
            }),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !state.plan.list_visible {
            // Loading or load-error: the pane carries the status literal.
            let style = if matches!(state.session.phase(), SessionPhase::LoadError) {
                Style::default().fg(C_ERROR)
            } else {
                style_muted()
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  {}", state.plan.status), style)),
                inner,
            );
            return;
        }

        if self.list.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("  {}", state.plan.status),
                    style_muted(),
                )),
                inner,
            );
            self.draw_filter_bar(frame, inner);
            return;
        }

        // The active filter bar takes the bottom row of the pane.
        let content = if self.filter_input.is_active() && inner.height > 0 {
            Rect {
                height: inner.height - 1,
                ..inner
            }
        } else {
            inner
        };
        let content_h = content.height as usize;
        self.list.ensure_visible(content_h);
        let sel_in_view = self.list.selected_in_view(content_h);
        let show_numbers = state.config.ui.show_numbers;

        // Cloned rows: list_state below needs self mutably.
        let visible: Vec<(usize, ListRow)> = self
            .list
            .visible_items(content_h)
            .into_iter()
            .map(|(i, row)| (i, row.clone()))
            .collect();

        let items: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .map(|(view_row, (_, row))| self.render_item(row, view_row == sel_in_view, show_numbers))
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default())
            .highlight_symbol("");
        self.list_state.select(Some(sel_in_view));
        frame.render_stateful_widget(list, content, &mut self.list_state);

        self.draw_filter_bar(frame, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cancionero_core::config::Config;
    use cancionero_core::song::Song;

    fn song(id: u32, title: &str) -> Song {
        Song {
            id,
            number: id,
            title: title.to_string(),
            file: String::new(),
            body: String::new(),
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new(Config::default());
        state.session.catalog_loaded(vec![
            song(1, "Pescador de hombres"),
            song(2, "Alma misionera"),
            song(3, "Aleluya"),
        ]);
        state.refresh_plan();
        state
    }

    #[test]
    fn test_cursor_lands_on_selection_after_rebuild() {
        let mut state = loaded_state();
        let mut pane = SongList::new();
        pane.sync_rows(&state);
        assert_eq!(pane.list.selected, 0);

        // narrowing drags the selection to the only match
        state.session.set_query("aleluya");
        state.refresh_plan();
        pane.sync_rows(&state);
        assert_eq!(pane.list.selected_item().unwrap().id, 3);

        // widening keeps the selection; the cursor follows it to its view spot
        state.session.set_query("");
        state.refresh_plan();
        pane.sync_rows(&state);
        assert_eq!(pane.list.selected, 2);
        assert!(pane.list.selected_item().unwrap().active);
    }

    #[test]
    fn test_plain_highlight_update_keeps_cursor() {
        let mut state = loaded_state();
        let mut pane = SongList::new();
        pane.sync_rows(&state);
        pane.list.select_down(2);
        assert_eq!(pane.list.selected, 2);

        // selecting a song changes row flags but not the row set
        state.session.select(2);
        state.refresh_plan();
        pane.sync_rows(&state);
        assert_eq!(pane.list.selected, 2);
    }
}
