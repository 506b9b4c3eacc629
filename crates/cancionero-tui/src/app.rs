//! App — component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - Catalog fetches run as spawned tasks and report back through the channel.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use cancionero_core::config::Config;
use cancionero_core::error::LoadError;
use cancionero_core::fetch::CatalogClient;
use cancionero_core::session::SessionPhase;
use cancionero_core::song::Song;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    components::{help_overlay::HelpOverlay, song_list::SongList, song_view::SongView},
    focus::FocusRing,
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// A catalog fetch finished, successfully or not.
    CatalogLoaded(Result<Vec<Song>, LoadError>),
}

#[derive(Debug, Clone, Copy, Default)]
struct PaneAreas {
    song_list: Rect,
    song_view: Rect,
}

pub struct App {
    state: AppState,

    // Components
    song_list: SongList,
    song_view: SongView,
    help_overlay: HelpOverlay,

    focus: FocusRing,
    show_help: bool,
    should_quit: bool,
    /// Pane rectangles recorded during draw, for mouse hit-testing.
    pane_areas: PaneAreas,
    toast: ToastManager,
    /// Sender side of the app bus; catalog loads report through it.
    bus_tx: Option<mpsc::Sender<AppMessage>>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            state: AppState::new(config),
            song_list: SongList::new(),
            song_view: SongView::new(),
            help_overlay: HelpOverlay::new(),
            focus: FocusRing::new(vec![ComponentId::SongList, ComponentId::SongView]),
            show_help: false,
            should_quit: false,
            pane_areas: PaneAreas::default(),
            toast: ToastManager::new(),
            bus_tx: None,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        self.bus_tx = Some(tx.clone());

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Initial catalog fetch ─────────────────────────────────────────────
        self.spawn_loader();

        // ── Periodic timers ───────────────────────────────────────────────────
        // Toast expiry check
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            // Wait for next event
            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                _ = toast_tick.tick() => {
                    // Only reap (and redraw) while a toast is on screen.
                    if !self.toast.is_empty() {
                        self.toast.tick();
                        needs_redraw = true;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// Kick off a catalog fetch; the result lands on the app bus.
    fn spawn_loader(&self) {
        let Some(tx) = self.bus_tx.clone() else {
            return;
        };
        let base_url = self.state.config.source.base_url.clone();
        tokio::spawn(async move {
            let client = CatalogClient::new(&base_url);
            let result = client.load().await;
            let _ = tx.send(AppMessage::CatalogLoaded(result)).await;
        });
    }

    /// Recompute render instructions and mirror them into the list widget.
    fn refresh_plan(&mut self) {
        self.state.refresh_plan();
        self.song_list.sync_rows(&self.state);
    }

    // ── Message handling ──────────────────────────────────────────────────────

    /// Returns true when the screen should be redrawn.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    let actions = self.handle_key(key);
                    for action in actions {
                        self.dispatch(action);
                    }
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    for action in actions {
                        self.dispatch(action);
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            },

            AppMessage::CatalogLoaded(result) => {
                match result {
                    Ok(songs) => {
                        info!("catalog loaded: {} songs", songs.len());
                        self.state.session.catalog_loaded(songs);
                    }
                    Err(e) => {
                        error!("catalog load failed: {:#}", e);
                        self.state.session.load_failed();
                    }
                }
                self.refresh_plan();
            }
        }
        true
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // Global keys, active regardless of focus
        match key.code {
            KeyCode::Char('q') if key.modifiers == KeyModifiers::NONE => {
                if self.state.input_mode == InputMode::Normal {
                    return vec![Action::Quit];
                }
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return vec![Action::Quit];
            }
            KeyCode::Char('?') if self.state.input_mode == InputMode::Normal => {
                return vec![Action::ToggleHelp];
            }
            _ => {}
        }

        // Help overlay captures every key while open
        if self.show_help {
            let actions = self.help_overlay.handle_key(key, &self.state);
            if !actions.is_empty() {
                return actions;
            }
            // Any other key closes the overlay
            return vec![Action::ToggleHelp];
        }

        // Tab / Shift-Tab always cycle focus; an open filter closes first
        match key.code {
            KeyCode::Tab => {
                if self.state.input_mode == InputMode::Filter {
                    return vec![Action::CloseFilter, Action::FocusNext];
                }
                return vec![Action::FocusNext];
            }
            KeyCode::BackTab => {
                if self.state.input_mode == InputMode::Filter {
                    return vec![Action::CloseFilter, Action::FocusPrev];
                }
                return vec![Action::FocusPrev];
            }
            _ => {}
        }

        // Global bindings outside filter mode
        if self.state.input_mode == InputMode::Normal {
            match key.code {
                KeyCode::Char('r') => return vec![Action::Reload],
                KeyCode::Char('/') => {
                    // The filter lives on the song list; pull focus there first
                    return vec![Action::FocusPane(ComponentId::SongList), Action::OpenFilter];
                }
                KeyCode::Char('1') => {
                    self.focus.set_by_position(0);
                    return vec![];
                }
                KeyCode::Char('2') => {
                    self.focus.set_by_position(1);
                    return vec![];
                }
                _ => {}
            }
        }

        // Everything else goes to the focused component
        let s = &self.state;
        match self.focus.current() {
            Some(ComponentId::SongList) => self.song_list.handle_key(key, s),
            Some(ComponentId::SongView) => self.song_view.handle_key(key, s),
            _ => vec![],
        }
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        let is_click = matches!(
            event.kind,
            MouseEventKind::Down(_) | MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
        );
        if !is_click {
            return vec![];
        }
        // The overlay swallows clicks; keys close it
        if self.show_help {
            return vec![];
        }

        let col = event.column;
        let row = event.row;

        fn hit(r: Rect, col: u16, row: u16) -> bool {
            r.width > 0
                && r.height > 0
                && col >= r.x
                && col < r.x + r.width
                && row >= r.y
                && row < r.y + r.height
        }

        let areas = self.pane_areas;
        let s = &self.state;

        macro_rules! click_pane {
            ($id:expr, $component:expr, $area:expr) => {{
                let mut actions = $component.handle_mouse(event, $area, s);
                if !self.focus.is_focused($id) {
                    actions.insert(0, Action::FocusPane($id));
                    // Clicking away from an open filter closes it
                    if self.state.input_mode == InputMode::Filter {
                        actions.insert(0, Action::CloseFilter);
                    }
                }
                return actions;
            }};
        }

        if hit(areas.song_list, col, row) {
            click_pane!(ComponentId::SongList, self.song_list, areas.song_list);
        }
        if hit(areas.song_view, col, row) {
            click_pane!(ComponentId::SongView, self.song_view, areas.song_view);
        }

        vec![]
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        // Broadcast to all components first, collecting follow-ups
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut all = Vec::new();
            all.extend(self.song_list.on_action(&action, s));
            all.extend(self.song_view.on_action(&action, s));
            all.extend(self.help_overlay.on_action(&action, s));
            all
        };

        self.apply_action(action);

        // Follow-ups run one level deep, never recursively
        for action in secondary {
            self.apply_action(action);
        }
    }

    fn apply_action(&mut self, action: Action) {
        debug!("apply_action: {:?}", action);
        match action {
            // ── Catalog ───────────────────────────────────────────────────────
            Action::SelectSong(id) => {
                if self.state.session.select(id) {
                    self.refresh_plan();
                }
            }
            Action::Reload => {
                self.state.session.begin_reload();
                self.refresh_plan();
                self.toast.info("recargando canciones");
                self.spawn_loader();
            }

            // ── Navigation ────────────────────────────────────────────────────
            Action::FocusNext => {
                self.focus.next();
                self.sync_input_mode();
            }
            Action::FocusPrev => {
                self.focus.prev();
                self.sync_input_mode();
            }
            Action::FocusPane(id) => {
                self.focus.set(id);
            }

            // ── Filter ────────────────────────────────────────────────────────
            Action::OpenFilter => {
                self.state.input_mode = InputMode::Filter;
            }
            Action::CloseFilter => {
                self.state.input_mode = InputMode::Normal;
            }
            Action::QueryChanged(query) => {
                self.state.session.set_query(query);
                self.refresh_plan();
            }

            // ── UI ────────────────────────────────────────────────────────────
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
            }
            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        // Truncate for toast display
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text.clone()
                        };
                        self.toast.success(format!("copiado: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("error de portapapeles: {}", e));
                    }
                }
            }
            Action::Quit => {
                self.should_quit = true;
            }
        }
    }

    /// Changing focus always drops back to Normal; the query stays applied but
    /// keys stop feeding the input.
    fn sync_input_mode(&mut self) {
        self.state.input_mode = InputMode::Normal;
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use crate::theme::C_BG;
        use ratatui::widgets::Block;
        let area = frame.area();

        // Fill the entire terminal with the base background colour so that
        // any unstyled cells (gaps between panes) match the theme rather
        // than whatever the terminal default is.
        frame.render_widget(
            Block::default().style(ratatui::style::Style::default().bg(C_BG)),
            area,
        );

        // ── Outer layout: body | status bar ──────────────────────────────────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);
        let body_area = outer[0];
        let status_area = outer[1];

        // ── Body: song list | lyric view ─────────────────────────────────────
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
            .split(body_area);

        let list_focused = self.focus.is_focused(ComponentId::SongList);
        self.song_list.draw(frame, cols[0], list_focused, &self.state);
        self.pane_areas.song_list = cols[0];

        let view_focused = self.focus.is_focused(ComponentId::SongView);
        self.song_view.draw(frame, cols[1], view_focused, &self.state);
        self.pane_areas.song_view = cols[1];

        // ── Status bar ───────────────────────────────────────────────────────
        status_bar::draw_status_bar(
            frame,
            status_area,
            self.state.input_mode,
            self.state.plan.status,
            matches!(self.state.session.phase(), SessionPhase::LoadError),
        );

        // ── Help overlay (over the panes) ────────────────────────────────────
        if self.show_help {
            self.help_overlay.draw(frame, area, false, &self.state);
        }

        // ── Toast notifications (topmost layer) ──────────────────────────────
        self.toast.draw(frame, area);
    }
}
