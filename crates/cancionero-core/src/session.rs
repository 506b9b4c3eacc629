//! Session state: catalog, query, filtered view and selection, plus the
//! pure render planning the UI consumes.
//!
//! Phase transitions:
//!   Loading -> Ready | LoadError
//!   Ready   -> Ready           (query/selection changes)
//!   any     -> Loading         (user-initiated reload)
//!
//! `LoadError` never recovers on its own; only a reload leaves it.

use tracing::debug;

use crate::search;
use crate::song::{Song, SongId};

pub const STATUS_LOADING: &str = "Cargando canciones...";
pub const STATUS_READY: &str = "Listo.";
pub const STATUS_NO_MATCHES: &str = "No hay coincidencias.";
pub const STATUS_EMPTY: &str = "No hay canciones cargadas.";
pub const STATUS_LOAD_ERROR: &str =
    "Error cargando canciones. Verifica songs/index.json y los .txt en songs/.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionPhase {
    #[default]
    Loading,
    Ready,
    LoadError,
}

/// One session's worth of viewer state.  Owned by the UI task; every mutation
/// re-establishes the selection invariant (a non-empty filtered view always
/// has a selected member).
#[derive(Debug, Default)]
pub struct Session {
    phase: SessionPhase,
    catalog: Vec<Song>,
    /// Raw query text as typed; normalization happens at match time.
    query: String,
    /// Indices into `catalog`, in catalog order.
    filtered: Vec<usize>,
    selected: Option<SongId>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn catalog(&self) -> &[Song] {
        &self.catalog
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected_id(&self) -> Option<SongId> {
        self.selected
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Song shown at `view_idx` of the filtered view.
    pub fn song_at_view(&self, view_idx: usize) -> Option<&Song> {
        self.filtered.get(view_idx).and_then(|&i| self.catalog.get(i))
    }

    /// First catalog entry carrying the selected id (first one wins when the
    /// index repeats an id).
    pub fn selected_song(&self) -> Option<&Song> {
        let id = self.selected?;
        self.catalog.iter().find(|s| s.id == id)
    }

    /// Position of the selection within the filtered view, for cursor sync.
    pub fn selection_view_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.filtered
            .iter()
            .position(|&i| self.catalog[i].id == id)
    }

    /// Install a freshly loaded catalog and enter `Ready`.  The current query
    /// is re-applied and the first visible song selected when none is.
    pub fn catalog_loaded(&mut self, songs: Vec<Song>) {
        debug!("catalog loaded: {} songs", songs.len());
        self.catalog = songs;
        self.phase = SessionPhase::Ready;
        self.refilter();
    }

    /// Enter the terminal `LoadError` phase.  The catalog stays empty.
    pub fn load_failed(&mut self) {
        self.catalog.clear();
        self.filtered.clear();
        self.selected = None;
        self.phase = SessionPhase::LoadError;
    }

    /// Drop everything and go back to `Loading` for a fresh fetch.
    pub fn begin_reload(&mut self) {
        *self = Self::default();
    }

    /// Replace the query and recompute the filtered view.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    /// Select by id.  Ignored unless the id exists in the catalog.
    pub fn select(&mut self, id: SongId) -> bool {
        if self.catalog.iter().any(|s| s.id == id) {
            self.selected = Some(id);
            true
        } else {
            debug!("select ignored, id {} not in catalog", id);
            false
        }
    }

    /// Recompute `filtered` from the catalog and query, then repair the
    /// selection: a non-empty view whose members no longer include the
    /// selected id snaps to its first entry.  An empty view leaves the
    /// selection alone — it is hidden, not lost.
    fn refilter(&mut self) {
        self.filtered = search::filter_catalog(&self.catalog, &self.query);
        if self.filtered.is_empty() {
            return;
        }
        let still_visible = self
            .selected
            .map(|id| self.filtered.iter().any(|&i| self.catalog[i].id == id))
            .unwrap_or(false);
        if !still_visible {
            self.selected = Some(self.catalog[self.filtered[0]].id);
        }
    }

    /// Project the session into render instructions.  Pure: same state, same
    /// plan.
    pub fn render(&self, show_numbers: bool) -> RenderPlan {
        match self.phase {
            SessionPhase::Loading => RenderPlan::blank(STATUS_LOADING),
            SessionPhase::LoadError => RenderPlan::blank(STATUS_LOAD_ERROR),
            SessionPhase::Ready => {
                let rows: Vec<ListRow> = self
                    .filtered
                    .iter()
                    .map(|&i| {
                        let song = &self.catalog[i];
                        ListRow {
                            id: song.id,
                            label: song.list_label(show_numbers),
                            active: self.selected == Some(song.id),
                        }
                    })
                    .collect();

                let detail = if rows.is_empty() {
                    None
                } else {
                    self.selected_song().map(|song| Detail {
                        title: song.list_label(show_numbers),
                        body: song.body.clone(),
                    })
                };

                let status = if self.catalog.is_empty() {
                    STATUS_EMPTY
                } else if rows.is_empty() {
                    STATUS_NO_MATCHES
                } else {
                    STATUS_READY
                };

                RenderPlan {
                    list_visible: true,
                    detail_visible: detail.is_some(),
                    count: format!("{} / {}", rows.len(), self.catalog.len()),
                    rows,
                    detail,
                    status,
                }
            }
        }
    }
}

/// Everything the UI needs to draw one frame, with no reference back into the
/// session.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub list_visible: bool,
    pub rows: Vec<ListRow>,
    pub detail_visible: bool,
    pub detail: Option<Detail>,
    pub status: &'static str,
    /// "visible / total", e.g. "12 / 118".
    pub count: String,
}

impl RenderPlan {
    fn blank(status: &'static str) -> Self {
        Self {
            list_visible: false,
            rows: Vec::new(),
            detail_visible: false,
            detail: None,
            status,
            count: "0 / 0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListRow {
    pub id: SongId,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detail {
    /// Heading in the same form as the song's list row label.
    pub title: String,
    pub body: String,
}
