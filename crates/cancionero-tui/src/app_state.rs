//! AppState — shared read-only data passed to all components during render/event.
//!
//! Components read this for catalog and selection state, but never mutate it.
//! The App event-loop is the only thing that writes to AppState.

use cancionero_core::config::Config;
use cancionero_core::session::{RenderPlan, Session};

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    /// Catalog, query and selection. All mutations go through App actions.
    pub session: Session,
    /// Loaded configuration (source URL, list numbering).
    pub config: Config,
    /// Render instructions derived from `session`. Refreshed by the App after
    /// every mutation, so components always draw from a consistent snapshot.
    pub plan: RenderPlan,
    /// Whether keys currently feed the filter input or navigation.
    pub input_mode: InputMode,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let session = Session::new();
        let plan = session.render(config.ui.show_numbers);
        Self {
            session,
            config,
            plan,
            input_mode: InputMode::Normal,
        }
    }

    /// Recompute the render plan from the current session.
    pub fn refresh_plan(&mut self) {
        self.plan = self.session.render(self.config.ui.show_numbers);
    }
}
