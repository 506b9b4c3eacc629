//! UI panes. Each implements [`crate::component::Component`].

pub mod help_overlay;
pub mod song_list;
pub mod song_view;
