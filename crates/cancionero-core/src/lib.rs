//! Core library for the cancionero song viewer: catalog model, search
//! normalization, session state machine, and the HTTP loader.  UI-free — the
//! terminal frontend consumes the `RenderPlan` values produced here.

pub mod config;
pub mod error;
pub mod fetch;
pub mod platform;
pub mod search;
pub mod session;
pub mod song;
