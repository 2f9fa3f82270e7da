//! Ratatui front-end: one coordinator (`App`) owning a tagged union of
//! screens, plus the crossterm event loop that drives it.

mod app;
mod forms;
mod helpers;
mod screens;
mod signal;
mod terminal;

pub use app::App;
pub use terminal::run_app;
