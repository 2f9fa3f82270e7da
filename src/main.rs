//! Binary entry point: resolve the save file, hydrate the initial app state,
//! and drive the Ratatui event loop until the user exits.

use expense_tracker_tui::{run_app, App, JsonFileStore};

/// Returning a `Result` bubbles fatal initialization problems (for example an
/// unwritable config directory) up to the terminal with a non-zero exit
/// instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let store = JsonFileStore::open()?;
    let mut app = App::new(store)?;
    run_app(&mut app)
}
