//! Core library surface for the expense tracker TUI. The public modules stay
//! an intentionally small API so the `bin` target and the integration tests
//! can reuse the same pieces.

pub mod models;
pub mod service;
pub mod store;
pub mod ui;

/// The persisted domain type other layers manipulate.
pub use models::Expense;

/// Persistence seam and its file-backed implementation, used by `main.rs` to
/// bootstrap and by tests to point the application at a sandbox directory.
pub use store::{ExpenseStore, JsonFileStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
