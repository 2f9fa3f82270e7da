//! Persistence layer split across logical submodules: the JSON save file that
//! holds the whole collection and the one-shot CSV export.

mod csv;
mod file;

use anyhow::Result;

use crate::models::Expense;

pub use csv::export_csv;
pub use file::JsonFileStore;

/// Contract between the service layer and the durable backing resource. The
/// collection is always read and written as one unit; there is no partial
/// update path.
pub trait ExpenseStore {
    /// Read the full collection. A missing or empty backing resource yields an
    /// empty collection, never an error.
    fn load(&self) -> Result<Vec<Expense>>;

    /// Replace the backing resource with the given collection. Callers never
    /// observe a partially written file.
    fn save(&self, expenses: &[Expense]) -> Result<()>;
}
