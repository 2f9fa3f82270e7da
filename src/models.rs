//! Domain model shared by every layer of the application. The struct mirrors
//! the JSON documents in the save file one-to-one so the store can stay a thin
//! serde wrapper, while the UI and service layers pass the same type around
//! without mapping code.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single recorded expense. Instances are only ever created through the
/// service layer, which owns id assignment; the UI treats the id as opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Positive, unique across the whole collection. Assigned as
    /// `max existing + 1` (or 1 for the first record).
    pub id: u32,
    /// Free-text description. The change form substitutes `-` when the user
    /// submits an empty description.
    pub description: String,
    /// Free-text category used by the table filter. May be empty or the `-`
    /// placeholder; save files written before the field existed load as empty.
    #[serde(default)]
    pub category: String,
    /// Spent amount. Must be greater than zero; the service rejects anything
    /// else before touching the store.
    pub amount: f64,
    /// Calendar day the money was spent, serialized as ISO `YYYY-MM-DD`.
    pub spent_at: NaiveDate,
}

impl Expense {
    /// Case-insensitive substring match used by the table's category filter.
    /// An empty filter matches every record.
    pub fn category_matches(&self, filter: &str) -> bool {
        self.category.to_lowercase().contains(&filter.to_lowercase())
    }
}
