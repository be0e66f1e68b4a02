//! Category domain model.

use serde::{Deserialize, Serialize};

/// Stable identifier for a stored category (SQLite rowid).
pub type CategoryId = i64;

/// User-defined grouping for quotes. Names are unique and stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
