//! Quote domain model.
//!
//! # Responsibility
//! - Define the read record handed to rotation, cache and FFI callers.
//! - Define the write-side draft and its validation rules.
//!
//! # Invariants
//! - `id` is assigned by storage and never reused while the row exists.
//! - `text` is non-empty after trimming.
//! - `category_ids` is sorted ascending and free of duplicates.

use crate::model::category::CategoryId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a stored quote (SQLite rowid).
pub type QuoteId = i64;

/// Persisted quote as read from the quote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
    pub author: Option<String>,
    /// Linked categories, ascending.
    pub category_ids: Vec<CategoryId>,
    /// SQLite `CURRENT_TIMESTAMP` text (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub created_at: String,
}

/// Validation failures for quote drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyText,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text cannot be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

/// Write model for creating or replacing a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteDraft {
    pub text: String,
    pub author: Option<String>,
    pub category_ids: Vec<CategoryId>,
}

impl QuoteDraft {
    /// Creates a draft without author or categories.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: None,
            category_ids: Vec::new(),
        }
    }

    /// Builder-style author setter.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Builder-style category setter.
    pub fn with_categories(mut self, category_ids: impl IntoIterator<Item = CategoryId>) -> Self {
        self.category_ids = category_ids.into_iter().collect();
        self
    }

    /// Checks draft invariants before persistence.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if self.text.trim().is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        Ok(())
    }

    /// Returns a trimmed copy with blank author collapsed to `None` and
    /// categories sorted and deduplicated.
    pub fn normalized(&self) -> Self {
        let author = self
            .author
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let mut category_ids = self.category_ids.clone();
        category_ids.sort_unstable();
        category_ids.dedup();

        Self {
            text: self.text.trim().to_string(),
            author,
            category_ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{QuoteDraft, QuoteValidationError};

    #[test]
    fn validate_rejects_whitespace_only_text() {
        let draft = QuoteDraft::new("   \n");
        assert_eq!(draft.validate(), Err(QuoteValidationError::EmptyText));
    }

    #[test]
    fn normalized_trims_and_collapses_blank_author() {
        let draft = QuoteDraft::new("  Stay hungry.  ")
            .with_author("   ")
            .with_categories([3, 1, 3]);
        let normalized = draft.normalized();

        assert_eq!(normalized.text, "Stay hungry.");
        assert_eq!(normalized.author, None);
        assert_eq!(normalized.category_ids, vec![1, 3]);
    }
}
