//! Quote editing use-cases.
//!
//! # Responsibility
//! - Provide create/update/delete/get/list entry points for callers.
//! - Drop cached wallpapers whose source quote changed or disappeared.
//!
//! # Invariants
//! - Slots are invalidated only after the store write succeeded.
//! - Creating a quote never touches the cache; the new quote simply shows up
//!   in `find_missing`.

use crate::cache::coordinator::invalidate_slots;
use crate::cache::wallpaper_cache::WallpaperCache;
use crate::model::category::CategoryId;
use crate::model::quote::{Quote, QuoteDraft, QuoteId};
use crate::repo::quote_repo::{QuoteRepository, RepoResult};
use crate::service::error::ServiceError;

/// Quote CRUD facade that keeps the wallpaper cache consistent.
pub struct QuoteService<R: QuoteRepository> {
    repo: R,
    cache: WallpaperCache,
}

impl<R: QuoteRepository> QuoteService<R> {
    pub fn new(repo: R, cache: WallpaperCache) -> Self {
        Self { repo, cache }
    }

    /// Creates a quote and returns the stored record.
    pub fn create_quote(&self, draft: &QuoteDraft) -> Result<Quote, ServiceError> {
        let id = self.repo.create_quote(draft)?;
        self.repo
            .get_quote(id)?
            .ok_or(ServiceError::InconsistentState(
                "created quote not found in read-back",
            ))
    }

    /// Replaces text, author and categories, then drops both style slots.
    pub fn update_quote(&self, id: QuoteId, draft: &QuoteDraft) -> Result<Quote, ServiceError> {
        self.repo.update_quote(id, draft)?;
        invalidate_slots(&self.cache, Some(id))?;
        self.repo
            .get_quote(id)?
            .ok_or(ServiceError::InconsistentState(
                "updated quote not found in read-back",
            ))
    }

    /// Deletes a quote and its slots.
    ///
    /// A rotation state pointing at the quote is left alone; the rotation
    /// engine recovers from the dangling id on its next call.
    pub fn delete_quote(&self, id: QuoteId) -> Result<(), ServiceError> {
        self.repo.delete_quote(id)?;
        invalidate_slots(&self.cache, Some(id))?;
        Ok(())
    }

    pub fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>> {
        self.repo.get_quote(id)
    }

    pub fn list_quotes(&self) -> RepoResult<Vec<Quote>> {
        self.repo.list_quotes()
    }

    pub fn list_quotes_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Quote>> {
        self.repo.list_quotes_by_category(category_id)
    }
}
