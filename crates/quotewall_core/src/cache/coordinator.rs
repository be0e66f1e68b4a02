//! Cache coordination between the quote store, the slot directory and an
//! external renderer.
//!
//! # Responsibility
//! - Answer "is the wallpaper for this quote/style ready" (`lookup`).
//! - Find and fill missing slots, one render at a time.
//! - Drop slots that went stale.
//!
//! # Invariants
//! - `lookup` never triggers generation.
//! - One failed render never aborts the rest of a backlog.
//! - Concurrent `generate_missing` calls are not serialized here.

use crate::cache::wallpaper_cache::{CacheRef, CacheResult, WallpaperCache};
use crate::model::quote::{Quote, QuoteId};
use crate::model::style::WallpaperStyle;
use crate::repo::quote_repo::{QuoteRepository, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Renderer failure for a single quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "wallpaper render failed: {}", self.message)
    }
}

impl Error for RenderError {}

/// External capability that turns a quote into an image file.
///
/// The returned path is a source image; the coordinator copies it into the
/// cache slot. Image format and resolution are the renderer's business.
pub trait WallpaperRenderer {
    fn render(&self, quote: &Quote, style: WallpaperStyle) -> Result<PathBuf, RenderError>;
}

impl<R: WallpaperRenderer + ?Sized> WallpaperRenderer for &R {
    fn render(&self, quote: &Quote, style: WallpaperStyle) -> Result<PathBuf, RenderError> {
        (**self).render(quote, style)
    }
}

/// Keeps rendered wallpapers in step with the quote store.
pub struct CacheCoordinator<Q> {
    quotes: Q,
    cache: WallpaperCache,
}

impl<Q: QuoteRepository> CacheCoordinator<Q> {
    pub fn new(quotes: Q, cache: WallpaperCache) -> Self {
        Self { quotes, cache }
    }

    pub fn cache(&self) -> &WallpaperCache {
        &self.cache
    }

    /// Pure existence check for one slot.
    pub fn lookup(&self, quote_id: QuoteId, style: WallpaperStyle) -> Option<CacheRef> {
        self.cache.lookup(quote_id, style)
    }

    /// Lists every stored quote that has no slot for `style`.
    pub fn find_missing(&self, style: WallpaperStyle) -> RepoResult<Vec<Quote>> {
        let quotes = self.quotes.list_quotes()?;
        Ok(quotes
            .into_iter()
            .filter(|quote| self.cache.lookup(quote.id, style).is_none())
            .collect())
    }

    /// Renders and caches every missing slot for `style`, sequentially.
    ///
    /// Returns how many slots were filled. Per-quote render or copy failures
    /// are logged and skipped; the quote stays missing for the next call.
    pub fn generate_missing<R: WallpaperRenderer + ?Sized>(
        &self,
        style: WallpaperStyle,
        renderer: &R,
    ) -> RepoResult<usize> {
        let started_at = Instant::now();
        let missing = self.find_missing(style)?;
        if missing.is_empty() {
            return Ok(0);
        }

        info!(
            "event=wallpaper_generate module=cache status=start style={} missing={}",
            style.as_str(),
            missing.len()
        );

        let mut generated = 0;
        for quote in &missing {
            match self.render_into_slot(quote, style, renderer) {
                Ok(_) => generated += 1,
                Err(err) => warn!(
                    "event=wallpaper_generate module=cache status=item_failed style={} quote_id={} error={}",
                    style.as_str(),
                    quote.id,
                    err
                ),
            }
        }

        info!(
            "event=wallpaper_generate module=cache status=ok style={} missing={} generated={} duration_ms={}",
            style.as_str(),
            missing.len(),
            generated,
            started_at.elapsed().as_millis()
        );
        Ok(generated)
    }

    /// Stores an image rendered outside the coordinator (e.g. by the UI
    /// shell) into its slot.
    pub fn store_rendered(
        &self,
        quote_id: QuoteId,
        style: WallpaperStyle,
        source: &Path,
    ) -> CacheResult<CacheRef> {
        self.cache.store(quote_id, style, source)
    }

    /// Removes slots for one quote (both styles), or every slot when
    /// `quote_id` is `None`.
    pub fn invalidate(&self, quote_id: Option<QuoteId>) -> CacheResult<usize> {
        invalidate_slots(&self.cache, quote_id)
    }

    fn render_into_slot<R: WallpaperRenderer + ?Sized>(
        &self,
        quote: &Quote,
        style: WallpaperStyle,
        renderer: &R,
    ) -> Result<CacheRef, Box<dyn Error>> {
        let source = renderer.render(quote, style)?;
        Ok(self.cache.store(quote.id, style, &source)?)
    }
}

/// Shared invalidation path for the coordinator and the editing services.
pub(crate) fn invalidate_slots(
    cache: &WallpaperCache,
    quote_id: Option<QuoteId>,
) -> CacheResult<usize> {
    let removed = match quote_id {
        Some(id) => cache.remove_quote(id)?,
        None => cache.clear()?,
    };
    info!(
        "event=wallpaper_invalidate module=cache status=ok scope={} removed={}",
        quote_id.map_or_else(|| "all".to_string(), |id| format!("quote:{id}")),
        removed
    );
    Ok(removed)
}
