//! Wallpaper style preference.
//!
//! # Invariants
//! - Changing the style discards every cached slot; old-style images are not
//!   kept for a later toggle back.
//! - Re-selecting the current style is a no-op.

use crate::cache::coordinator::invalidate_slots;
use crate::cache::wallpaper_cache::WallpaperCache;
use crate::model::style::WallpaperStyle;
use crate::repo::quote_repo::RepoResult;
use crate::repo::settings_repo::SettingsRepository;
use crate::service::error::ServiceError;
use log::info;

pub struct PreferenceService<S: SettingsRepository> {
    settings: S,
    cache: WallpaperCache,
}

impl<S: SettingsRepository> PreferenceService<S> {
    pub fn new(settings: S, cache: WallpaperCache) -> Self {
        Self { settings, cache }
    }

    pub fn wallpaper_style(&self) -> RepoResult<WallpaperStyle> {
        self.settings.wallpaper_style()
    }

    /// Persists `style`. Returns `true` when the preference actually changed.
    pub fn set_wallpaper_style(&self, style: WallpaperStyle) -> Result<bool, ServiceError> {
        let previous = self.settings.wallpaper_style()?;
        if previous == style {
            return Ok(false);
        }

        self.settings.set_wallpaper_style(style)?;
        invalidate_slots(&self.cache, None)?;
        info!(
            "event=style_change module=preferences status=ok from={} to={}",
            previous.as_str(),
            style.as_str()
        );
        Ok(true)
    }
}
