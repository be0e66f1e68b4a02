//! Core domain logic for QuoteWall.
//! This crate owns daily quote rotation and the rendered-wallpaper cache.

pub mod cache;
pub mod db;
pub mod job;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use cache::coordinator::{CacheCoordinator, RenderError, WallpaperRenderer};
pub use cache::wallpaper_cache::{CacheError, CacheRef, CacheResult, WallpaperCache};
pub use job::daily_wallpaper::{ApplyError, DailyWallpaperJob, JobOutcome, WallpaperApplier};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, CategoryId};
pub use model::quote::{Quote, QuoteDraft, QuoteId, QuoteValidationError};
pub use model::style::WallpaperStyle;
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::quote_repo::{QuoteRepository, RepoError, RepoResult, SqliteQuoteRepository};
pub use repo::settings_repo::{
    RotationState, SettingKey, SettingsRepository, SqliteSettingsRepository,
};
pub use service::clock::{date_key, Clock, FixedClock, SystemClock};
pub use service::error::ServiceError;
pub use service::import_service::{
    build_import_request, parse_import_response, ImportError, ImportService, ImportSummary,
    ParsedQuote,
};
pub use service::preference_service::PreferenceService;
pub use service::quote_service::QuoteService;
pub use service::rotation_service::RotationService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
