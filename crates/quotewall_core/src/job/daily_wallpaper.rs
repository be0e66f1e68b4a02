//! Periodic "rotate and apply" job.
//!
//! # Responsibility
//! - Resolve today's quote without any UI present.
//! - Hand a ready wallpaper to the host's platform call.
//!
//! # Invariants
//! - Readiness is decided by `CacheCoordinator::lookup` only.
//! - A missing slot is reported as `NoData` ("still generating"), not as a
//!   failure.
//! - The job never panics and never renders.

use crate::cache::coordinator::CacheCoordinator;
use crate::cache::wallpaper_cache::{CacheRef, WallpaperCache};
use crate::model::quote::QuoteId;
use crate::repo::quote_repo::QuoteRepository;
use crate::repo::settings_repo::SettingsRepository;
use crate::service::clock::Clock;
use crate::service::rotation_service::RotationService;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Platform wallpaper-set failure reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyError(pub String);

impl Display for ApplyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "wallpaper apply failed: {}", self.0)
    }
}

impl Error for ApplyError {}

/// Host capability that sets the device wallpaper from a cached image.
pub trait WallpaperApplier {
    fn apply(&self, wallpaper: &CacheRef) -> Result<(), ApplyError>;
}

/// Result reported back to the OS background-fetch scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Wallpaper applied for `quote_id`.
    NewData { quote_id: QuoteId },
    /// Nothing to apply: empty store, or the image is still generating.
    NoData { quote_id: Option<QuoteId> },
    Failed,
}

/// Background job wiring rotation, style preference and cache lookup.
pub struct DailyWallpaperJob<Q, S, C> {
    quotes: Q,
    settings: S,
    clock: C,
    cache: WallpaperCache,
}

impl<Q: QuoteRepository, S: SettingsRepository, C: Clock> DailyWallpaperJob<Q, S, C> {
    pub fn new(quotes: Q, settings: S, clock: C, cache: WallpaperCache) -> Self {
        Self {
            quotes,
            settings,
            clock,
            cache,
        }
    }

    /// Runs one job tick.
    pub fn run<A: WallpaperApplier + ?Sized>(&self, applier: &A) -> JobOutcome {
        let started_at = Instant::now();
        let outcome = self.run_inner(applier);
        match &outcome {
            Ok(outcome) => info!(
                "event=daily_job module=job status=ok outcome={} duration_ms={}",
                outcome_label(outcome),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=daily_job module=job status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        outcome.unwrap_or(JobOutcome::Failed)
    }

    fn run_inner<A: WallpaperApplier + ?Sized>(
        &self,
        applier: &A,
    ) -> Result<JobOutcome, Box<dyn Error>> {
        let rotation = RotationService::new(&self.quotes, &self.settings, &self.clock);
        let Some(quote) = rotation.daily_quote()? else {
            return Ok(JobOutcome::NoData { quote_id: None });
        };

        let style = self.settings.wallpaper_style()?;
        let coordinator = CacheCoordinator::new(&self.quotes, self.cache.clone());
        let Some(wallpaper) = coordinator.lookup(quote.id, style) else {
            return Ok(JobOutcome::NoData {
                quote_id: Some(quote.id),
            });
        };

        applier.apply(&wallpaper)?;
        Ok(JobOutcome::NewData { quote_id: quote.id })
    }
}

fn outcome_label(outcome: &JobOutcome) -> &'static str {
    match outcome {
        JobOutcome::NewData { .. } => "new_data",
        JobOutcome::NoData { quote_id: None } => "no_quote",
        JobOutcome::NoData { quote_id: Some(_) } => "still_generating",
        JobOutcome::Failed => "failed",
    }
}
