//! Daily quote rotation.
//!
//! # Responsibility
//! - Decide which quote is "today's quote" and persist that decision.
//! - Recover from a persisted id whose quote was deleted.
//!
//! # Invariants
//! - Same local day + resolvable current id: return it, zero writes.
//! - A rotation writes `currentQuoteId` and `lastQuoteDate` together.
//! - With more than one quote, a rotation never re-picks the current id.
//! - An empty store yields `None` and no writes.
//! - Store errors propagate unchanged; a dangling id is never surfaced.

use crate::model::quote::{Quote, QuoteId};
use crate::repo::quote_repo::{QuoteRepository, RepoResult};
use crate::repo::settings_repo::SettingsRepository;
use crate::service::clock::Clock;
use log::{debug, info, warn};

/// Resolution of the persisted `currentQuoteId` against the quote store.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CurrentQuote {
    Valid(Quote),
    Dangling(QuoteId),
    Unset,
}

/// Rotation engine over a quote store, a settings store and a clock.
pub struct RotationService<Q, S, C> {
    quotes: Q,
    settings: S,
    clock: C,
}

impl<Q: QuoteRepository, S: SettingsRepository, C: Clock> RotationService<Q, S, C> {
    pub fn new(quotes: Q, settings: S, clock: C) -> Self {
        Self {
            quotes,
            settings,
            clock,
        }
    }

    /// Returns whether the persisted selection date differs from today.
    ///
    /// Read-only.
    pub fn should_rotate(&self) -> RepoResult<bool> {
        let last_date = self.settings.last_quote_date()?;
        Ok(last_date.as_deref() != Some(self.clock.today_key().as_str()))
    }

    /// Unconditionally selects and persists a new active quote.
    ///
    /// # Contract
    /// - Empty store: returns `Ok(None)` without writing.
    /// - Current id set and more than one quote: picks among the others.
    /// - Otherwise: picks any quote (the single quote re-selects itself).
    pub fn rotate(&self) -> RepoResult<Option<Quote>> {
        let count = self.quotes.count_quotes()?;
        if count == 0 {
            info!("event=quote_rotate module=rotation status=skipped reason=empty_store");
            return Ok(None);
        }

        let current_id = self.settings.current_quote_id()?;
        let picked = match current_id {
            Some(id) if count > 1 => self.quotes.random_quote_excluding(id)?,
            _ => self.quotes.random_quote()?,
        };
        // Rows can vanish between COUNT and the pick.
        let picked = match picked {
            Some(quote) => Some(quote),
            None => self.quotes.random_quote()?,
        };

        let Some(quote) = picked else {
            warn!(
                "event=quote_rotate module=rotation status=skipped reason=store_drained count={count}"
            );
            return Ok(None);
        };

        let today = self.clock.today_key();
        self.settings.save_rotation_state(quote.id, &today)?;
        info!(
            "event=quote_rotate module=rotation status=ok quote_id={} previous_id={} date={}",
            quote.id,
            current_id.map_or_else(|| "none".to_string(), |id| id.to_string()),
            today
        );
        Ok(Some(quote))
    }

    /// Returns today's quote, rotating only when the day changed or the
    /// persisted quote no longer resolves.
    ///
    /// | new day | current id      | action                     |
    /// |---------|-----------------|----------------------------|
    /// | yes     | any             | rotate                     |
    /// | no      | resolves        | return it, no writes       |
    /// | no      | dangling        | clear id, rotate           |
    /// | no      | unset           | rotate                     |
    pub fn rotate_if_needed(&self) -> RepoResult<Option<Quote>> {
        if self.should_rotate()? {
            return self.rotate();
        }

        match self.resolve_current()? {
            CurrentQuote::Valid(quote) => {
                debug!(
                    "event=quote_rotate module=rotation status=reused quote_id={}",
                    quote.id
                );
                Ok(Some(quote))
            }
            CurrentQuote::Dangling(id) => {
                warn!(
                    "event=quote_rotate module=rotation status=recovering reason=dangling_id quote_id={id}"
                );
                self.settings.clear_current_quote_id()?;
                self.rotate()
            }
            CurrentQuote::Unset => self.rotate(),
        }
    }

    /// Entry point for UI and background callers.
    ///
    /// Returns a quote whenever the store is non-empty, persisting rotation
    /// state as a side effect.
    pub fn daily_quote(&self) -> RepoResult<Option<Quote>> {
        self.rotate_if_needed()
    }

    fn resolve_current(&self) -> RepoResult<CurrentQuote> {
        let Some(id) = self.settings.current_quote_id()? else {
            return Ok(CurrentQuote::Unset);
        };
        Ok(match self.quotes.get_quote(id)? {
            Some(quote) => CurrentQuote::Valid(quote),
            None => CurrentQuote::Dangling(id),
        })
    }
}
