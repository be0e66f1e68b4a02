//! Local calendar source for daily rotation.
//!
//! # Invariants
//! - Date keys are local calendar dates formatted `YYYY-MM-DD` with
//!   zero-padded month and day.

use chrono::{Local, NaiveDate};

/// Source of "today" for rotation decisions.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    /// Today's date key as persisted in `lastQuoteDate`.
    fn today_key(&self) -> String {
        date_key(self.today())
    }
}

/// Reads the device's local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date. Used by tests and by hosts replaying a day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Formats a calendar date as a `lastQuoteDate` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
