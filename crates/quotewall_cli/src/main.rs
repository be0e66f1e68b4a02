//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quotewall_core` linkage.
//! - Optionally print today's quote from a database path argument.

use quotewall_core::db::open_db;
use quotewall_core::{
    RotationService, SqliteQuoteRepository, SqliteSettingsRepository, SystemClock,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("quotewall_core ping={}", quotewall_core::ping());
    println!("quotewall_core version={}", quotewall_core::core_version());

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };
    match print_daily_quote(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("daily_quote failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_daily_quote(db_path: &str) -> Result<(), Box<dyn Error>> {
    let conn = open_db(db_path)?;
    let quotes = SqliteQuoteRepository::try_new(&conn)?;
    let settings = SqliteSettingsRepository::try_new(&conn)?;
    match RotationService::new(&quotes, &settings, SystemClock).daily_quote()? {
        Some(quote) => println!(
            "daily_quote id={} author={}",
            quote.id,
            quote.author.as_deref().unwrap_or("-")
        ),
        None => println!("daily_quote none"),
    }
    Ok(())
}
