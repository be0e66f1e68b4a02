//! Settings repository: the key-value store behind rotation state and
//! wallpaper preferences.
//!
//! # Responsibility
//! - Provide raw `get/set/delete` over the `settings` table.
//! - Provide typed accessors for `currentQuoteId`, `lastQuoteDate` and
//!   `darkBackground`.
//!
//! # Invariants
//! - `currentQuoteId` and `lastQuoteDate` are written together by
//!   `save_rotation_state`, inside one transaction.
//! - Non-numeric `currentQuoteId` values read back as absent.
//! - Absent `darkBackground` means dark; only the literal `false` means light.

use crate::model::quote::QuoteId;
use crate::model::style::WallpaperStyle;
use crate::repo::guard::ensure_connection_ready;
use crate::repo::quote_repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Closed set of persisted setting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    DarkBackground,
    DarkMode,
    LastQuoteDate,
    CurrentQuoteId,
}

impl SettingKey {
    /// Stored key name. Must stay stable across releases.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DarkBackground => "darkBackground",
            Self::DarkMode => "darkMode",
            Self::LastQuoteDate => "lastQuoteDate",
            Self::CurrentQuoteId => "currentQuoteId",
        }
    }
}

/// Persisted rotation pair owned by the rotation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationState {
    pub current_quote_id: Option<QuoteId>,
    /// Local calendar date (`YYYY-MM-DD`) the current quote was chosen on.
    pub last_quote_date: Option<String>,
}

/// Key-value settings store.
pub trait SettingsRepository {
    fn get_setting(&self, key: SettingKey) -> RepoResult<Option<String>>;
    fn set_setting(&self, key: SettingKey, value: &str) -> RepoResult<()>;
    fn delete_setting(&self, key: SettingKey) -> RepoResult<()>;

    /// Persists the active quote id and its selection date as one update.
    fn save_rotation_state(&self, quote_id: QuoteId, date: &str) -> RepoResult<()>;

    fn current_quote_id(&self) -> RepoResult<Option<QuoteId>> {
        let value = self.get_setting(SettingKey::CurrentQuoteId)?;
        Ok(value.and_then(|raw| raw.trim().parse::<QuoteId>().ok()))
    }

    fn clear_current_quote_id(&self) -> RepoResult<()> {
        self.delete_setting(SettingKey::CurrentQuoteId)
    }

    fn last_quote_date(&self) -> RepoResult<Option<String>> {
        self.get_setting(SettingKey::LastQuoteDate)
    }

    fn rotation_state(&self) -> RepoResult<RotationState> {
        Ok(RotationState {
            current_quote_id: self.current_quote_id()?,
            last_quote_date: self.last_quote_date()?,
        })
    }

    fn wallpaper_style(&self) -> RepoResult<WallpaperStyle> {
        let value = self.get_setting(SettingKey::DarkBackground)?;
        Ok(WallpaperStyle::from_dark_background(
            value.as_deref() != Some("false"),
        ))
    }

    fn set_wallpaper_style(&self, style: WallpaperStyle) -> RepoResult<()> {
        let value = if style.is_dark() { "true" } else { "false" };
        self.set_setting(SettingKey::DarkBackground, value)
    }
}

impl<T: SettingsRepository + ?Sized> SettingsRepository for &T {
    fn get_setting(&self, key: SettingKey) -> RepoResult<Option<String>> {
        (**self).get_setting(key)
    }
    fn set_setting(&self, key: SettingKey, value: &str) -> RepoResult<()> {
        (**self).set_setting(key, value)
    }
    fn delete_setting(&self, key: SettingKey) -> RepoResult<()> {
        (**self).delete_setting(key)
    }
    fn save_rotation_state(&self, quote_id: QuoteId, date: &str) -> RepoResult<()> {
        (**self).save_rotation_state(quote_id, date)
    }
}

/// SQLite-backed settings repository.
pub struct SqliteSettingsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSettingsRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SettingsRepository for SqliteSettingsRepository<'_> {
    fn get_setting(&self, key: SettingKey) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    fn set_setting(&self, key: SettingKey, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2);",
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    fn delete_setting(&self, key: SettingKey) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1;", [key.as_str()])?;
        Ok(())
    }

    fn save_rotation_state(&self, quote_id: QuoteId, date: &str) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in [
            (SettingKey::CurrentQuoteId, quote_id.to_string()),
            (SettingKey::LastQuoteDate, date.to_string()),
        ] {
            tx.execute(
                "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2);",
                params![key.as_str(), value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
