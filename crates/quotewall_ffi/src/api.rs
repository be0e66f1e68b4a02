//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Resolve database and wallpaper-cache locations for the host process.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - DB-backed functions are non-sync; Dart receives futures run on the FRB
//!   worker pool.
//! - Failures are reported through `ok + message` envelopes, never thrown.

use log::warn;
use quotewall_core::db::open_db;
use quotewall_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    parse_import_response, ping as ping_inner, ApplyError, CacheCoordinator, CacheRef, Category,
    CategoryId, CategoryRepository, DailyWallpaperJob, ImportService, JobOutcome,
    PreferenceService, Quote, QuoteDraft, QuoteId, QuoteService, RepoResult, RotationService,
    SettingsRepository, SqliteCategoryRepository, SqliteQuoteRepository,
    SqliteSettingsRepository, SystemClock, WallpaperApplier, WallpaperCache, WallpaperStyle,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "quotewall.sqlite3";
const WALLPAPER_DIR_NAME: &str = "quotewall_wallpapers";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static WALLPAPER_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Quote projection handed to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteItem {
    pub id: i64,
    pub text: String,
    pub author: Option<String>,
    pub category_ids: Vec<i64>,
    /// SQLite `CURRENT_TIMESTAMP` text.
    pub created_at: String,
}

impl From<Quote> for QuoteItem {
    fn from(quote: Quote) -> Self {
        Self {
            id: quote.id,
            text: quote.text,
            author: quote.author,
            category_ids: quote.category_ids,
            created_at: quote.created_at,
        }
    }
}

/// Response envelope for the home screen and widget refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyQuoteResponse {
    /// Whether the store could be read.
    pub ok: bool,
    /// Quote of the day; `None` when the store is empty.
    pub quote: Option<QuoteItem>,
    /// Cached wallpaper for the requested style, when already rendered.
    pub wallpaper_path: Option<String>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Response envelope for quotes still lacking a wallpaper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperMissingResponse {
    pub ok: bool,
    /// Quotes the shell should render, in store order.
    pub quotes: Vec<QuoteItem>,
    pub message: String,
}

/// Generic response envelope for wallpaper cache mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperActionResponse {
    pub ok: bool,
    /// Slot path after a successful store.
    pub path: Option<String>,
    /// Number of slot files removed by an invalidation.
    pub removed: u32,
    pub message: String,
}

impl WallpaperActionResponse {
    fn failure(message: String) -> Self {
        warn!("event=ffi_call module=ffi status=error op=wallpaper");
        Self {
            ok: false,
            path: None,
            removed: 0,
            message,
        }
    }
}

/// Response envelope for the background-style toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceResponse {
    pub ok: bool,
    /// `true` when the style changed and every wallpaper was invalidated.
    pub changed: bool,
    pub message: String,
}

/// Generic action response envelope for quote editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected quote, when the operation returns one.
    pub quote: Option<QuoteItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl QuoteActionResponse {
    fn success(message: impl Into<String>, quote: Option<QuoteItem>) -> Self {
        Self {
            ok: true,
            quote,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        warn!("event=ffi_call module=ffi status=error op=quote_edit");
        Self {
            ok: false,
            quote: None,
            message: message.into(),
        }
    }
}

/// Response envelope for bulk import of AI-parsed quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub ok: bool,
    pub created_ids: Vec<i64>,
    pub skipped_blank: u32,
    /// Lowercased category names with no matching category.
    pub unmatched_categories: Vec<String>,
    pub message: String,
}

/// Response envelope for quote listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteListResponse {
    pub ok: bool,
    /// Newest first.
    pub items: Vec<QuoteItem>,
    pub message: String,
}

/// Category projection handed to Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    pub id: i64,
    pub name: String,
}

impl From<Category> for CategoryItem {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// Response envelope for category listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListResponse {
    pub ok: bool,
    /// Sorted by name.
    pub items: Vec<CategoryItem>,
    pub message: String,
}

/// Generic action response envelope for category management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryActionResponse {
    pub ok: bool,
    /// Created category ID; `None` for rename and delete.
    pub category_id: Option<i64>,
    pub message: String,
}

impl CategoryActionResponse {
    fn from_result(op: &str, message: &str, result: Result<Option<CategoryId>, String>) -> Self {
        match result {
            Ok(category_id) => Self {
                ok: true,
                category_id,
                message: message.to_string(),
            },
            Err(err) => {
                warn!("event=ffi_call module=ffi status=error op={op}");
                Self {
                    ok: false,
                    category_id: None,
                    message: format!("{op} failed: {err}"),
                }
            }
        }
    }
}

/// Result of one unattended wallpaper tick, for the OS background-fetch
/// callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyJobResponse {
    /// `new_data|no_data|failed`.
    pub outcome: String,
    pub quote_id: Option<i64>,
    /// Cached wallpaper the host should set; present only for `new_data`.
    pub wallpaper_path: Option<String>,
}

impl DailyJobResponse {
    fn failed() -> Self {
        Self {
            outcome: "failed".to_string(),
            quote_id: None,
            wallpaper_path: None,
        }
    }
}

/// Applier that hands the cached image back to the host, which owns the
/// platform wallpaper call.
#[derive(Default)]
struct HandOffApplier {
    wallpaper: RefCell<Option<CacheRef>>,
}

impl WallpaperApplier for HandOffApplier {
    fn apply(&self, wallpaper: &CacheRef) -> Result<(), ApplyError> {
        *self.wallpaper.borrow_mut() = Some(wallpaper.clone());
        Ok(())
    }
}

/// Reads the persisted background preference.
///
/// # FFI contract
/// - Sync call, small DB read.
/// - Never panics; falls back to dark when the store is unreadable.
#[flutter_rust_bridge::frb(sync)]
pub fn dark_background() -> bool {
    dark_background_at(&resolve_db_path())
}

/// Returns today's quote, rotating when the day changed.
///
/// # FFI contract
/// - Async call, DB-backed execution; may persist rotation state.
/// - Never panics.
/// - `dark = None` uses the persisted background preference.
/// - `wallpaper_path` is set only when the slot for that style is cached.
pub fn daily_quote(dark: Option<bool>) -> DailyQuoteResponse {
    daily_quote_at(&resolve_db_path(), &resolve_wallpaper_dir(), dark)
}

/// Returns the cached wallpaper path for one quote, if present.
///
/// # FFI contract
/// - Async call, file-system existence check only; never renders.
/// - Never panics.
pub fn wallpaper_lookup(quote_id: i64, dark: bool) -> Option<String> {
    wallpaper_cache_at(&resolve_wallpaper_dir())
        .lookup(quote_id, WallpaperStyle::from_dark_background(dark))
        .map(|slot| slot.to_string())
}

/// Lists quotes without a cached wallpaper for the given style.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Never panics.
pub fn wallpaper_missing(dark: bool) -> WallpaperMissingResponse {
    wallpaper_missing_at(&resolve_db_path(), &resolve_wallpaper_dir(), dark)
}

/// Copies an image rendered by the shell into the quote's slot.
///
/// # FFI contract
/// - Async call, file-system write.
/// - Never panics; a missing source file is reported as failure.
pub fn wallpaper_store_rendered(
    quote_id: i64,
    dark: bool,
    source_path: String,
) -> WallpaperActionResponse {
    wallpaper_store_rendered_at(&resolve_wallpaper_dir(), quote_id, dark, &source_path)
}

/// Removes cached wallpapers for one quote, or all of them when
/// `quote_id` is `None`.
///
/// # FFI contract
/// - Async call, file-system write.
/// - Never panics.
pub fn wallpaper_invalidate(quote_id: Option<i64>) -> WallpaperActionResponse {
    wallpaper_invalidate_at(&resolve_db_path(), &resolve_wallpaper_dir(), quote_id)
}

/// Persists the background preference; a change invalidates every wallpaper.
///
/// # FFI contract
/// - Async call, DB-backed execution plus file-system cleanup.
/// - Never panics.
pub fn set_dark_background(dark: bool) -> PreferenceResponse {
    set_dark_background_at(&resolve_db_path(), &resolve_wallpaper_dir(), dark)
}

/// Creates a quote.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Never panics; blank text and unknown categories are reported as failure.
pub fn quote_create(
    text: String,
    author: Option<String>,
    category_ids: Vec<i64>,
) -> QuoteActionResponse {
    quote_create_at(
        &resolve_db_path(),
        &resolve_wallpaper_dir(),
        build_draft(text, author, category_ids),
    )
}

/// Replaces a quote's text, author and categories.
///
/// # FFI contract
/// - Async call, DB-backed execution; drops the quote's cached wallpapers.
/// - Never panics.
pub fn quote_update(
    quote_id: i64,
    text: String,
    author: Option<String>,
    category_ids: Vec<i64>,
) -> QuoteActionResponse {
    quote_update_at(
        &resolve_db_path(),
        &resolve_wallpaper_dir(),
        quote_id,
        build_draft(text, author, category_ids),
    )
}

/// Deletes a quote and its cached wallpapers.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Never panics.
pub fn quote_delete(quote_id: i64) -> QuoteActionResponse {
    match with_quote_service(&resolve_db_path(), &resolve_wallpaper_dir(), |service| {
        service.delete_quote(quote_id).map_err(|err| err.to_string())
    }) {
        Ok(()) => QuoteActionResponse::success("Quote deleted.", None),
        Err(err) => QuoteActionResponse::failure(format!("quote_delete failed: {err}")),
    }
}

/// Lists quotes, optionally limited to one category.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Never panics.
pub fn quote_list(category_id: Option<i64>) -> QuoteListResponse {
    quote_list_at(&resolve_db_path(), &resolve_wallpaper_dir(), category_id)
}

/// Lists categories by name.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Never panics.
pub fn category_list() -> CategoryListResponse {
    category_list_at(&resolve_db_path())
}

/// Creates a category.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Never panics; blank and duplicate names are reported as failure.
pub fn category_create(name: String) -> CategoryActionResponse {
    category_create_at(&resolve_db_path(), &name)
}

/// Renames a category.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Never panics.
pub fn category_rename(category_id: i64, name: String) -> CategoryActionResponse {
    category_rename_at(&resolve_db_path(), category_id, &name)
}

/// Deletes a category; its quotes stay and lose the link.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Never panics.
pub fn category_delete(category_id: i64) -> CategoryActionResponse {
    category_delete_at(&resolve_db_path(), category_id)
}

/// Runs the unattended daily wallpaper tick with the persisted style.
///
/// # FFI contract
/// - Async call, DB-backed execution; may persist rotation state.
/// - Never panics; store errors surface as `failed`.
/// - The host applies `wallpaper_path` when the outcome is `new_data`.
pub fn daily_wallpaper_job() -> DailyJobResponse {
    daily_wallpaper_job_at(&resolve_db_path(), &resolve_wallpaper_dir())
}

/// Stores quotes from the AI parsing worker's raw JSON response body.
///
/// # FFI contract
/// - Async call, DB-backed execution.
/// - Never panics; malformed JSON or a worker-side error is a failure.
/// - Callers render the new quotes via `wallpaper_missing`.
pub fn import_quotes(response_body: String) -> ImportResponse {
    import_quotes_at(&resolve_db_path(), &response_body)
}

fn dark_background_at(db_path: &Path) -> bool {
    let style = open_db(db_path)
        .map_err(|err| format!("DB open failed: {err}"))
        .and_then(|conn| {
            SqliteSettingsRepository::try_new(&conn)
                .and_then(|settings| settings.wallpaper_style())
                .map_err(|err| err.to_string())
        });
    match style {
        Ok(style) => style.is_dark(),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op=dark_background error={err}");
            WallpaperStyle::default().is_dark()
        }
    }
}

fn daily_quote_at(
    db_path: &Path,
    wallpaper_dir: &Path,
    dark: Option<bool>,
) -> DailyQuoteResponse {
    let result = open_db(db_path)
        .map_err(|err| format!("DB open failed: {err}"))
        .and_then(|conn| {
            let quotes = SqliteQuoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let settings =
                SqliteSettingsRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let style = match dark {
                Some(dark) => WallpaperStyle::from_dark_background(dark),
                None => settings.wallpaper_style().map_err(|err| err.to_string())?,
            };
            let quote = RotationService::new(&quotes, &settings, SystemClock)
                .daily_quote()
                .map_err(|err| err.to_string())?;
            Ok((quote, style))
        });

    match result {
        Ok((Some(quote), style)) => {
            let wallpaper_path = wallpaper_cache_at(wallpaper_dir)
                .lookup(quote.id, style)
                .map(|slot| slot.to_string());
            DailyQuoteResponse {
                ok: true,
                quote: Some(quote.into()),
                wallpaper_path,
                message: "Quote ready.".to_string(),
            }
        }
        Ok((None, _)) => DailyQuoteResponse {
            ok: true,
            quote: None,
            wallpaper_path: None,
            message: "No quotes yet.".to_string(),
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op=daily_quote");
            DailyQuoteResponse {
                ok: false,
                quote: None,
                wallpaper_path: None,
                message: format!("daily_quote failed: {err}"),
            }
        }
    }
}

fn wallpaper_missing_at(
    db_path: &Path,
    wallpaper_dir: &Path,
    dark: bool,
) -> WallpaperMissingResponse {
    let result = open_db(db_path)
        .map_err(|err| format!("DB open failed: {err}"))
        .and_then(|conn| {
            let quotes = SqliteQuoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
            CacheCoordinator::new(&quotes, wallpaper_cache_at(wallpaper_dir))
                .find_missing(WallpaperStyle::from_dark_background(dark))
                .map_err(|err| err.to_string())
        });

    match result {
        Ok(missing) => {
            let message = if missing.is_empty() {
                "All wallpapers cached.".to_string()
            } else {
                format!("{} wallpaper(s) missing.", missing.len())
            };
            WallpaperMissingResponse {
                ok: true,
                quotes: missing.into_iter().map(QuoteItem::from).collect(),
                message,
            }
        }
        Err(err) => WallpaperMissingResponse {
            ok: false,
            quotes: Vec::new(),
            message: format!("wallpaper_missing failed: {err}"),
        },
    }
}

fn wallpaper_store_rendered_at(
    wallpaper_dir: &Path,
    quote_id: QuoteId,
    dark: bool,
    source_path: &str,
) -> WallpaperActionResponse {
    let source = source_path.trim();
    if source.is_empty() {
        return WallpaperActionResponse::failure(
            "wallpaper_store_rendered failed: source path is empty".to_string(),
        );
    }

    match wallpaper_cache_at(wallpaper_dir).store(
        quote_id,
        WallpaperStyle::from_dark_background(dark),
        Path::new(source),
    ) {
        Ok(slot) => WallpaperActionResponse {
            ok: true,
            path: Some(slot.to_string()),
            removed: 0,
            message: "Wallpaper cached.".to_string(),
        },
        Err(err) => {
            WallpaperActionResponse::failure(format!("wallpaper_store_rendered failed: {err}"))
        }
    }
}

fn wallpaper_invalidate_at(
    db_path: &Path,
    wallpaper_dir: &Path,
    quote_id: Option<QuoteId>,
) -> WallpaperActionResponse {
    let result = open_db(db_path)
        .map_err(|err| format!("DB open failed: {err}"))
        .and_then(|conn| {
            let quotes = SqliteQuoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
            CacheCoordinator::new(&quotes, wallpaper_cache_at(wallpaper_dir))
                .invalidate(quote_id)
                .map_err(|err| err.to_string())
        });

    match result {
        Ok(removed) => WallpaperActionResponse {
            ok: true,
            path: None,
            removed: u32::try_from(removed).unwrap_or(u32::MAX),
            message: format!("Removed {removed} wallpaper(s)."),
        },
        Err(err) => WallpaperActionResponse::failure(format!("wallpaper_invalidate failed: {err}")),
    }
}

fn set_dark_background_at(db_path: &Path, wallpaper_dir: &Path, dark: bool) -> PreferenceResponse {
    let result = open_db(db_path)
        .map_err(|err| format!("DB open failed: {err}"))
        .and_then(|conn| {
            let settings =
                SqliteSettingsRepository::try_new(&conn).map_err(|err| err.to_string())?;
            PreferenceService::new(&settings, wallpaper_cache_at(wallpaper_dir))
                .set_wallpaper_style(WallpaperStyle::from_dark_background(dark))
                .map_err(|err| err.to_string())
        });

    match result {
        Ok(changed) => PreferenceResponse {
            ok: true,
            changed,
            message: if changed {
                "Background updated.".to_string()
            } else {
                "Background unchanged.".to_string()
            },
        },
        Err(err) => PreferenceResponse {
            ok: false,
            changed: false,
            message: format!("set_dark_background failed: {err}"),
        },
    }
}

fn daily_wallpaper_job_at(db_path: &Path, wallpaper_dir: &Path) -> DailyJobResponse {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op=daily_wallpaper_job error={err}");
            return DailyJobResponse::failed();
        }
    };
    let (quotes, settings) = match (
        SqliteQuoteRepository::try_new(&conn),
        SqliteSettingsRepository::try_new(&conn),
    ) {
        (Ok(quotes), Ok(settings)) => (quotes, settings),
        (Err(err), _) | (_, Err(err)) => {
            warn!("event=ffi_call module=ffi status=error op=daily_wallpaper_job error={err}");
            return DailyJobResponse::failed();
        }
    };

    let applier = HandOffApplier::default();
    let job = DailyWallpaperJob::new(
        &quotes,
        &settings,
        SystemClock,
        wallpaper_cache_at(wallpaper_dir),
    );
    match job.run(&applier) {
        JobOutcome::NewData { quote_id } => DailyJobResponse {
            outcome: "new_data".to_string(),
            quote_id: Some(quote_id),
            wallpaper_path: applier.wallpaper.take().map(|slot| slot.to_string()),
        },
        JobOutcome::NoData { quote_id } => DailyJobResponse {
            outcome: "no_data".to_string(),
            quote_id,
            wallpaper_path: None,
        },
        JobOutcome::Failed => DailyJobResponse::failed(),
    }
}

fn quote_create_at(
    db_path: &Path,
    wallpaper_dir: &Path,
    draft: QuoteDraft,
) -> QuoteActionResponse {
    match with_quote_service(db_path, wallpaper_dir, |service| {
        service.create_quote(&draft).map_err(|err| err.to_string())
    }) {
        Ok(quote) => QuoteActionResponse::success("Quote created.", Some(quote.into())),
        Err(err) => QuoteActionResponse::failure(format!("quote_create failed: {err}")),
    }
}

fn quote_list_at(
    db_path: &Path,
    wallpaper_dir: &Path,
    category_id: Option<CategoryId>,
) -> QuoteListResponse {
    let result = with_quote_service(db_path, wallpaper_dir, |service| {
        let quotes = match category_id {
            Some(id) => service.list_quotes_by_category(id),
            None => service.list_quotes(),
        };
        quotes.map_err(|err| err.to_string())
    });
    match result {
        Ok(quotes) => QuoteListResponse {
            ok: true,
            message: format!("Found {} quote(s).", quotes.len()),
            items: quotes.into_iter().map(QuoteItem::from).collect(),
        },
        Err(err) => QuoteListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("quote_list failed: {err}"),
        },
    }
}

fn category_list_at(db_path: &Path) -> CategoryListResponse {
    match with_category_repo(db_path, |repo| repo.list_categories()) {
        Ok(categories) => CategoryListResponse {
            ok: true,
            message: format!("Found {} category(ies).", categories.len()),
            items: categories.into_iter().map(CategoryItem::from).collect(),
        },
        Err(err) => CategoryListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("category_list failed: {err}"),
        },
    }
}

fn category_create_at(db_path: &Path, name: &str) -> CategoryActionResponse {
    CategoryActionResponse::from_result(
        "category_create",
        "Category created.",
        with_category_repo(db_path, |repo| repo.create_category(name).map(Some)),
    )
}

fn category_rename_at(
    db_path: &Path,
    category_id: CategoryId,
    name: &str,
) -> CategoryActionResponse {
    CategoryActionResponse::from_result(
        "category_rename",
        "Category renamed.",
        with_category_repo(db_path, |repo| {
            repo.rename_category(category_id, name).map(|()| None)
        }),
    )
}

fn category_delete_at(db_path: &Path, category_id: CategoryId) -> CategoryActionResponse {
    CategoryActionResponse::from_result(
        "category_delete",
        "Category deleted.",
        with_category_repo(db_path, |repo| {
            repo.delete_category(category_id).map(|()| None)
        }),
    )
}

fn quote_update_at(
    db_path: &Path,
    wallpaper_dir: &Path,
    quote_id: QuoteId,
    draft: QuoteDraft,
) -> QuoteActionResponse {
    match with_quote_service(db_path, wallpaper_dir, |service| {
        service
            .update_quote(quote_id, &draft)
            .map_err(|err| err.to_string())
    }) {
        Ok(quote) => QuoteActionResponse::success("Quote updated.", Some(quote.into())),
        Err(err) => QuoteActionResponse::failure(format!("quote_update failed: {err}")),
    }
}

fn import_quotes_at(db_path: &Path, response_body: &str) -> ImportResponse {
    let result = parse_import_response(response_body)
        .map_err(|err| err.to_string())
        .and_then(|parsed| {
            let conn = open_db(db_path).map_err(|err| format!("DB open failed: {err}"))?;
            let quotes = SqliteQuoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
            let categories =
                SqliteCategoryRepository::try_new(&conn).map_err(|err| err.to_string())?;
            ImportService::new(&quotes, &categories)
                .import_parsed_quotes(&parsed)
                .map_err(|err| err.to_string())
        });

    match result {
        Ok(summary) => ImportResponse {
            ok: true,
            message: format!("Imported {} quote(s).", summary.created.len()),
            created_ids: summary.created,
            skipped_blank: u32::try_from(summary.skipped_blank).unwrap_or(u32::MAX),
            unmatched_categories: summary.unmatched_categories,
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error op=import_quotes");
            ImportResponse {
                ok: false,
                created_ids: Vec::new(),
                skipped_blank: 0,
                unmatched_categories: Vec::new(),
                message: format!("import_quotes failed: {err}"),
            }
        }
    }
}

fn build_draft(text: String, author: Option<String>, category_ids: Vec<i64>) -> QuoteDraft {
    let mut draft = QuoteDraft::new(text).with_categories(category_ids);
    draft.author = author;
    draft
}

fn with_quote_service<T>(
    db_path: &Path,
    wallpaper_dir: &Path,
    f: impl FnOnce(&QuoteService<SqliteQuoteRepository<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("DB open failed: {err}"))?;
    let repo = SqliteQuoteRepository::try_new(&conn)
        .map_err(|err| format!("quote repo init failed: {err}"))?;
    let service = QuoteService::new(repo, wallpaper_cache_at(wallpaper_dir));
    f(&service)
}

fn with_category_repo<T>(
    db_path: &Path,
    f: impl FnOnce(&SqliteCategoryRepository<'_>) -> RepoResult<T>,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("DB open failed: {err}"))?;
    let repo = SqliteCategoryRepository::try_new(&conn)
        .map_err(|err| format!("category repo init failed: {err}"))?;
    f(&repo).map_err(|err| err.to_string())
}

fn wallpaper_cache_at(wallpaper_dir: &Path) -> WallpaperCache {
    WallpaperCache::new(wallpaper_dir)
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            env_path("QUOTEWALL_DB_PATH").unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
        })
        .clone()
}

fn resolve_wallpaper_dir() -> PathBuf {
    WALLPAPER_DIR
        .get_or_init(|| {
            env_path("QUOTEWALL_WALLPAPER_DIR")
                .unwrap_or_else(|| std::env::temp_dir().join(WALLPAPER_DIR_NAME))
        })
        .clone()
}

fn env_path(key: &str) -> Option<PathBuf> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
