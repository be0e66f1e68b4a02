use quotewall_core::db::open_db_in_memory;
use quotewall_core::{
    CategoryRepository, QuoteDraft, QuoteRepository, RepoError, SettingKey, SettingsRepository,
    SqliteCategoryRepository, SqliteQuoteRepository, SqliteSettingsRepository, WallpaperStyle,
};
use std::collections::HashSet;

#[test]
fn create_and_get_roundtrip_with_categories() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let quotes = SqliteQuoteRepository::try_new(&conn).unwrap();
    let stoic = categories.create_category("  Stoic ").unwrap();
    let work = categories.create_category("Work").unwrap();

    let id = quotes
        .create_quote(
            &QuoteDraft::new("  Waste no more time arguing.  ")
                .with_author("Marcus Aurelius")
                .with_categories([work, stoic, work]),
        )
        .unwrap();

    let loaded = quotes.get_quote(id).unwrap().unwrap();
    assert_eq!(loaded.text, "Waste no more time arguing.");
    assert_eq!(loaded.author.as_deref(), Some("Marcus Aurelius"));
    let mut expected = vec![stoic, work];
    expected.sort_unstable();
    assert_eq!(loaded.category_ids, expected);
    assert!(!loaded.created_at.is_empty());
}

#[test]
fn create_rejects_blank_text_and_unknown_category() {
    let conn = open_db_in_memory().unwrap();
    let quotes = SqliteQuoteRepository::try_new(&conn).unwrap();

    let blank = quotes.create_quote(&QuoteDraft::new("  ")).unwrap_err();
    assert!(matches!(blank, RepoError::Validation(_)));

    let unknown = quotes
        .create_quote(&QuoteDraft::new("text").with_categories([42]))
        .unwrap_err();
    assert!(matches!(unknown, RepoError::CategoryNotFound(42)));
    assert_eq!(quotes.count_quotes().unwrap(), 0);
}

#[test]
fn update_and_delete_report_missing_quotes() {
    let conn = open_db_in_memory().unwrap();
    let quotes = SqliteQuoteRepository::try_new(&conn).unwrap();

    let err = quotes.update_quote(5, &QuoteDraft::new("x")).unwrap_err();
    assert!(matches!(err, RepoError::QuoteNotFound(5)));
    let err = quotes.delete_quote(5).unwrap_err();
    assert!(matches!(err, RepoError::QuoteNotFound(5)));
}

#[test]
fn update_replaces_text_and_category_links() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let quotes = SqliteQuoteRepository::try_new(&conn).unwrap();
    let first = categories.create_category("First").unwrap();
    let second = categories.create_category("Second").unwrap();
    let id = quotes
        .create_quote(&QuoteDraft::new("draft").with_categories([first]))
        .unwrap();

    quotes
        .update_quote(id, &QuoteDraft::new("final").with_categories([second]))
        .unwrap();

    let loaded = quotes.get_quote(id).unwrap().unwrap();
    assert_eq!(loaded.text, "final");
    assert_eq!(loaded.author, None);
    assert_eq!(loaded.category_ids, vec![second]);
    assert!(quotes.list_quotes_by_category(first).unwrap().is_empty());
}

#[test]
fn random_excluding_prefers_others_and_falls_back_to_excluded() {
    let conn = open_db_in_memory().unwrap();
    let quotes = SqliteQuoteRepository::try_new(&conn).unwrap();
    let only = quotes.create_quote(&QuoteDraft::new("only")).unwrap();

    let fallback = quotes.random_quote_excluding(only).unwrap().unwrap();
    assert_eq!(fallback.id, only);

    let other = quotes.create_quote(&QuoteDraft::new("other")).unwrap();
    for _ in 0..20 {
        let picked = quotes.random_quote_excluding(only).unwrap().unwrap();
        assert_eq!(picked.id, other);
    }
}

#[test]
fn random_on_empty_store_is_none() {
    let conn = open_db_in_memory().unwrap();
    let quotes = SqliteQuoteRepository::try_new(&conn).unwrap();

    assert!(quotes.random_quote().unwrap().is_none());
    assert!(quotes.random_quote_excluding(1).unwrap().is_none());
}

#[test]
fn list_quotes_returns_every_quote() {
    let conn = open_db_in_memory().unwrap();
    let quotes = SqliteQuoteRepository::try_new(&conn).unwrap();
    let ids: HashSet<_> = ["a", "b", "c"]
        .into_iter()
        .map(|text| quotes.create_quote(&QuoteDraft::new(text)).unwrap())
        .collect();

    let listed: HashSet<_> = quotes
        .list_quotes()
        .unwrap()
        .into_iter()
        .map(|quote| quote.id)
        .collect();
    assert_eq!(listed, ids);
    assert_eq!(quotes.count_quotes().unwrap(), 3);
}

#[test]
fn deleting_category_keeps_quotes_and_drops_links() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let quotes = SqliteQuoteRepository::try_new(&conn).unwrap();
    let category = categories.create_category("Temporary").unwrap();
    let id = quotes
        .create_quote(&QuoteDraft::new("survivor").with_categories([category]))
        .unwrap();

    categories.delete_category(category).unwrap();

    let loaded = quotes.get_quote(id).unwrap().unwrap();
    assert!(loaded.category_ids.is_empty());
    assert!(matches!(
        categories.delete_category(category),
        Err(RepoError::CategoryNotFound(_))
    ));
}

#[test]
fn category_names_are_trimmed_unique_and_matched_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();

    let id = categories.create_category(" Focus ").unwrap();
    assert_eq!(categories.get_category(id).unwrap().unwrap().name, "Focus");
    assert!(categories.category_exists("FOCUS").unwrap());
    assert!(!categories.category_exists("calm").unwrap());
    assert!(categories.create_category("Focus").is_err());
    assert!(matches!(
        categories.create_category("   "),
        Err(RepoError::InvalidCategoryName(_))
    ));

    categories.rename_category(id, "Deep Focus").unwrap();
    categories.create_category("Calm").unwrap();
    let names: Vec<_> = categories
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["Calm", "Deep Focus"]);
}

#[test]
fn settings_roundtrip_and_typed_accessors() {
    let conn = open_db_in_memory().unwrap();
    let settings = SqliteSettingsRepository::try_new(&conn).unwrap();

    assert_eq!(settings.get_setting(SettingKey::DarkMode).unwrap(), None);
    settings.set_setting(SettingKey::DarkMode, "true").unwrap();
    settings.set_setting(SettingKey::DarkMode, "false").unwrap();
    assert_eq!(
        settings.get_setting(SettingKey::DarkMode).unwrap().as_deref(),
        Some("false")
    );
    settings.delete_setting(SettingKey::DarkMode).unwrap();
    assert_eq!(settings.get_setting(SettingKey::DarkMode).unwrap(), None);

    settings
        .set_setting(SettingKey::CurrentQuoteId, "not-a-number")
        .unwrap();
    assert_eq!(settings.current_quote_id().unwrap(), None);
}

#[test]
fn rotation_state_is_saved_as_a_pair_and_cleared_by_id() {
    let conn = open_db_in_memory().unwrap();
    let settings = SqliteSettingsRepository::try_new(&conn).unwrap();

    settings.save_rotation_state(12, "2025-06-01").unwrap();
    let state = settings.rotation_state().unwrap();
    assert_eq!(state.current_quote_id, Some(12));
    assert_eq!(state.last_quote_date.as_deref(), Some("2025-06-01"));

    settings.clear_current_quote_id().unwrap();
    let state = settings.rotation_state().unwrap();
    assert_eq!(state.current_quote_id, None);
    assert_eq!(state.last_quote_date.as_deref(), Some("2025-06-01"));
}

#[test]
fn wallpaper_style_defaults_to_dark() {
    let conn = open_db_in_memory().unwrap();
    let settings = SqliteSettingsRepository::try_new(&conn).unwrap();

    assert_eq!(settings.wallpaper_style().unwrap(), WallpaperStyle::Dark);
    settings.set_wallpaper_style(WallpaperStyle::Light).unwrap();
    assert_eq!(settings.wallpaper_style().unwrap(), WallpaperStyle::Light);
    assert_eq!(
        settings
            .get_setting(SettingKey::DarkBackground)
            .unwrap()
            .as_deref(),
        Some("false")
    );
}
