mod support;

use quotewall_core::{CacheCoordinator, CacheError, WallpaperCache, WallpaperStyle};
use std::fs;
use support::{FakeQuoteStore, FileRenderer};

fn ids(quotes: &[quotewall_core::Quote]) -> Vec<i64> {
    quotes.iter().map(|quote| quote.id).collect()
}

#[test]
fn lookup_is_absent_until_generated_and_never_renders() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = FakeQuoteStore::with_ids(&[1]);
    let coordinator = CacheCoordinator::new(&quotes, WallpaperCache::new(dir.path().join("cache")));

    assert!(coordinator.lookup(1, WallpaperStyle::Dark).is_none());
    assert!(coordinator.lookup(1, WallpaperStyle::Dark).is_none());
    assert!(!dir.path().join("cache").exists());
}

#[test]
fn generate_missing_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = FakeQuoteStore::with_ids(&[1, 2, 3]);
    let renderer = FileRenderer::new(&dir.path().join("renders"));
    let coordinator = CacheCoordinator::new(&quotes, WallpaperCache::new(dir.path().join("cache")));

    assert_eq!(
        coordinator
            .generate_missing(WallpaperStyle::Dark, &renderer)
            .unwrap(),
        3
    );
    assert!(coordinator
        .find_missing(WallpaperStyle::Dark)
        .unwrap()
        .is_empty());
    assert_eq!(
        coordinator
            .generate_missing(WallpaperStyle::Dark, &renderer)
            .unwrap(),
        0
    );
    assert_eq!(renderer.render_count(), 3);

    let slot = coordinator.lookup(2, WallpaperStyle::Dark).unwrap();
    assert_eq!(fs::read_to_string(slot.path()).unwrap(), "2|dark");
}

#[test]
fn styles_are_cached_independently() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = FakeQuoteStore::with_ids(&[1, 2]);
    let renderer = FileRenderer::new(&dir.path().join("renders"));
    let coordinator = CacheCoordinator::new(&quotes, WallpaperCache::new(dir.path().join("cache")));

    coordinator
        .generate_missing(WallpaperStyle::Dark, &renderer)
        .unwrap();

    assert_eq!(
        ids(&coordinator.find_missing(WallpaperStyle::Light).unwrap()),
        vec![1, 2]
    );
    assert!(coordinator.lookup(1, WallpaperStyle::Light).is_none());
}

#[test]
fn renderer_failure_is_isolated_to_one_quote() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = FakeQuoteStore::with_ids(&[1, 2, 3]);
    let renderer = FileRenderer::new(&dir.path().join("renders")).failing_for(&[2]);
    let coordinator = CacheCoordinator::new(&quotes, WallpaperCache::new(dir.path().join("cache")));

    let generated = coordinator
        .generate_missing(WallpaperStyle::Light, &renderer)
        .unwrap();

    assert_eq!(generated, 2);
    assert_eq!(renderer.render_count(), 3);
    assert_eq!(
        ids(&coordinator.find_missing(WallpaperStyle::Light).unwrap()),
        vec![2]
    );

    let retry = FileRenderer::new(&dir.path().join("renders"));
    assert_eq!(
        coordinator
            .generate_missing(WallpaperStyle::Light, &retry)
            .unwrap(),
        1
    );
    assert_eq!(retry.render_count(), 1);
}

#[test]
fn invalidate_by_id_removes_only_that_quotes_slots() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = FakeQuoteStore::with_ids(&[1, 2, 10]);
    let renderer = FileRenderer::new(&dir.path().join("renders"));
    let coordinator = CacheCoordinator::new(&quotes, WallpaperCache::new(dir.path().join("cache")));
    for style in WallpaperStyle::ALL {
        coordinator.generate_missing(style, &renderer).unwrap();
    }

    assert_eq!(coordinator.invalidate(Some(1)).unwrap(), 2);

    for style in WallpaperStyle::ALL {
        assert!(coordinator.lookup(1, style).is_none());
        assert!(coordinator.lookup(2, style).is_some());
        assert!(coordinator.lookup(10, style).is_some());
    }
}

#[test]
fn invalidate_all_removes_every_slot() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = FakeQuoteStore::with_ids(&[1, 2]);
    let renderer = FileRenderer::new(&dir.path().join("renders"));
    let coordinator = CacheCoordinator::new(&quotes, WallpaperCache::new(dir.path().join("cache")));
    for style in WallpaperStyle::ALL {
        coordinator.generate_missing(style, &renderer).unwrap();
    }

    assert_eq!(coordinator.invalidate(None).unwrap(), 4);
    for style in WallpaperStyle::ALL {
        assert_eq!(coordinator.find_missing(style).unwrap().len(), 2);
    }
}

#[test]
fn store_rendered_copies_external_render_and_rejects_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = FakeQuoteStore::with_ids(&[4]);
    let coordinator = CacheCoordinator::new(&quotes, WallpaperCache::new(dir.path().join("cache")));
    let source = dir.path().join("capture.png");
    fs::write(&source, b"captured").unwrap();

    let slot = coordinator
        .store_rendered(4, WallpaperStyle::Dark, &source)
        .unwrap();
    assert_eq!(coordinator.lookup(4, WallpaperStyle::Dark), Some(slot.clone()));
    assert_eq!(fs::read(slot.path()).unwrap(), b"captured");

    let err = coordinator
        .store_rendered(4, WallpaperStyle::Light, &dir.path().join("gone.png"))
        .unwrap_err();
    assert!(matches!(err, CacheError::MissingSource(_)));
    assert!(coordinator.lookup(4, WallpaperStyle::Light).is_none());
}

#[test]
fn generate_missing_propagates_store_failure() {
    let dir = tempfile::tempdir().unwrap();
    let quotes = FakeQuoteStore::with_ids(&[1, 2]).failing_on("list_quotes");
    let renderer = FileRenderer::new(&dir.path().join("renders"));
    let coordinator = CacheCoordinator::new(&quotes, WallpaperCache::new(dir.path().join("cache")));

    assert!(coordinator
        .generate_missing(WallpaperStyle::Dark, &renderer)
        .is_err());
    assert_eq!(renderer.render_count(), 0);
    assert!(coordinator.find_missing(WallpaperStyle::Light).is_err());
}
