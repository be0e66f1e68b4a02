//! In-memory fakes shared by integration tests.

#![allow(dead_code)]

use quotewall_core::{
    CategoryId, Quote, QuoteDraft, QuoteId, QuoteRepository, RenderError, RepoError, RepoResult,
    SettingKey, SettingsRepository, WallpaperRenderer, WallpaperStyle,
};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

pub fn quote(id: QuoteId, text: &str) -> Quote {
    Quote {
        id,
        text: text.to_string(),
        author: None,
        category_ids: Vec::new(),
        created_at: "2025-01-01 00:00:00".to_string(),
    }
}

/// Deterministic quote store: "random" picks return the lowest eligible id.
#[derive(Default)]
pub struct FakeQuoteStore {
    quotes: RefCell<BTreeMap<QuoteId, Quote>>,
    calls: RefCell<Vec<String>>,
    next_id: Cell<QuoteId>,
    failing: HashSet<&'static str>,
}

fn injected(op: &str) -> RepoError {
    RepoError::InvalidData(format!("injected {op} failure"))
}

impl FakeQuoteStore {
    pub fn with_ids(ids: &[QuoteId]) -> Self {
        let store = Self::default();
        for id in ids {
            store
                .quotes
                .borrow_mut()
                .insert(*id, quote(*id, &format!("Quote {id}")));
            store.next_id.set(store.next_id.get().max(*id));
        }
        store
    }

    /// Makes the named read (`count_quotes`, `list_quotes`, ...) return `Err`.
    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn remove(&self, id: QuoteId) {
        self.quotes.borrow_mut().remove(&id);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls.borrow().iter().any(|call| call == name)
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, op: &'static str) -> RepoResult<()> {
        if self.failing.contains(op) {
            return Err(injected(op));
        }
        Ok(())
    }
}

impl QuoteRepository for FakeQuoteStore {
    fn count_quotes(&self) -> RepoResult<u64> {
        self.record("count_quotes".to_string());
        self.check("count_quotes")?;
        Ok(self.quotes.borrow().len() as u64)
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>> {
        self.record(format!("get_quote({id})"));
        self.check("get_quote")?;
        Ok(self.quotes.borrow().get(&id).cloned())
    }

    fn random_quote(&self) -> RepoResult<Option<Quote>> {
        self.record("random_quote".to_string());
        self.check("random_quote")?;
        Ok(self.quotes.borrow().values().next().cloned())
    }

    fn random_quote_excluding(&self, exclude_id: QuoteId) -> RepoResult<Option<Quote>> {
        self.record(format!("random_quote_excluding({exclude_id})"));
        self.check("random_quote_excluding")?;
        let quotes = self.quotes.borrow();
        let other = quotes.values().find(|quote| quote.id != exclude_id).cloned();
        Ok(other.or_else(|| quotes.get(&exclude_id).cloned()))
    }

    fn list_quotes(&self) -> RepoResult<Vec<Quote>> {
        self.record("list_quotes".to_string());
        self.check("list_quotes")?;
        Ok(self.quotes.borrow().values().cloned().collect())
    }

    fn list_quotes_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Quote>> {
        Ok(self
            .quotes
            .borrow()
            .values()
            .filter(|quote| quote.category_ids.contains(&category_id))
            .cloned()
            .collect())
    }

    fn create_quote(&self, draft: &QuoteDraft) -> RepoResult<QuoteId> {
        draft.validate()?;
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let mut created = quote(id, draft.text.trim());
        created.author = draft.author.clone();
        created.category_ids = draft.category_ids.clone();
        self.quotes.borrow_mut().insert(id, created);
        Ok(id)
    }

    fn update_quote(&self, id: QuoteId, draft: &QuoteDraft) -> RepoResult<()> {
        draft.validate()?;
        let mut quotes = self.quotes.borrow_mut();
        let existing = quotes.get_mut(&id).ok_or(RepoError::QuoteNotFound(id))?;
        existing.text = draft.text.clone();
        existing.author = draft.author.clone();
        Ok(())
    }

    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        self.quotes
            .borrow_mut()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::QuoteNotFound(id))
    }
}

/// Settings store that counts every mutation.
#[derive(Default)]
pub struct FakeSettings {
    values: RefCell<HashMap<SettingKey, String>>,
    writes: Cell<usize>,
    fail_writes: bool,
}

impl FakeSettings {
    pub fn with_rotation(quote_id: Option<QuoteId>, date: Option<&str>) -> Self {
        let settings = Self::default();
        if let Some(id) = quote_id {
            settings
                .values
                .borrow_mut()
                .insert(SettingKey::CurrentQuoteId, id.to_string());
        }
        if let Some(date) = date {
            settings
                .values
                .borrow_mut()
                .insert(SettingKey::LastQuoteDate, date.to_string());
        }
        settings
    }

    /// Makes every mutation return `Err` without touching stored values.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn raw(&self, key: SettingKey) -> Option<String> {
        self.values.borrow().get(&key).cloned()
    }

    fn begin_write(&self, op: &str) -> RepoResult<()> {
        if self.fail_writes {
            return Err(injected(op));
        }
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl SettingsRepository for FakeSettings {
    fn get_setting(&self, key: SettingKey) -> RepoResult<Option<String>> {
        Ok(self.values.borrow().get(&key).cloned())
    }

    fn set_setting(&self, key: SettingKey, value: &str) -> RepoResult<()> {
        self.begin_write("set_setting")?;
        self.values.borrow_mut().insert(key, value.to_string());
        Ok(())
    }

    fn delete_setting(&self, key: SettingKey) -> RepoResult<()> {
        self.begin_write("delete_setting")?;
        self.values.borrow_mut().remove(&key);
        Ok(())
    }

    fn save_rotation_state(&self, quote_id: QuoteId, date: &str) -> RepoResult<()> {
        self.begin_write("save_rotation_state")?;
        let mut values = self.values.borrow_mut();
        values.insert(SettingKey::CurrentQuoteId, quote_id.to_string());
        values.insert(SettingKey::LastQuoteDate, date.to_string());
        Ok(())
    }
}

/// Renderer writing a small file per call, optionally failing for some ids.
pub struct FileRenderer {
    out_dir: PathBuf,
    fail_ids: HashSet<QuoteId>,
    rendered: RefCell<Vec<(QuoteId, WallpaperStyle)>>,
}

impl FileRenderer {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
            fail_ids: HashSet::new(),
            rendered: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_for(mut self, ids: &[QuoteId]) -> Self {
        self.fail_ids = ids.iter().copied().collect();
        self
    }

    pub fn render_count(&self) -> usize {
        self.rendered.borrow().len()
    }
}

impl WallpaperRenderer for FileRenderer {
    fn render(&self, quote: &Quote, style: WallpaperStyle) -> Result<PathBuf, RenderError> {
        self.rendered.borrow_mut().push((quote.id, style));
        if self.fail_ids.contains(&quote.id) {
            return Err(RenderError::new(format!("capture failed for {}", quote.id)));
        }
        std::fs::create_dir_all(&self.out_dir).map_err(|err| RenderError::new(err.to_string()))?;
        let path = self
            .out_dir
            .join(format!("render_{}_{}.png", quote.id, style.as_str()));
        std::fs::write(&path, format!("{}|{}", quote.id, style.as_str()))
            .map_err(|err| RenderError::new(err.to_string()))?;
        Ok(path)
    }
}
