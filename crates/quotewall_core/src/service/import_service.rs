//! Bulk import of quotes parsed by the remote AI worker.
//!
//! # Responsibility
//! - Build the worker request body and decode its response.
//! - Persist parsed quotes, linking only categories that already exist.
//!
//! # Invariants
//! - Category names match case-insensitively after trimming; unknown names
//!   are reported, never created.
//! - Blank parsed texts are skipped, not stored.
//! - Quotes are created one by one; a store error stops the import and
//!   earlier quotes stay persisted.

use crate::model::category::CategoryId;
use crate::model::quote::{QuoteDraft, QuoteId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::quote_repo::{QuoteRepository, RepoError};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request body sent to the parsing worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub text: String,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// One quote as returned by the parsing worker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParsedQuote {
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    quotes: Vec<ParsedQuote>,
    #[serde(default)]
    error: Option<String>,
}

/// Import failure.
#[derive(Debug)]
pub enum ImportError {
    /// Request or response body is not the expected JSON shape.
    Json(serde_json::Error),
    /// Worker reported an error in its response.
    Remote(String),
    Repo(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "import payload is not valid JSON: {err}"),
            Self::Remote(message) => write!(f, "import worker error: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Remote(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of one bulk import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Ids of created quotes, in input order.
    pub created: Vec<QuoteId>,
    /// Inputs dropped for blank text.
    pub skipped_blank: usize,
    /// Distinct category names (lowercased) that matched nothing.
    pub unmatched_categories: Vec<String>,
}

/// Serializes the worker request for `text`, offering the known category
/// names so the worker can tag quotes with them.
pub fn build_import_request(
    text: &str,
    category_names: Vec<String>,
    api_key: Option<String>,
) -> Result<String, ImportError> {
    let request = ImportRequest {
        text: text.to_string(),
        categories: category_names,
        api_key: api_key.filter(|key| !key.trim().is_empty()),
    };
    serde_json::to_string(&request).map_err(ImportError::Json)
}

/// Decodes the worker response body.
pub fn parse_import_response(body: &str) -> Result<Vec<ParsedQuote>, ImportError> {
    let response: ParseResponse = serde_json::from_str(body).map_err(ImportError::Json)?;
    if let Some(message) = response.error.filter(|message| !message.trim().is_empty()) {
        return Err(ImportError::Remote(message));
    }
    Ok(response.quotes)
}

/// Persists parsed quotes through the quote and category stores.
pub struct ImportService<Q: QuoteRepository, C: CategoryRepository> {
    quotes: Q,
    categories: C,
}

impl<Q: QuoteRepository, C: CategoryRepository> ImportService<Q, C> {
    pub fn new(quotes: Q, categories: C) -> Self {
        Self { quotes, categories }
    }

    /// Stores every non-blank parsed quote.
    ///
    /// Callers should follow up with `CacheCoordinator::generate_missing`
    /// so the new quotes get wallpapers.
    pub fn import_parsed_quotes(
        &self,
        parsed: &[ParsedQuote],
    ) -> Result<ImportSummary, ImportError> {
        let by_name: HashMap<String, CategoryId> = self
            .categories
            .list_categories()?
            .into_iter()
            .map(|category| (category.name.trim().to_lowercase(), category.id))
            .collect();

        let mut summary = ImportSummary::default();
        let mut unmatched = BTreeSet::new();

        for item in parsed {
            if item.text.trim().is_empty() {
                summary.skipped_blank += 1;
                continue;
            }

            let mut category_ids = Vec::new();
            for name in &item.categories {
                let key = name.trim().to_lowercase();
                if key.is_empty() {
                    continue;
                }
                match by_name.get(&key) {
                    Some(id) => category_ids.push(*id),
                    None => {
                        unmatched.insert(key);
                    }
                }
            }

            let mut draft = QuoteDraft::new(item.text.as_str()).with_categories(category_ids);
            draft.author = item.author.clone();
            summary.created.push(self.quotes.create_quote(&draft)?);
        }

        summary.unmatched_categories = unmatched.into_iter().collect();
        info!(
            "event=quote_import module=import status=ok received={} created={} skipped_blank={} unmatched_categories={}",
            parsed.len(),
            summary.created.len(),
            summary.skipped_blank,
            summary.unmatched_categories.len()
        );
        Ok(summary)
    }
}
