//! Quote repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the quote store consumed by rotation and cache coordination.
//! - Own quote/category link replacement with atomic semantics.
//!
//! # Invariants
//! - Write paths must call `QuoteDraft::validate()` before SQL mutations.
//! - `random_quote_excluding` never returns `None` while the excluded quote
//!   itself still exists.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::category::CategoryId;
use crate::model::quote::{Quote, QuoteDraft, QuoteId, QuoteValidationError};
use crate::repo::guard::ensure_connection_ready;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};

const QUOTE_SELECT_SQL: &str = "SELECT
    q.id,
    q.text,
    q.author,
    q.created_at,
    (
        SELECT GROUP_CONCAT(qc.category_id)
        FROM quote_categories qc
        WHERE qc.quote_id = q.id
    ) AS category_ids
FROM quotes q";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for quote, category and settings persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(QuoteValidationError),
    Db(DbError),
    QuoteNotFound(QuoteId),
    CategoryNotFound(CategoryId),
    InvalidCategoryName(String),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::QuoteNotFound(id) => write!(f, "quote not found: {id}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::InvalidCategoryName(name) => write!(f, "invalid category name: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<QuoteValidationError> for RepoError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Quote store consumed by the rotation engine and cache coordinator.
pub trait QuoteRepository {
    fn count_quotes(&self) -> RepoResult<u64>;
    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>>;
    /// Picks one quote uniformly at random.
    fn random_quote(&self) -> RepoResult<Option<Quote>>;
    /// Picks a random quote other than `exclude_id`, falling back to the
    /// excluded quote when it is the only one left.
    fn random_quote_excluding(&self, exclude_id: QuoteId) -> RepoResult<Option<Quote>>;
    /// Lists every quote, newest first.
    fn list_quotes(&self) -> RepoResult<Vec<Quote>>;
    fn list_quotes_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Quote>>;
    fn create_quote(&self, draft: &QuoteDraft) -> RepoResult<QuoteId>;
    fn update_quote(&self, id: QuoteId, draft: &QuoteDraft) -> RepoResult<()>;
    fn delete_quote(&self, id: QuoteId) -> RepoResult<()>;
}

impl<T: QuoteRepository + ?Sized> QuoteRepository for &T {
    fn count_quotes(&self) -> RepoResult<u64> {
        (**self).count_quotes()
    }
    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>> {
        (**self).get_quote(id)
    }
    fn random_quote(&self) -> RepoResult<Option<Quote>> {
        (**self).random_quote()
    }
    fn random_quote_excluding(&self, exclude_id: QuoteId) -> RepoResult<Option<Quote>> {
        (**self).random_quote_excluding(exclude_id)
    }
    fn list_quotes(&self) -> RepoResult<Vec<Quote>> {
        (**self).list_quotes()
    }
    fn list_quotes_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Quote>> {
        (**self).list_quotes_by_category(category_id)
    }
    fn create_quote(&self, draft: &QuoteDraft) -> RepoResult<QuoteId> {
        (**self).create_quote(draft)
    }
    fn update_quote(&self, id: QuoteId, draft: &QuoteDraft) -> RepoResult<()> {
        (**self).update_quote(id, draft)
    }
    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        (**self).delete_quote(id)
    }
}

/// SQLite-backed quote repository.
pub struct SqliteQuoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl QuoteRepository for SqliteQuoteRepository<'_> {
    fn count_quotes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quotes;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative quote count `{count}`")))
    }

    fn get_quote(&self, id: QuoteId) -> RepoResult<Option<Quote>> {
        query_one(
            self.conn,
            &format!("{QUOTE_SELECT_SQL} WHERE q.id = ?1;"),
            params![id],
        )
    }

    fn random_quote(&self) -> RepoResult<Option<Quote>> {
        query_one(
            self.conn,
            &format!("{QUOTE_SELECT_SQL} ORDER BY RANDOM() LIMIT 1;"),
            [],
        )
    }

    fn random_quote_excluding(&self, exclude_id: QuoteId) -> RepoResult<Option<Quote>> {
        let other = query_one(
            self.conn,
            &format!("{QUOTE_SELECT_SQL} WHERE q.id != ?1 ORDER BY RANDOM() LIMIT 1;"),
            params![exclude_id],
        )?;
        match other {
            Some(quote) => Ok(Some(quote)),
            None => self.get_quote(exclude_id),
        }
    }

    fn list_quotes(&self) -> RepoResult<Vec<Quote>> {
        query_many(
            self.conn,
            &format!("{QUOTE_SELECT_SQL} ORDER BY q.created_at DESC, q.id DESC;"),
            [],
        )
    }

    fn list_quotes_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Quote>> {
        query_many(
            self.conn,
            &format!(
                "{QUOTE_SELECT_SQL}
                 WHERE EXISTS (
                    SELECT 1
                    FROM quote_categories qc
                    WHERE qc.quote_id = q.id AND qc.category_id = ?1
                 )
                 ORDER BY q.created_at DESC, q.id DESC;"
            ),
            params![category_id],
        )
    }

    fn create_quote(&self, draft: &QuoteDraft) -> RepoResult<QuoteId> {
        draft.validate()?;
        let draft = draft.normalized();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO quotes (text, author) VALUES (?1, ?2);",
            params![draft.text.as_str(), draft.author.as_deref()],
        )?;
        let id = tx.last_insert_rowid();
        replace_category_links(&tx, id, &draft.category_ids)?;
        tx.commit()?;

        Ok(id)
    }

    fn update_quote(&self, id: QuoteId, draft: &QuoteDraft) -> RepoResult<()> {
        draft.validate()?;
        let draft = draft.normalized();

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE quotes SET text = ?1, author = ?2 WHERE id = ?3;",
            params![draft.text.as_str(), draft.author.as_deref(), id],
        )?;
        if changed == 0 {
            return Err(RepoError::QuoteNotFound(id));
        }
        replace_category_links(&tx, id, &draft.category_ids)?;
        tx.commit()?;

        Ok(())
    }

    fn delete_quote(&self, id: QuoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM quotes WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::QuoteNotFound(id));
        }
        Ok(())
    }
}

fn replace_category_links(
    tx: &Transaction<'_>,
    quote_id: QuoteId,
    category_ids: &[CategoryId],
) -> RepoResult<()> {
    tx.execute(
        "DELETE FROM quote_categories WHERE quote_id = ?1;",
        params![quote_id],
    )?;
    for category_id in category_ids {
        let exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1);",
            params![category_id],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::CategoryNotFound(*category_id));
        }
        tx.execute(
            "INSERT INTO quote_categories (quote_id, category_id) VALUES (?1, ?2);",
            params![quote_id, category_id],
        )?;
    }
    Ok(())
}

fn query_one(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Option<Quote>> {
    let mut stmt = conn.prepare(sql)?;
    let raw = stmt.query_row(params, RawQuote::from_row).optional()?;
    raw.map(RawQuote::into_quote).transpose()
}

fn query_many(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Vec<Quote>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut quotes = Vec::new();
    while let Some(row) = rows.next()? {
        quotes.push(RawQuote::from_row(row)?.into_quote()?);
    }
    Ok(quotes)
}

struct RawQuote {
    id: QuoteId,
    text: String,
    author: Option<String>,
    created_at: String,
    category_ids: Option<String>,
}

impl RawQuote {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            text: row.get("text")?,
            author: row.get("author")?,
            created_at: row.get("created_at")?,
            category_ids: row.get("category_ids")?,
        })
    }

    fn into_quote(self) -> RepoResult<Quote> {
        if self.text.trim().is_empty() {
            return Err(RepoError::InvalidData(format!(
                "blank text in quotes.text for id {}",
                self.id
            )));
        }

        let category_ids = parse_category_ids(self.category_ids.as_deref())?;
        Ok(Quote {
            id: self.id,
            text: self.text,
            author: self.author,
            category_ids,
            created_at: self.created_at,
        })
    }
}

fn parse_category_ids(value: Option<&str>) -> RepoResult<Vec<CategoryId>> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };

    let mut ids = value
        .split(',')
        .map(|item| {
            item.trim().parse::<CategoryId>().map_err(|_| {
                RepoError::InvalidData(format!(
                    "invalid category id `{item}` in quote_categories.category_id"
                ))
            })
        })
        .collect::<RepoResult<Vec<_>>>()?;
    ids.sort_unstable();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::parse_category_ids;

    #[test]
    fn parse_category_ids_sorts_group_concat_output() {
        assert_eq!(parse_category_ids(Some("7,2,5")).unwrap(), vec![2, 5, 7]);
        assert!(parse_category_ids(None).unwrap().is_empty());
    }

    #[test]
    fn parse_category_ids_rejects_garbage() {
        assert!(parse_category_ids(Some("1,x")).is_err());
    }
}
