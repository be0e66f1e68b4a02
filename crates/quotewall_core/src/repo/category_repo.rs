//! Category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide category CRUD for quote grouping and bulk-import matching.
//!
//! # Invariants
//! - Names are stored trimmed and must not be blank.
//! - Deleting a category removes its quote links, never the quotes.

use crate::model::category::{Category, CategoryId};
use crate::repo::guard::ensure_connection_ready;
use crate::repo::quote_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for category operations.
pub trait CategoryRepository {
    /// Lists categories sorted by name.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    fn create_category(&self, name: &str) -> RepoResult<CategoryId>;
    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()>;
    fn delete_category(&self, id: CategoryId) -> RepoResult<()>;
    /// Case-insensitive name lookup.
    fn category_exists(&self, name: &str) -> RepoResult<bool>;
}

impl<T: CategoryRepository + ?Sized> CategoryRepository for &T {
    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        (**self).list_categories()
    }
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        (**self).get_category(id)
    }
    fn create_category(&self, name: &str) -> RepoResult<CategoryId> {
        (**self).create_category(name)
    }
    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()> {
        (**self).rename_category(id, name)
    }
    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        (**self).delete_category(id)
    }
    fn category_exists(&self, name: &str) -> RepoResult<bool> {
        (**self).category_exists(name)
    }
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY name ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(Category {
                id: row.get("id")?,
                name: row.get("name")?,
            });
        }
        Ok(categories)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1;",
                params![id],
                |row| {
                    Ok(Category {
                        id: row.get("id")?,
                        name: row.get("name")?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    fn create_category(&self, name: &str) -> RepoResult<CategoryId> {
        let name = normalize_category_name(name)?;
        self.conn
            .execute("INSERT INTO categories (name) VALUES (?1);", [name])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<()> {
        let name = normalize_category_name(name)?;
        let changed = self.conn.execute(
            "UPDATE categories SET name = ?1 WHERE id = ?2;",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }
        Ok(())
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::CategoryNotFound(id));
        }
        Ok(())
    }

    fn category_exists(&self, name: &str) -> RepoResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE LOWER(name) = LOWER(?1);",
            [name.trim()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

/// Trims a category name, rejecting blank input.
pub fn normalize_category_name(name: &str) -> RepoResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidCategoryName(name.to_string()));
    }
    Ok(trimmed)
}
