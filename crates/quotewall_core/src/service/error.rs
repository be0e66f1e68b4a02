//! Service-level error shared by editing and preference use-cases.

use crate::cache::wallpaper_cache::CacheError;
use crate::repo::quote_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a use-case that touches both the store and the cache.
#[derive(Debug)]
pub enum ServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Store write succeeded but stale slots could not be removed.
    Cache(CacheError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Cache(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Cache(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CacheError> for ServiceError {
    fn from(value: CacheError) -> Self {
        Self::Cache(value)
    }
}
