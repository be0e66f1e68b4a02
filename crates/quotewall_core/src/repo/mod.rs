//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the quote store, category store and settings store contracts.
//! - Isolate SQLite query details from rotation/cache orchestration.
//!
//! # Invariants
//! - Repository writes validate drafts before persistence.
//! - Repository APIs return semantic errors (`QuoteNotFound`, ...) in
//!   addition to DB transport errors.

pub mod category_repo;
mod guard;
pub mod quote_repo;
pub mod settings_repo;
