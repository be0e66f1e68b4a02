//! Domain model for quotes, categories and wallpaper styles.
//!
//! # Responsibility
//! - Define canonical data structures used by rotation and cache logic.
//! - Keep write-side validation next to the records it protects.
//!
//! # Invariants
//! - Every quote is identified by a stable integer `QuoteId`.
//! - Quote text is never blank once persisted.

pub mod category;
pub mod quote;
pub mod style;
