//! Rendered-wallpaper cache.
//!
//! # Responsibility
//! - Store one rendered image per `(quote id, style)` slot on disk.
//! - Keep slots in sync with quote edits, deletions and style changes.
//!
//! # Invariants
//! - Slot presence is the only readiness signal; there is no "generating"
//!   state.
//! - Slots are written via temp file + rename, so a present slot is complete.

pub mod coordinator;
pub mod wallpaper_cache;
