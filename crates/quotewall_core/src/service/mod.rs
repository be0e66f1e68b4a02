//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod clock;
pub mod error;
pub mod import_service;
pub mod preference_service;
pub mod quote_service;
pub mod rotation_service;
