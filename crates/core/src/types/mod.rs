//! Core types for the session identity layer.
//!
//! This module provides type-safe wrappers for identifiers owned by
//! external stores.

pub mod history_id;

pub use history_id::{HistoryId, HistoryIdError};
