//! Session Identity Core - Shared types library.
//!
//! This crate provides the types shared by the session identity layer and
//! the handlers that consume it:
//! - [`HistoryId`] - Identifier of a user's history document in the external store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no session access,
//! no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for store identifiers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
