//! Session identity layer.
//!
//! Attaches the logged-in user's identity (authentication and admin flags,
//! username, email, profile icon, history reference) to a `tower-sessions`
//! session and reads it back for request handlers.
//!
//! This crate performs no authentication and owns no storage: a login
//! handler calls [`bind`] after it has verified the user, and the session
//! store behind [`create_session_layer`] is supplied by the application.
//!
//! # Modules
//!
//! - [`binder`] - Bind and clear the identity on a session
//! - [`readers`] - Default-safe accessors over a session
//! - [`icon`] - Profile icon path formatting
//! - [`middleware`] - Session layer and axum extractors
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod binder;
pub mod config;
pub mod error;
pub mod icon;
pub mod middleware;
pub mod models;
pub mod readers;

pub use binder::{SESSION_TTL, bind, clear};
pub use config::{ConfigError, IdentityConfig};
pub use error::{IdentityError, Result};
pub use icon::{CDN_PREFIX, DEFAULT_ICON, IconFormatter, format_icon};
pub use middleware::{
    CurrentIdentity, IdentityRejection, IdentityView, RequireAdmin, RequireUser,
    create_session_layer,
};
pub use models::{IdentityRecord, Login, session_keys};
pub use session_identity_core::{HistoryId, HistoryIdError};
