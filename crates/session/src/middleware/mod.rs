//! HTTP glue for identity.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Session layer (tower-sessions, any store)
//! 2. Identity extractors read the session the layer put in request extensions

pub mod auth;
pub mod session;

pub use auth::{CurrentIdentity, IdentityRejection, IdentityView, RequireAdmin, RequireUser};
pub use session::create_session_layer;
