//! Session middleware configuration.
//!
//! Sets up the tower-sessions layer that owns the session container. The
//! store is supplied by the application; expiry is set per session when an
//! identity is bound.

use tower_sessions::{SessionManagerLayer, SessionStore, cookie::SameSite};

use crate::config::IdentityConfig;

/// Create the session layer over the given store.
///
/// # Arguments
///
/// * `store` - Session store backend
/// * `config` - Identity configuration (cookie name, base URL)
#[must_use]
pub fn create_session_layer<S: SessionStore>(
    store: S,
    config: &IdentityConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
