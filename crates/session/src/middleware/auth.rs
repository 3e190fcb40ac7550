//! Identity extractors.
//!
//! Provides extractors for reading or requiring the session identity in
//! route handlers.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use session_identity_core::HistoryId;
use tower_sessions::Session;

use crate::error::IdentityError;
use crate::icon::IconFormatter;
use crate::models::IdentityRecord;
use crate::readers;

/// Read the identity from the session the session layer attached, if any.
async fn identity_from_parts(parts: &Parts) -> Option<IdentityRecord> {
    match parts.extensions.get::<Session>() {
        Some(session) => readers::user(session).await,
        None => None,
    }
}

/// Extractor that reads the session identity without ever rejecting.
///
/// Requests without a bound identity (or without a session layer) read as
/// logged out. Requires an [`IconFormatter`] in router state.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(identity: CurrentIdentity) -> impl IntoResponse {
///     match identity.username() {
///         Some(name) => format!("Hello, {name}!"),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentIdentity {
    record: Option<IdentityRecord>,
    icons: IconFormatter,
}

impl CurrentIdentity {
    /// Wrap an already loaded identity.
    #[must_use]
    pub const fn new(record: Option<IdentityRecord>, icons: IconFormatter) -> Self {
        Self { record, icons }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.record.as_ref().is_some_and(|u| u.authenticated)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.record.as_ref().is_some_and(|u| u.admin)
    }

    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.record.as_ref().map(|u| u.username.as_str())
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.record.as_ref().map(|u| u.email.as_str())
    }

    #[must_use]
    pub const fn user(&self) -> Option<&IdentityRecord> {
        self.record.as_ref()
    }

    /// Formatted profile icon, or the default icon when logged out.
    #[must_use]
    pub fn user_icon(&self) -> String {
        self.icons
            .format(self.record.as_ref().map(|u| u.icon.as_str()))
    }

    /// The user's history document id.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidIdentifier`] if the stored reference is malformed.
    pub fn history(&self) -> Result<Option<HistoryId>, IdentityError> {
        match &self.record {
            Some(record) => Ok(record.history_id()?),
            None => Ok(None),
        }
    }

    /// The user's history document id, with a malformed reference read as none.
    #[must_use]
    pub fn history_or_none(&self) -> Option<HistoryId> {
        self.history().ok().flatten()
    }

    /// Flatten into the values pages render.
    #[must_use]
    pub fn view(&self) -> IdentityView {
        IdentityView {
            authenticated: self.is_authenticated(),
            admin: self.is_admin(),
            username: self.username().map(String::from),
            email: self.email().map(String::from),
            icon: self.user_icon(),
        }
    }

    #[must_use]
    pub fn into_user(self) -> Option<IdentityRecord> {
        self.record
    }
}

/// Identity as handed to templates and JSON responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityView {
    pub authenticated: bool,
    pub admin: bool,
    pub username: Option<String>,
    pub email: Option<String>,
    pub icon: String,
}

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
    IconFormatter: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let record = identity_from_parts(parts).await;
        Ok(Self::new(record, IconFormatter::from_ref(state)))
    }
}

/// Error returned when an identity is required but missing or insufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Forbidden - user is logged in but not an admin.
    Forbidden,
}

impl IdentityRejection {
    fn for_path(parts: &Parts) -> Self {
        if parts.uri.path().starts_with("/api/") {
            Self::Unauthorized
        } else {
            Self::RedirectToLogin
        }
    }
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Only admins can access this resource",
            )
                .into_response(),
        }
    }
}

/// Extractor that requires an authenticated identity.
///
/// If the user is not logged in, returns a redirect to the login page
/// for HTML requests, or 401 Unauthorized for API requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser(pub IdentityRecord);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_parts(parts)
            .await
            .filter(|u| u.authenticated)
            .map(Self)
            .ok_or_else(|| IdentityRejection::for_path(parts))
    }
}

/// Extractor that requires an authenticated admin.
///
/// If the user is not logged in, behaves like [`RequireUser`].
/// If the user is not an admin, returns 403 Forbidden.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub IdentityRecord);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.admin {
            tracing::debug!(username = %user.username, "Admin route refused for non-admin");
            return Err(IdentityRejection::Forbidden);
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::Login;

    fn alice() -> IdentityRecord {
        IdentityRecord::authenticated(
            Login::new("alice", "a@x.com")
                .icon("abc123.png")
                .history("64f1a2b3c4d5e6f708192a3b"),
            &IconFormatter::default(),
        )
    }

    #[test]
    fn test_logged_out_view() {
        let identity = CurrentIdentity::new(None, IconFormatter::default());
        assert_eq!(
            identity.view(),
            IdentityView {
                authenticated: false,
                admin: false,
                username: None,
                email: None,
                icon: "/imgs/profileIconLoggedOut.png".to_string(),
            }
        );
        assert_eq!(identity.history().unwrap(), None);
        assert_eq!(identity.history_or_none(), None);
    }

    #[test]
    fn test_malformed_history_reads_as_none() {
        let record = IdentityRecord::authenticated(
            Login::new("eve", "e@x.com").history("64f..."),
            &IconFormatter::default(),
        );
        let identity = CurrentIdentity::new(Some(record), IconFormatter::default());

        assert!(identity.history().is_err());
        assert_eq!(identity.history_or_none(), None);
        assert!(identity.is_authenticated());
    }

    #[test]
    fn test_logged_in_view() {
        let identity = CurrentIdentity::new(Some(alice()), IconFormatter::default());
        let view = identity.view();

        assert!(view.authenticated);
        assert!(!view.admin);
        assert_eq!(view.username.as_deref(), Some("alice"));
        assert_eq!(view.email.as_deref(), Some("a@x.com"));
        assert!(view.icon.ends_with("/abc123.png"));
        assert!(identity.history().unwrap().is_some());
        assert_eq!(identity.history_or_none(), identity.history().unwrap());
        assert_eq!(identity.into_user(), Some(alice()));
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            IdentityRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            IdentityRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            IdentityRejection::RedirectToLogin.into_response().status(),
            StatusCode::SEE_OTHER
        );
    }
}
