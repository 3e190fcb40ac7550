//! Session-related types.
//!
//! Types stored in the session for identity state.

use serde::{Deserialize, Serialize};
use session_identity_core::{HistoryId, HistoryIdError};

use crate::icon::IconFormatter;

/// Session-stored user identity.
///
/// Everything a page needs to know about the logged-in user without a
/// database round trip. A session holds at most one of these, under
/// [`keys::IDENTITY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Whether login succeeded.
    pub authenticated: bool,
    /// Elevated-privilege flag.
    pub admin: bool,
    /// Display name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Formatted profile icon (absolute image host URL or root-relative path).
    pub icon: String,
    /// Raw reference to the user's history document, parsed on read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,
}

impl IdentityRecord {
    /// Build an authenticated record from a successful login.
    #[must_use]
    pub fn authenticated(login: Login, icons: &IconFormatter) -> Self {
        Self {
            authenticated: true,
            admin: login.admin,
            icon: icons.format(login.icon.as_deref()),
            username: login.username,
            email: login.email,
            history: login.history,
        }
    }

    /// Parse the stored history reference into the store's identifier type.
    ///
    /// # Errors
    ///
    /// Returns an error if a reference is present but malformed.
    pub fn history_id(&self) -> Result<Option<HistoryId>, HistoryIdError> {
        self.history.as_deref().map(HistoryId::parse).transpose()
    }
}

/// Identity details handed over by a login handler.
///
/// `admin` defaults to `false`, `icon` to the default icon and `history`
/// to none.
///
/// # Example
///
/// ```rust
/// use session_identity::Login;
///
/// let login = Login::new("alice", "a@x.com")
///     .admin(true)
///     .icon("abc123.png")
///     .history("64f1a2b3c4d5e6f708192a3b");
/// assert!(login.is_admin());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Login {
    username: String,
    email: String,
    admin: bool,
    icon: Option<String>,
    history: Option<String>,
}

impl Login {
    /// Start a login for the given user.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            admin: false,
            icon: None,
            history: None,
        }
    }

    /// Set the admin flag.
    #[must_use]
    pub const fn admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    /// Set the profile icon (bare asset id, image host URL, or path).
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Set the history document reference.
    #[must_use]
    pub fn history(mut self, history: impl Into<String>) -> Self {
        self.history = Some(history.into());
        self
    }

    /// Username being logged in.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether the login carries the admin flag.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.admin
    }
}

/// Session keys for identity data.
pub mod keys {
    /// Key for storing the identity record.
    pub const IDENTITY: &str = "user";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::icon::CDN_PREFIX;

    #[test]
    fn test_login_defaults() {
        let record = IdentityRecord::authenticated(
            Login::new("bob", "b@x.com"),
            &IconFormatter::default(),
        );

        assert!(record.authenticated);
        assert!(!record.admin);
        assert_eq!(record.username, "bob");
        assert_eq!(record.email, "b@x.com");
        assert_eq!(record.icon, "/imgs/profileIconLoggedOut.png");
        assert_eq!(record.history, None);
    }

    #[test]
    fn test_icon_formatted_at_construction() {
        let record = IdentityRecord::authenticated(
            Login::new("alice", "a@x.com").admin(true).icon("abc123.png"),
            &IconFormatter::default(),
        );

        assert!(record.admin);
        assert_eq!(record.icon, format!("{CDN_PREFIX}abc123.png"));
    }

    #[test]
    fn test_empty_username_is_kept() {
        let record =
            IdentityRecord::authenticated(Login::new("", ""), &IconFormatter::default());
        assert_eq!(record.username, "");
        assert_eq!(record.email, "");
    }

    #[test]
    fn test_serde_roundtrip() {
        let record = IdentityRecord::authenticated(
            Login::new("alice", "a@x.com").history("64f1a2b3c4d5e6f708192a3b"),
            &IconFormatter::default(),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["history"], "64f1a2b3c4d5e6f708192a3b");

        let parsed: IdentityRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_history_id() {
        let icons = IconFormatter::default();

        let record = IdentityRecord::authenticated(
            Login::new("alice", "a@x.com").history("64f1a2b3c4d5e6f708192a3b"),
            &icons,
        );
        assert_eq!(
            record.history_id().unwrap().map(|id| id.to_hex()).as_deref(),
            Some("64f1a2b3c4d5e6f708192a3b")
        );

        let record = IdentityRecord::authenticated(Login::new("bob", "b@x.com"), &icons);
        assert_eq!(record.history_id().unwrap(), None);

        let record = IdentityRecord::authenticated(
            Login::new("eve", "e@x.com").history("64f..."),
            &icons,
        );
        assert!(record.history_id().is_err());
    }

    #[test]
    fn test_missing_history_field_deserializes() {
        let json = serde_json::json!({
            "authenticated": true,
            "admin": false,
            "username": "carol",
            "email": "c@x.com",
            "icon": "/imgs/profileIconLoggedOut.png",
        });
        let record: IdentityRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.history, None);
    }
}
