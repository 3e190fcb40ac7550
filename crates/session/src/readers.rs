//! Reading identity back off a session.
//!
//! Every reader is safe on a session with no identity bound: flags read as
//! `false`, fields as `None` and the icon as the default icon. A session
//! store failure or an undecodable stored value is logged and treated the
//! same as an unbound session.

use session_identity_core::HistoryId;
use tower_sessions::Session;

use crate::error::Result;
use crate::icon::IconFormatter;
use crate::models::{IdentityRecord, session_keys};

/// The identity bound to the session, if any.
pub async fn user(session: &Session) -> Option<IdentityRecord> {
    match session.get::<IdentityRecord>(session_keys::IDENTITY).await {
        Ok(record) => record,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to read identity from session");
            None
        }
    }
}

/// Whether the session belongs to an authenticated user.
pub async fn is_authenticated(session: &Session) -> bool {
    user(session).await.is_some_and(|u| u.authenticated)
}

/// Whether the session belongs to an admin.
pub async fn is_admin(session: &Session) -> bool {
    user(session).await.is_some_and(|u| u.admin)
}

/// The bound username.
pub async fn username(session: &Session) -> Option<String> {
    user(session).await.map(|u| u.username)
}

/// The bound email address.
pub async fn email(session: &Session) -> Option<String> {
    user(session).await.map(|u| u.email)
}

/// The bound profile icon, formatted, or the default icon.
///
/// Formatting is re-applied so records stored under older rules still
/// come out normalized.
pub async fn user_icon(session: &Session, icons: &IconFormatter) -> String {
    let record = user(session).await;
    icons.format(record.as_ref().map(|u| u.icon.as_str()))
}

/// The bound user's history document id.
///
/// # Errors
///
/// Returns [`IdentityError::InvalidIdentifier`](crate::IdentityError::InvalidIdentifier)
/// if a history reference is stored but malformed. Callers should treat this
/// as "no history".
pub async fn history(session: &Session) -> Result<Option<HistoryId>> {
    let Some(record) = user(session).await else {
        return Ok(None);
    };

    record.history_id().map_err(|err| {
        tracing::warn!(
            username = %record.username,
            error = %err,
            "Stored history reference is malformed"
        );
        err.into()
    })
}

/// The bound user's history document id, with a malformed reference read
/// as no history.
pub async fn history_or_none(session: &Session) -> Option<HistoryId> {
    history(session).await.ok().flatten()
}
