//! Binding identity to a session.
//!
//! Called by login handlers once authentication has succeeded, and by
//! logout handlers to drop the identity again.
//!
//! Nothing here touches process or thread state such as the Sentry scope:
//! tagging error reports with the user belongs to the application's
//! per-request hub (`sentry-tower`).

use tower_sessions::{Expiry, Session, cookie::time::Duration};

use crate::error::Result;
use crate::icon::IconFormatter;
use crate::models::{IdentityRecord, Login, session_keys};

/// How long a bound session lives: one hour (3,600,000 ms).
pub const SESSION_TTL: Duration = Duration::milliseconds(3_600_000);

/// Bind an authenticated identity to the session.
///
/// Replaces any identity already stored on the session, then resets the
/// session expiry to [`SESSION_TTL`]. A failed write leaves the expiry
/// untouched.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn bind(session: &Session, login: Login, icons: &IconFormatter) -> Result<()> {
    let record = IdentityRecord::authenticated(login, icons);
    session.insert(session_keys::IDENTITY, &record).await?;
    session.set_expiry(Some(Expiry::OnInactivity(SESSION_TTL)));

    tracing::info!(
        username = %record.username,
        admin = record.admin,
        "Identity bound to session"
    );

    Ok(())
}

/// Remove the identity from the session (logout).
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn clear(session: &Session) -> Result<()> {
    let removed = session
        .remove::<IdentityRecord>(session_keys::IDENTITY)
        .await?;

    if let Some(record) = removed {
        tracing::debug!(username = %record.username, "Identity cleared from session");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tower_sessions::{
        MemoryStore, SessionStore,
        session::{Id, Record},
        session_store,
    };

    use super::*;
    use crate::error::IdentityError;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    /// Store whose backend is always down.
    #[derive(Debug)]
    struct UnavailableStore;

    fn unavailable() -> session_store::Error {
        session_store::Error::Backend("store unavailable".to_string())
    }

    #[async_trait]
    impl SessionStore for UnavailableStore {
        async fn save(&self, _record: &Record) -> std::result::Result<(), session_store::Error> {
            Err(unavailable())
        }

        async fn load(
            &self,
            _session_id: &Id,
        ) -> std::result::Result<Option<Record>, session_store::Error> {
            Err(unavailable())
        }

        async fn delete(&self, _session_id: &Id) -> std::result::Result<(), session_store::Error> {
            Err(unavailable())
        }
    }

    #[tokio::test]
    async fn test_bind_sets_one_hour_expiry() {
        let session = session();
        bind(&session, Login::new("alice", "a@x.com"), &IconFormatter::default())
            .await
            .unwrap();

        match session.expiry() {
            Some(Expiry::OnInactivity(ttl)) => {
                assert_eq!(ttl, SESSION_TTL);
                assert_eq!(ttl.whole_milliseconds(), 3_600_000);
            }
            other => panic!("unexpected expiry: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bind_overrides_previous_expiry() {
        let session = session();
        session.set_expiry(Some(Expiry::OnInactivity(Duration::days(7))));

        bind(&session, Login::new("alice", "a@x.com"), &IconFormatter::default())
            .await
            .unwrap();

        assert!(matches!(
            session.expiry(),
            Some(Expiry::OnInactivity(ttl)) if ttl == SESSION_TTL
        ));
    }

    #[tokio::test]
    async fn test_failed_bind_leaves_expiry_untouched() {
        let session = Session::new(Some(Id::default()), Arc::new(UnavailableStore), None);

        let result = bind(&session, Login::new("alice", "a@x.com"), &IconFormatter::default()).await;

        assert!(matches!(result, Err(IdentityError::Session(_))));
        assert!(session.expiry().is_none());
    }

    #[tokio::test]
    async fn test_bind_stores_authenticated_record() {
        let session = session();
        bind(
            &session,
            Login::new("alice", "a@x.com").admin(true),
            &IconFormatter::default(),
        )
        .await
        .unwrap();

        let record: IdentityRecord = session
            .get(session_keys::IDENTITY)
            .await
            .unwrap()
            .unwrap();
        assert!(record.authenticated);
        assert!(record.admin);
        assert_eq!(record.username, "alice");
    }

    #[tokio::test]
    async fn test_bind_replaces_prior_identity() {
        let session = session();
        let icons = IconFormatter::default();
        bind(&session, Login::new("alice", "a@x.com").admin(true), &icons)
            .await
            .unwrap();
        bind(&session, Login::new("bob", "b@x.com"), &icons)
            .await
            .unwrap();

        let record: IdentityRecord = session
            .get(session_keys::IDENTITY)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.username, "bob");
        assert!(!record.admin);
    }

    #[tokio::test]
    async fn test_clear_removes_identity() {
        let session = session();
        bind(&session, Login::new("alice", "a@x.com"), &IconFormatter::default())
            .await
            .unwrap();
        clear(&session).await.unwrap();

        let record: Option<IdentityRecord> = session.get(session_keys::IDENTITY).await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_clear_unbound_session() {
        clear(&session()).await.unwrap();
    }

    #[test]
    fn test_bind_does_not_tag_other_requests_in_sentry() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let events = sentry::test::with_captured_events(|| {
            runtime.block_on(async {
                bind(
                    &session(),
                    Login::new("alice", "a@x.com"),
                    &IconFormatter::default(),
                )
                .await
                .unwrap();
            });

            // A later, anonymous request on the same hub.
            sentry::capture_message("anonymous failure", sentry::Level::Error);
        });

        assert_eq!(events.len(), 1);
        let username = events
            .first()
            .and_then(|event| event.user.as_ref())
            .and_then(|user| user.username.clone());
        assert_eq!(username, None);
    }
}
