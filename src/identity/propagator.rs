//! Identity propagation.
//!
//! Storage is the source of truth. The tracker identity is re-derived from it
//! at initialization and before every page view, so a login made in one tab
//! or a restarted session still attributes events to the right user.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::IdentityError;
use crate::logging::structured::LogContext;
use crate::storage::{load_or_clear, write_json, KeyValueStore, USER_KEY};
use crate::transport::Transport;

/// Opaque, non-empty user id (the demo site uses the email address).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: &str) -> Result<Self, IdentityError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted shape of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub email: String,
    #[serde(rename = "isLoggedIn")]
    pub is_logged_in: bool,
}

pub struct IdentityPropagator {
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
    current: Mutex<Option<Identity>>,
    ctx: LogContext,
}

impl IdentityPropagator {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
        ctx: &LogContext,
    ) -> Self {
        Self {
            store,
            transport,
            current: Mutex::new(None),
            ctx: ctx.with_component("identity"),
        }
    }

    /// Persist `id` as the logged-in user and attach it to the tracker.
    ///
    /// Replaces any previous identity in both places.
    pub fn login(&self, id: &str) -> Result<Identity, IdentityError> {
        let identity = Identity::new(id)?;
        let user = StoredUser {
            email: identity.as_str().to_string(),
            is_logged_in: true,
        };
        write_json(self.store.as_ref(), USER_KEY, &user)?;
        self.push_to_tracker(Some(&identity));
        *self.current.lock() = Some(identity.clone());

        crate::log_info!(self.ctx, "USER_LOGIN", user = identity.as_str());
        Ok(identity)
    }

    /// Forget the user in storage and detach it from the tracker.
    ///
    /// If storage cannot be cleared nothing changes, so the tracker and
    /// [`current`](Self::current) keep matching storage.
    pub fn logout(&self) -> Result<(), IdentityError> {
        self.store.remove(USER_KEY)?;
        self.push_to_tracker(None);
        let previous = self.current.lock().take();

        crate::log_info!(self.ctx, "USER_LOGOUT", had_identity = previous.is_some());
        Ok(())
    }

    /// Re-read the stored user and re-attach it to the tracker.
    ///
    /// Malformed data is removed from storage and reads as logged out.
    pub fn restore(&self) -> Option<Identity> {
        let user: StoredUser = load_or_clear(
            self.store.as_ref(),
            USER_KEY,
            |user: &StoredUser| {
                if user.email.trim().is_empty() {
                    Err("email must be a non-empty string".to_string())
                } else {
                    Ok(())
                }
            },
            &self.ctx,
        )?;

        if !user.is_logged_in {
            crate::log_debug!(self.ctx, "USER_RESTORE_SKIPPED", reason = "logged_out");
            return None;
        }

        let identity = Identity::new(&user.email).ok()?;
        self.push_to_tracker(Some(&identity));
        *self.current.lock() = Some(identity.clone());

        crate::log_debug!(self.ctx, "USER_RESTORED", user = identity.as_str());
        Some(identity)
    }

    /// The identity most recently logged in or restored in this session.
    pub fn current(&self) -> Option<Identity> {
        self.current.lock().clone()
    }

    fn push_to_tracker(&self, identity: Option<&Identity>) {
        if let Err(e) = self.transport.set_identity(identity.map(Identity::as_str)) {
            crate::log_error!(self.ctx, "TRACKER_IDENTITY_FAILED", error = e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::transport::RecordingTransport;

    /// Store whose removals fail while `locked` is set.
    #[derive(Default)]
    struct LockedStore {
        inner: MemoryStore,
        locked: std::sync::atomic::AtomicBool,
    }

    impl KeyValueStore for LockedStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), crate::error::StorageError> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), crate::error::StorageError> {
            if self.locked.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked").into());
            }
            self.inner.remove(key)
        }
    }

    fn setup() -> (Arc<MemoryStore>, Arc<RecordingTransport>, IdentityPropagator) {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let propagator =
            IdentityPropagator::new(store.clone(), transport.clone(), &LogContext::new("s-1"));
        (store, transport, propagator)
    }

    #[test]
    fn test_login_persists_and_propagates() {
        let (store, transport, propagator) = setup();
        propagator.login("reader@example.com").unwrap();

        let raw = store.get(USER_KEY).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["email"], "reader@example.com");
        assert_eq!(json["isLoggedIn"], true);
        assert_eq!(transport.identity().as_deref(), Some("reader@example.com"));
    }

    #[test]
    fn test_second_login_replaces_first() {
        let (store, transport, propagator) = setup();
        propagator.login("a@example.com").unwrap();
        propagator.login("b@example.com").unwrap();

        assert!(store.get(USER_KEY).unwrap().contains("b@example.com"));
        assert!(!store.get(USER_KEY).unwrap().contains("a@example.com"));
        assert_eq!(transport.identity().as_deref(), Some("b@example.com"));
        assert_eq!(propagator.current().unwrap().as_str(), "b@example.com");
    }

    #[test]
    fn test_empty_login_rejected() {
        let (store, transport, propagator) = setup();
        assert!(matches!(propagator.login("   "), Err(IdentityError::Empty)));
        assert!(store.get(USER_KEY).is_none());
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_logout_clears_to_none() {
        let (store, transport, propagator) = setup();
        propagator.login("a@example.com").unwrap();
        propagator.logout().unwrap();

        assert!(store.get(USER_KEY).is_none());
        assert_eq!(transport.identity(), None);
        assert_eq!(propagator.current(), None);
    }

    #[test]
    fn test_failed_logout_keeps_identity_everywhere() {
        let store = Arc::new(LockedStore::default());
        let transport = Arc::new(RecordingTransport::new());
        let propagator =
            IdentityPropagator::new(store.clone(), transport.clone(), &LogContext::new("s-1"));
        propagator.login("a@example.com").unwrap();

        store.locked.store(true, std::sync::atomic::Ordering::SeqCst);
        assert!(matches!(propagator.logout(), Err(IdentityError::Storage(_))));
        assert!(store.get(USER_KEY).is_some());
        assert_eq!(transport.identity().as_deref(), Some("a@example.com"));
        assert_eq!(propagator.current().unwrap().as_str(), "a@example.com");

        store.locked.store(false, std::sync::atomic::Ordering::SeqCst);
        propagator.logout().unwrap();
        assert_eq!(transport.identity(), None);
        assert_eq!(propagator.current(), None);
    }

    #[test]
    fn test_restore_valid_user() {
        let (store, transport, propagator) = setup();
        store
            .set(USER_KEY, r#"{"email":"a@example.com","isLoggedIn":true}"#)
            .unwrap();

        let restored = propagator.restore().unwrap();
        assert_eq!(restored.as_str(), "a@example.com");
        assert_eq!(transport.identity().as_deref(), Some("a@example.com"));
    }

    #[test]
    fn test_restore_clears_invalid_data() {
        let (store, transport, propagator) = setup();
        for raw in [r#"{"email":"","isLoggedIn":true}"#, r#"{"email":42}"#, "{not json"] {
            store.set(USER_KEY, raw).unwrap();
            assert_eq!(propagator.restore(), None);
            assert!(store.get(USER_KEY).is_none(), "{} should be cleared", raw);
        }
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_restore_absent() {
        let (_store, _transport, propagator) = setup();
        assert_eq!(propagator.restore(), None);
    }
}
