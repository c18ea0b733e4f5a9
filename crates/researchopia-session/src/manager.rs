//! The session manager: owns the one persisted session record.
//!
//! Responsibilities:
//! - Writing the session on sign-in and on refresh
//! - Reading it back, treating anything undecodable as "no session"
//! - Answering "is there a usable session right now?"
//! - Handing out the access token only when the answer is yes
//!
//! # Failure model
//!
//! The plain operations never return errors. Callers sit in UI code
//! and request interceptors, and for them authentication is a yes/no
//! question. Store failures and corrupt records are logged with `tracing`
//! and then read as "absent". The `try_*` variants expose the underlying
//! [`SessionError`] for callers that need to tell those cases apart.
//!
//! # Concurrency note
//!
//! `SessionManager` takes `&mut self` for writes and does no locking of
//! its own. Share it behind a mutex at a higher level if several tasks need
//! it. Across processes the store is last-write-wins.

use researchopia_token::now_millis;

use crate::{Session, SessionConfig, SessionError, SessionState, SessionStore, User};

/// Manages the persisted authentication session.
///
/// ## Lifecycle
///
/// ```text
/// save_session() ──→ [Valid] ──(time)──→ [Expired]
///        │              │                    │
///        │        update_expiry()            │
///        │              │                    │
///        ▼              ▼                    ▼
///                 clear_session() ──→ [Absent]
/// ```
///
/// Validity is recomputed from `expires_at` and the wall clock on every
/// call; nothing is cached between calls.
pub struct SessionManager<S: SessionStore> {
    store: S,
    config: SessionConfig,
}

impl<S: SessionStore> SessionManager<S> {
    /// Creates a manager over `store` using the default storage key.
    pub fn new(store: S) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    /// Creates a manager over `store` with the given config.
    pub fn with_config(store: S, config: SessionConfig) -> Self {
        Self { store, config }
    }

    // =====================================================================
    // Writes
    // =====================================================================

    /// Persists `session`, replacing any previous record wholesale.
    ///
    /// Failures are logged and swallowed; use [`try_save_session`] to see
    /// them.
    ///
    /// [`try_save_session`]: Self::try_save_session
    pub fn save_session(&mut self, session: &Session) {
        if let Err(err) = self.try_save_session(session) {
            tracing::warn!(error = %err, "failed to persist session");
        }
    }

    /// Persists `session`, replacing any previous record wholesale.
    ///
    /// # Errors
    /// - [`SessionError::Encode`]: serialization failed
    /// - [`SessionError::Store`]: the store rejected the write
    pub fn try_save_session(&mut self, session: &Session) -> Result<(), SessionError> {
        let json = serde_json::to_string(session).map_err(SessionError::Encode)?;
        self.store.set(&self.config.storage_key, &json)?;

        tracing::debug!(
            user_id = %session.user.id,
            expires_at = session.expires_at,
            "session saved"
        );
        Ok(())
    }

    /// Removes the session record. Calling this with no session present is
    /// a no-op.
    pub fn clear_session(&mut self) {
        match self.store.remove(&self.config.storage_key) {
            Ok(()) => tracing::debug!("session cleared"),
            Err(err) => tracing::warn!(error = %err, "failed to clear session"),
        }
    }

    /// Moves the session's expiry to `new_expires_at_ms`, leaving the
    /// tokens and user untouched.
    ///
    /// With no session present this does nothing. A refresh that finishes
    /// after a concurrent sign-out must not resurrect the session or fail.
    pub fn update_expiry(&mut self, new_expires_at_ms: i64) {
        let Some(mut session) = self.load_session() else {
            tracing::debug!("no session to update expiry on");
            return;
        };

        session.expires_at = new_expires_at_ms;
        self.save_session(&session);
    }

    // =====================================================================
    // Reads
    // =====================================================================

    /// Loads the session record, reporting why it couldn't be read.
    ///
    /// Returns `Ok(None)` when no record is stored.
    ///
    /// # Errors
    /// - [`SessionError::Store`]: the store failed to read
    /// - [`SessionError::Decode`]: a record exists but isn't a valid session
    pub fn try_load_session(&self) -> Result<Option<Session>, SessionError> {
        let Some(raw) = self.store.get(&self.config.storage_key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(SessionError::Decode)
    }

    /// Loads the session record, or `None` if it is missing or unreadable.
    ///
    /// Corruption is deliberately indistinguishable from absence here.
    pub fn load_session(&self) -> Option<Session> {
        match self.try_load_session() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable session record");
                None
            }
        }
    }

    /// Returns `true` iff a session loads and its `expires_at` is still in
    /// the future.
    pub fn is_session_valid(&self) -> bool {
        self.is_session_valid_at(now_millis())
    }

    /// [`is_session_valid`](Self::is_session_valid) against an explicit
    /// clock reading.
    pub fn is_session_valid_at(&self, now_ms: i64) -> bool {
        self.state_at(now_ms) == SessionState::Valid
    }

    /// The access token, but only if the session is currently valid.
    ///
    /// This is the single place credentials leave the session layer. Code
    /// that attaches a bearer token to a request should come through here
    /// rather than reading the record directly.
    pub fn get_access_token(&self) -> Option<String> {
        self.valid_session(now_millis())
            .map(|session| session.access_token)
    }

    /// The signed-in user, but only if the session is currently valid.
    pub fn current_user(&self) -> Option<User> {
        self.valid_session(now_millis()).map(|session| session.user)
    }

    /// The current [`SessionState`].
    pub fn state(&self) -> SessionState {
        self.state_at(now_millis())
    }

    /// The [`SessionState`] at an explicit clock reading.
    pub fn state_at(&self, now_ms: i64) -> SessionState {
        let state = match self.load_session() {
            None => SessionState::Absent,
            Some(session) if session.is_expired_at(now_ms) => SessionState::Expired,
            Some(_) => SessionState::Valid,
        };
        tracing::trace!(%state, "session state checked");
        state
    }

    fn valid_session(&self, now_ms: i64) -> Option<Session> {
        self.load_session()
            .filter(|session| !session.is_expired_at(now_ms))
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// The key the record is stored under.
    pub fn storage_key(&self) -> &str {
        &self.config.storage_key
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrows the underlying store.
    ///
    /// Writes made this way bypass the manager (handy for simulating
    /// another tab or a corrupted record).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the manager and returns the store.
    pub fn into_store(self) -> S {
        self.store
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionManager`.
    //!
    //! Naming: `test_{function}_{scenario}_{expected}`.
    //!
    //! Time-dependent checks use the `_at` variants with a fixed "now", or
    //! margins of an hour when going through the wall clock, so nothing
    //! sleeps.

    use super::*;
    use crate::{MemoryStore, StoreError};

    const NOW: i64 = 1_700_000_000_000;
    const HOUR: i64 = 3_600_000;

    // -- Helpers ----------------------------------------------------------

    fn session_expiring_at(expires_at: i64) -> Session {
        Session {
            access_token: "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJ1MSJ9.c2ln".into(),
            refresh_token: "refresh-abc".into(),
            expires_at,
            user: User {
                id: "user-1".into(),
                email: "ada@example.org".into(),
                display_name: "Ada Lovelace".into(),
                created_at: "2024-03-01T12:00:00.000Z".into(),
            },
        }
    }

    fn manager() -> SessionManager<MemoryStore> {
        SessionManager::new(MemoryStore::new())
    }

    /// A store whose every operation fails, to check errors stay contained.
    struct BrokenStore;

    impl SessionStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }
        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::InvalidKey(key.to_string()))
        }
    }

    // =====================================================================
    // save_session() / load_session()
    // =====================================================================

    #[test]
    fn test_load_session_untouched_store_returns_none() {
        assert!(manager().load_session().is_none());
    }

    #[test]
    fn test_save_session_then_load_returns_same_session() {
        let mut mgr = manager();
        let session = session_expiring_at(NOW + HOUR);

        mgr.save_session(&session);

        assert_eq!(mgr.load_session(), Some(session));
    }

    #[test]
    fn test_save_session_writes_single_key() {
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(NOW));

        assert_eq!(mgr.store().len(), 1);
        assert!(
            mgr.store()
                .get("researchopia_session")
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_save_session_replaces_previous_record() {
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(NOW));

        let mut replacement = session_expiring_at(NOW + HOUR);
        replacement.user.id = "user-2".into();
        mgr.save_session(&replacement);

        assert_eq!(mgr.load_session(), Some(replacement));
    }

    #[test]
    fn test_load_session_corrupted_json_returns_none() {
        let mut mgr = manager();
        mgr.store_mut()
            .set("researchopia_session", "{not json")
            .unwrap();

        assert!(mgr.load_session().is_none());
        assert!(matches!(
            mgr.try_load_session(),
            Err(SessionError::Decode(_))
        ));
    }

    #[test]
    fn test_load_session_partial_record_returns_none() {
        let mut mgr = manager();
        mgr.store_mut()
            .set(
                "researchopia_session",
                r#"{"access_token":"a.b.c","expires_at":1}"#,
            )
            .unwrap();

        assert!(mgr.load_session().is_none());
    }

    #[test]
    fn test_custom_storage_key_is_used() {
        let config = SessionConfig {
            storage_key: "other_key".into(),
        };
        let mut mgr = SessionManager::with_config(MemoryStore::new(), config);

        mgr.save_session(&session_expiring_at(NOW));

        assert_eq!(mgr.storage_key(), "other_key");
        assert!(mgr.store().get("other_key").unwrap().is_some());
        assert!(mgr.store().get("researchopia_session").unwrap().is_none());
    }

    // =====================================================================
    // clear_session()
    // =====================================================================

    #[test]
    fn test_clear_session_after_save_returns_none() {
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(NOW + HOUR));

        mgr.clear_session();

        assert!(mgr.load_session().is_none());
    }

    #[test]
    fn test_clear_session_twice_is_noop() {
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(NOW + HOUR));

        mgr.clear_session();
        mgr.clear_session();

        assert!(mgr.load_session().is_none());
        assert!(mgr.store().is_empty());
    }

    // =====================================================================
    // is_session_valid() / state()
    // =====================================================================

    #[test]
    fn test_is_session_valid_at_future_expiry_returns_true() {
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(NOW + HOUR));

        assert!(mgr.is_session_valid_at(NOW));
        assert_eq!(mgr.state_at(NOW), SessionState::Valid);
    }

    #[test]
    fn test_is_session_valid_at_past_expiry_returns_false() {
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(NOW - 1000));

        assert!(!mgr.is_session_valid_at(NOW));
        assert_eq!(mgr.state_at(NOW), SessionState::Expired);
    }

    #[test]
    fn test_is_session_valid_absent_returns_false() {
        let mgr = manager();
        assert!(!mgr.is_session_valid());
        assert_eq!(mgr.state(), SessionState::Absent);
    }

    #[test]
    fn test_state_changes_with_time_alone() {
        // No call in between: the same record reads Valid, then Expired.
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(NOW));

        assert_eq!(mgr.state_at(NOW - 1), SessionState::Valid);
        assert_eq!(mgr.state_at(NOW), SessionState::Expired);
    }

    // =====================================================================
    // get_access_token() / current_user()
    // =====================================================================

    #[test]
    fn test_get_access_token_valid_session_returns_token() {
        let mut mgr = manager();
        let session = session_expiring_at(now_millis() + HOUR);
        mgr.save_session(&session);

        assert_eq!(mgr.get_access_token(), Some(session.access_token));
        assert_eq!(mgr.current_user(), Some(session.user));
    }

    #[test]
    fn test_get_access_token_expired_session_returns_none() {
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(now_millis() - 1000));

        assert_eq!(mgr.get_access_token(), None);
        assert_eq!(mgr.current_user(), None);
    }

    // =====================================================================
    // update_expiry()
    // =====================================================================

    #[test]
    fn test_update_expiry_absent_session_stays_absent() {
        let mut mgr = manager();

        mgr.update_expiry(NOW + HOUR);

        assert!(mgr.load_session().is_none());
        assert!(mgr.store().is_empty());
    }

    #[test]
    fn test_update_expiry_changes_only_expires_at() {
        let mut mgr = manager();
        let original = session_expiring_at(NOW);
        mgr.save_session(&original);

        mgr.update_expiry(NOW + 2 * HOUR);

        let updated = mgr.load_session().expect("session should remain");
        assert_eq!(updated.expires_at, NOW + 2 * HOUR);
        assert_eq!(updated.access_token, original.access_token);
        assert_eq!(updated.refresh_token, original.refresh_token);
        assert_eq!(updated.user, original.user);
    }

    #[test]
    fn test_update_expiry_revives_expired_session() {
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(NOW - HOUR));

        mgr.update_expiry(NOW + HOUR);

        assert!(mgr.is_session_valid_at(NOW));
    }

    #[test]
    fn test_update_expiry_corrupted_record_is_left_alone() {
        let mut mgr = manager();
        mgr.store_mut()
            .set("researchopia_session", "garbage")
            .unwrap();

        mgr.update_expiry(NOW + HOUR);

        assert_eq!(
            mgr.store().get("researchopia_session").unwrap().as_deref(),
            Some("garbage")
        );
    }

    // =====================================================================
    // Store failures
    // =====================================================================

    #[test]
    fn test_broken_store_never_panics_and_reads_absent() {
        let mut mgr = SessionManager::new(BrokenStore);

        mgr.save_session(&session_expiring_at(NOW + HOUR));
        mgr.update_expiry(NOW + 2 * HOUR);
        mgr.clear_session();

        assert!(mgr.load_session().is_none());
        assert!(!mgr.is_session_valid());
        assert!(mgr.get_access_token().is_none());
        assert_eq!(mgr.state(), SessionState::Absent);
    }

    #[test]
    fn test_try_save_session_broken_store_returns_store_error() {
        let mut mgr = SessionManager::new(BrokenStore);
        let result = mgr.try_save_session(&session_expiring_at(NOW));
        assert!(matches!(result, Err(SessionError::Store(_))));
    }

    #[test]
    fn test_into_store_returns_written_data() {
        let mut mgr = manager();
        mgr.save_session(&session_expiring_at(NOW));

        let store = mgr.into_store();

        assert_eq!(store.len(), 1);
    }
}
