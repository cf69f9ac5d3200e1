//! The in-memory session registry.
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself. It is owned by a single
//! task (the game server's main loop, or the task started by
//! [`SessionCoordinator::spawn`](crate::SessionCoordinator::spawn)) and
//! reached from elsewhere only through the coordinator.

use std::collections::HashMap;

use arcgate_protocol::{DisconnectReason, LocalId};
use tokio::sync::mpsc;

use crate::{LiveSession, SessionError, SessionRegistry};

/// Receives the reason the login core closed a player's session.
pub type DisconnectNotices = mpsc::UnboundedReceiver<DisconnectReason>;

struct Entry {
    session: LiveSession,
    notices: mpsc::UnboundedSender<DisconnectReason>,
}

/// Tracks every live session, one per local identity.
///
/// ## Lifecycle
///
/// ```text
/// admit() ──→ [Live] ──→ leave()        (player quit)
///                │
///                └────→ disconnect()    (login core closed it; the
///                                        player's notice receiver gets
///                                        the reason)
/// ```
#[derive(Default)]
pub struct SessionManager {
    sessions: HashMap<LocalId, Entry>,
}

impl SessionManager {
    /// Creates an empty session manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a live session for an admitted player.
    ///
    /// The returned receiver yields a [`DisconnectReason`] if the login
    /// core later closes this session; the connection handler should then
    /// render it and drop the connection.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if `local_id` already has
    /// a live session.
    pub fn admit(
        &mut self,
        local_id: LocalId,
        name: impl Into<String>,
    ) -> Result<DisconnectNotices, SessionError> {
        if self.sessions.contains_key(&local_id) {
            return Err(SessionError::AlreadyConnected(local_id));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let session = LiveSession::new(local_id, name);
        tracing::info!(%local_id, name = %session.name, "session admitted");
        self.sessions.insert(
            local_id,
            Entry {
                session,
                notices: tx,
            },
        );
        Ok(rx)
    }

    /// Removes a session because the player left on their own.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn leave(&mut self, local_id: LocalId) -> Result<LiveSession, SessionError> {
        let entry = self
            .sessions
            .remove(&local_id)
            .ok_or(SessionError::NotFound(local_id))?;
        tracing::info!(%local_id, "session left");
        Ok(entry.session)
    }

    /// Looks up a session by local identity.
    pub fn get(&self, local_id: &LocalId) -> Option<&LiveSession> {
        self.sessions.get(local_id).map(|e| &e.session)
    }

    /// Iterates over every live session.
    pub fn sessions(&self) -> impl Iterator<Item = &LiveSession> {
        self.sessions.values().map(|e| &e.session)
    }

    /// Returns the number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionRegistry for SessionManager {
    fn find_by_name(&self, name: &str) -> Vec<LiveSession> {
        self.sessions()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    fn find_by_local_id(&self, local_id: LocalId) -> Option<LiveSession> {
        self.get(&local_id).cloned()
    }

    fn disconnect(&mut self, session: &LiveSession, reason: DisconnectReason) {
        let Some(entry) = self.sessions.remove(&session.local_id) else {
            return;
        };
        tracing::info!(
            local_id = %session.local_id,
            name = %entry.session.name,
            %reason,
            "session disconnected"
        );
        // The connection handler may already be gone.
        let _ = entry.notices.send(reason);
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

    use super::*;
    use uuid::Uuid;

    fn lid(n: u128) -> LocalId {
        LocalId(Uuid::from_u128(n))
    }

    // =====================================================================
    // admit()
    // =====================================================================

    #[test]
    fn test_admit_new_player_registers_session() {
        let mut mgr = SessionManager::new();

        mgr.admit(lid(1), "Steve").expect("should succeed");

        let session = mgr.get(&lid(1)).expect("session should exist");
        assert_eq!(session.name, "Steve");
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn test_admit_already_connected_returns_error() {
        let mut mgr = SessionManager::new();
        let _rx = mgr.admit(lid(1), "Steve").unwrap();

        let result = mgr.admit(lid(1), "Steve");

        assert!(
            matches!(result, Err(SessionError::AlreadyConnected(p)) if p == lid(1)),
            "should reject a second live session for the same identity"
        );
    }

    #[test]
    fn test_admit_same_name_different_identity_allowed() {
        // Name uniqueness among live sessions is the login core's job,
        // not the registry's.
        let mut mgr = SessionManager::new();
        let _a = mgr.admit(lid(1), "Steve").unwrap();
        let _b = mgr.admit(lid(2), "Steve").unwrap();

        assert_eq!(mgr.find_by_name("Steve").len(), 2);
    }

    // =====================================================================
    // leave()
    // =====================================================================

    #[test]
    fn test_leave_removes_session() {
        let mut mgr = SessionManager::new();
        let _rx = mgr.admit(lid(1), "Steve").unwrap();

        let left = mgr.leave(lid(1)).expect("should succeed");

        assert_eq!(left.local_id, lid(1));
        assert!(mgr.is_empty());
    }

    #[test]
    fn test_leave_unknown_player_returns_not_found() {
        let mut mgr = SessionManager::new();

        let result = mgr.leave(lid(99));

        assert!(matches!(result, Err(SessionError::NotFound(p)) if p == lid(99)));
    }

    // =====================================================================
    // SessionRegistry
    // =====================================================================

    #[test]
    fn test_find_by_name_is_exact() {
        let mut mgr = SessionManager::new();
        let _a = mgr.admit(lid(1), "Steve").unwrap();
        let _b = mgr.admit(lid(2), "steve").unwrap();

        let found = mgr.find_by_name("Steve");

        assert_eq!(found, vec![LiveSession::new(lid(1), "Steve")]);
    }

    #[test]
    fn test_find_by_local_id_unknown_returns_none() {
        let mgr = SessionManager::new();
        assert!(mgr.find_by_local_id(lid(1)).is_none());
    }

    #[test]
    fn test_disconnect_sends_reason_and_removes() {
        let mut mgr = SessionManager::new();
        let mut rx = mgr.admit(lid(1), "Steve").unwrap();
        let session = mgr.find_by_local_id(lid(1)).unwrap();

        mgr.disconnect(&session, DisconnectReason::SessionReplaced);

        assert!(mgr.is_empty());
        assert_eq!(rx.try_recv().ok(), Some(DisconnectReason::SessionReplaced));
    }

    #[test]
    fn test_disconnect_after_receiver_dropped_does_not_panic() {
        let mut mgr = SessionManager::new();
        drop(mgr.admit(lid(1), "Steve").unwrap());
        let session = LiveSession::new(lid(1), "Steve");

        mgr.disconnect(&session, DisconnectReason::BusyUsername);

        assert!(mgr.is_empty());
    }

    #[test]
    fn test_disconnect_unknown_session_is_noop() {
        let mut mgr = SessionManager::new();
        let _rx = mgr.admit(lid(1), "Steve").unwrap();

        mgr.disconnect(
            &LiveSession::new(lid(2), "Alex"),
            DisconnectReason::BusyUsername,
        );

        assert_eq!(mgr.len(), 1);
    }
}
