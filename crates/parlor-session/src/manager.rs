//! The session manager: the gateway's registry of live connections.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use parlor_protocol::ClientId;

use crate::ClientSession;

/// Tracks every currently connected client.
///
/// Purely a gateway concern: sessions are registered when a connection is
/// accepted and removed when it closes, whatever the reason. Room
/// membership is tracked separately by the room layer — a client can be
/// connected without being in any room (e.g. a quickplay probe).
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<ClientId, Arc<ClientSession>>>,
}

impl SessionManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly accepted connection.
    pub fn register(&self, session: Arc<ClientSession>) {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tracing::debug!(client = %session.id(), "session registered");
        sessions.insert(session.id(), session);
    }

    /// Removes a connection, returning its session if it was known.
    pub fn remove(&self, id: ClientId) -> Option<Arc<ClientSession>> {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let removed = sessions.remove(&id);
        if removed.is_some() {
            tracing::debug!(client = %id, "session removed");
        }
        removed
    }

    /// Looks up a live session by client id.
    pub fn get(&self, id: ClientId) -> Option<Arc<ClientSession>> {
        let sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.get(&id).cloned()
    }

    /// Number of live connections.
    pub fn count(&self) -> usize {
        let sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_remove() {
        let manager = SessionManager::new();
        let (session, _rx) = ClientSession::new(ClientId::new());
        let id = session.id();
        let session = Arc::new(session);

        manager.register(Arc::clone(&session));
        assert_eq!(manager.count(), 1);
        assert!(manager.get(id).is_some());

        let removed = manager.remove(id).unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(manager.count(), 0);
        assert!(manager.get(id).is_none());
    }

    #[test]
    fn test_remove_unknown_client_is_a_noop() {
        let manager = SessionManager::new();
        assert!(manager.remove(ClientId::new()).is_none());
    }
}
