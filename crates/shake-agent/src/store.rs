//! Negotiation session storage.
//!
//! The registry reaches sessions only through [`SessionStore`], so a
//! persistent backend can replace [`InMemorySessionStore`] without touching
//! negotiation logic.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use shake_core::RequestId;

use crate::negotiation::NegotiationSession;

/// Keyed storage for negotiation sessions.
///
/// Implementations must apply [`update`](SessionStore::update) atomically
/// with respect to other operations on the same request id.
pub trait SessionStore: Send + Sync {
    /// Returns a copy of the session for `request_id`.
    fn get(&self, request_id: &str) -> Option<NegotiationSession>;

    /// Inserts or replaces a session.
    fn put(&self, session: NegotiationSession);

    /// Inserts a session unless one already exists for its request id.
    ///
    /// Returns false if a session was already present.
    fn insert_if_absent(&self, session: NegotiationSession) -> bool;

    /// Applies `f` to the stored session under its lock.
    ///
    /// Returns `None` if no session exists for `request_id`.
    fn update<R, F>(&self, request_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut NegotiationSession) -> R;

    /// Removes and returns a session.
    fn delete(&self, request_id: &str) -> Option<NegotiationSession>;

    /// Returns a copy of every stored session.
    fn snapshot(&self) -> Vec<NegotiationSession>;

    /// Returns the number of stored sessions.
    fn len(&self) -> usize;

    /// Returns true if no sessions are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process session store.
///
/// Each session sits behind its own mutex: mutations of one request are
/// serialized, while different requests only share the map's read lock.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<RequestId, Arc<Mutex<NegotiationSession>>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, request_id: &str) -> Option<NegotiationSession> {
        let sessions = self.sessions.read();
        sessions.get(request_id).map(|s| s.lock().clone())
    }

    fn put(&self, session: NegotiationSession) {
        let key = session.request_id.clone();
        self.sessions
            .write()
            .insert(key, Arc::new(Mutex::new(session)));
    }

    fn insert_if_absent(&self, session: NegotiationSession) -> bool {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(&session.request_id) {
            return false;
        }
        sessions.insert(session.request_id.clone(), Arc::new(Mutex::new(session)));
        true
    }

    fn update<R, F>(&self, request_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut NegotiationSession) -> R,
    {
        // Holding the read lock keeps the entry from being deleted mid-update.
        let sessions = self.sessions.read();
        let entry = sessions.get(request_id)?;
        let mut session = entry.lock();
        Some(f(&mut session))
    }

    fn delete(&self, request_id: &str) -> Option<NegotiationSession> {
        let removed = self.sessions.write().remove(request_id)?;
        let session = removed.lock().clone();
        Some(session)
    }

    fn snapshot(&self) -> Vec<NegotiationSession> {
        let sessions = self.sessions.read();
        sessions.values().map(|s| s.lock().clone()).collect()
    }

    fn len(&self) -> usize {
        self.sessions.read().len()
    }
}
