//! Thread-safe map of live terminal sessions.
//!
//! Grounded on `par-term-terminal::terminal::TerminalManager`'s
//! `pty_session: Arc<Mutex<PtySession>>` field: the primary task and each
//! session's reader thread need shared access to session state without the
//! primary task ever blocking on PTY I/O (spec.md §5's scheduling model).
//! Generalized here from one session per manager to a keyed map, since a
//! workspace can host many terminal panes at once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use viloxterm_common::SessionId;

use crate::session::TerminalSession;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, TerminalSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: TerminalSession) -> SessionId {
        let id = session.session_id.clone();
        self.sessions.lock().insert(id.clone(), session);
        id
    }

    pub fn remove(&self, id: &SessionId) -> Option<TerminalSession> {
        self.sessions.lock().remove(id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.lock().contains_key(id)
    }

    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Runs `f` with exclusive access to the session, if it exists. The
    /// lock is held only for the duration of `f`, never across calls.
    pub fn with_session<R>(&self, id: &SessionId, f: impl FnOnce(&mut TerminalSession) -> R) -> Option<R> {
        let mut sessions = self.sessions.lock();
        sessions.get_mut(id).map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_find_remove_round_trips() {
        let registry = SessionRegistry::new();
        let session = TerminalSession::new("/bin/sh", vec![], 24, 80);
        let id = registry.insert(session);

        assert!(registry.contains(&id));
        assert_eq!(registry.len(), 1);

        let found = registry.with_session(&id, |s| s.rows);
        assert_eq!(found, Some(24));

        assert!(registry.remove(&id).is_some());
        assert!(!registry.contains(&id));
        assert!(registry.is_empty());
    }

    #[test]
    fn with_session_on_unknown_id_returns_none() {
        let registry = SessionRegistry::new();
        let bogus = SessionId::new();
        assert_eq!(registry.with_session(&bogus, |s| s.rows), None);
    }
}
