use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

use super::Session;

/// Identifier carried in the session cookie.
pub type SessionId = Uuid;

/// Shared handle to one session. Never hold the guard across an await.
pub type SessionHandle = Arc<Mutex<Session>>;

/// How long a session may sit unused before it is evicted.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(2 * 60 * 60);

/// Locks a session, recovering the data if a previous holder panicked.
pub fn lock(handle: &SessionHandle) -> MutexGuard<'_, Session> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

impl Entry {
    fn is_idle(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > timeout
    }
}

/// In-memory table of live sessions, one per browser.
///
/// A session ends when the user ends it or when it has been idle for longer
/// than the idle timeout. Idle sessions are swept whenever a new one is created.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, Entry>>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_idle_timeout(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::default(),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    fn table(&self) -> MutexGuard<'_, HashMap<SessionId, Entry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a fresh session seeded with welcome messages.
    pub fn create(&self) -> (SessionId, SessionHandle) {
        self.create_at(Instant::now())
    }

    fn create_at(&self, now: Instant) -> (SessionId, SessionHandle) {
        self.evict_idle_at(now);
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(Session::new()));
        self.table().insert(
            id,
            Entry {
                handle: handle.clone(),
                last_seen: now,
            },
        );
        log::info!("session {id} created");
        (id, handle)
    }

    /// Looks a session up and marks it as used. Idle sessions are not returned.
    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.get_at(id, Instant::now())
    }

    fn get_at(&self, id: &SessionId, now: Instant) -> Option<SessionHandle> {
        let mut table = self.table();
        if table.get(id)?.is_idle(now, self.idle_timeout) {
            table.remove(id);
            log::info!("session {id} expired");
            return None;
        }
        let entry = table.get_mut(id)?;
        entry.last_seen = now;
        Some(entry.handle.clone())
    }

    /// Resolves the caller's session, creating one when the id is absent, unknown or expired.
    /// The flag is `true` when a new session was created.
    pub fn get_or_create(&self, id: Option<SessionId>) -> (SessionId, SessionHandle, bool) {
        if let Some(id) = id {
            if let Some(handle) = self.get(&id) {
                return (id, handle, false);
            }
        }
        let (id, handle) = self.create();
        (id, handle, true)
    }

    /// Tears a session down. Returns whether it existed.
    pub fn end(&self, id: &SessionId) -> bool {
        let existed = self.table().remove(id).is_some();
        if existed {
            log::info!("session {id} ended");
        }
        existed
    }

    /// Drops every session idle for longer than the timeout. Returns how many were dropped.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    fn evict_idle_at(&self, now: Instant) -> usize {
        let mut table = self.table();
        let before = table.len();
        table.retain(|_, entry| !entry.is_idle(now, self.idle_timeout));
        let evicted = before - table.len();
        if evicted > 0 {
            log::info!("evicted {evicted} idle session(s)");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{chat::ChatMessage, mode::Mode};

    #[test]
    fn sessions_are_independent() {
        let registry = SessionRegistry::new();
        let (_, a) = registry.create();
        let (_, b) = registry.create();
        lock(&a).append(Mode::Chat, ChatMessage::user().content("only in a").build());
        assert_eq!(lock(&a).get(Mode::Chat).len(), 2);
        assert_eq!(lock(&b).get(Mode::Chat).len(), 1);
    }

    #[test]
    fn unknown_id_gets_fresh_session() {
        let registry = SessionRegistry::new();
        let (id, _, created) = registry.get_or_create(Some(Uuid::new_v4()));
        assert!(created);
        let (same, _, created) = registry.get_or_create(Some(id));
        assert!(!created);
        assert_eq!(same, id);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn end_removes_session() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.create();
        assert!(registry.end(&id));
        assert!(!registry.end(&id));
        assert!(registry.get(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let registry = SessionRegistry::with_idle_timeout(Duration::from_secs(60));
        let start = Instant::now();
        let (stale, _) = registry.create_at(start);
        let (active, _) = registry.create_at(start);

        let later = start + Duration::from_secs(45);
        assert!(registry.get_at(&active, later).is_some());
        assert_eq!(registry.evict_idle_at(later), 0);

        let much_later = start + Duration::from_secs(90);
        assert_eq!(registry.evict_idle_at(much_later), 1);
        assert!(registry.get_at(&stale, much_later).is_none());
        assert!(registry.get_at(&active, much_later).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn expired_id_is_not_returned() {
        let registry = SessionRegistry::with_idle_timeout(Duration::from_secs(60));
        let start = Instant::now();
        let (id, _) = registry.create_at(start);
        assert!(registry.get_at(&id, start + Duration::from_secs(61)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn creating_sweeps_idle_sessions() {
        let registry = SessionRegistry::with_idle_timeout(Duration::from_secs(60));
        let start = Instant::now();
        for _ in 0..100 {
            registry.create_at(start);
        }
        assert_eq!(registry.len(), 100);
        registry.create_at(start + Duration::from_secs(120));
        assert_eq!(registry.len(), 1);
    }
}
