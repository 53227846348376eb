//! Expiring, in-memory conversation histories.
//!
//! Each session's history sits behind its own async mutex. Whoever holds the
//! lock owns the conversation until the guard drops, so two requests for the
//! same session run one after the other instead of interleaving turns.

use frontdesk_core::{SessionId, Turn};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

struct SessionEntry {
    history: Arc<Mutex<Vec<Turn>>>,
    last_touched: Instant,
}

impl SessionEntry {
    fn new(now: Instant) -> Self {
        Self {
            history: Arc::new(Mutex::new(Vec::new())),
            last_touched: now,
        }
    }

    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_touched) > ttl
    }
}

/// Store of live sessions keyed by [`SessionId`].
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store whose sessions expire after `ttl` without access.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get the session for `id`, creating it if absent or expired, and mark
    /// it as touched now.
    pub async fn history(&self, id: &SessionId) -> SessionHandle {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let entry = sessions
            .entry(id.clone())
            .and_modify(|entry| {
                if entry.is_expired(now, self.ttl) {
                    debug!(session = %id, "Session expired, starting fresh");
                    *entry = SessionEntry::new(now);
                }
            })
            .or_insert_with(|| {
                debug!(session = %id, "Creating session");
                SessionEntry::new(now)
            });
        entry.last_touched = now;

        SessionHandle {
            id: id.clone(),
            history: entry.history.clone(),
        }
    }

    /// Whether a live (unexpired) session exists for `id`.
    pub async fn contains(&self, id: &SessionId) -> bool {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .get(id)
            .is_some_and(|entry| !entry.is_expired(now, self.ttl))
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop a session. Returns whether a live one existed.
    pub async fn remove(&self, id: &SessionId) -> bool {
        let now = Instant::now();
        self.sessions
            .write()
            .await
            .remove(id)
            .is_some_and(|entry| !entry.is_expired(now, self.ttl))
    }

    /// Remove every expired session, returning how many were removed.
    ///
    /// A session whose history is locked by an in-flight turn is kept.
    pub async fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            !entry.is_expired(now, self.ttl) || entry.history.try_lock().is_err()
        });
        before - sessions.len()
    }

    /// Evict expired sessions every `interval` until the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                let evicted = store.evict_expired().await;
                if evicted > 0 {
                    debug!(evicted, "Swept expired sessions");
                }
            }
        })
    }
}

/// Shared reference to one session's history.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    history: Arc<Mutex<Vec<Turn>>>,
}

impl SessionHandle {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Wait for exclusive access to the history.
    pub async fn lock(&self) -> HistoryGuard {
        HistoryGuard {
            turns: self.history.clone().lock_owned().await,
        }
    }
}

/// Exclusive access to a session history. Append-only, except for rolling
/// back a turn that panicked.
pub struct HistoryGuard {
    turns: OwnedMutexGuard<Vec<Turn>>,
}

impl HistoryGuard {
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.turns.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Owned copy of the history, for building a model request.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }
}
