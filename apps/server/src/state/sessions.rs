//! # Session Store
//!
//! One cart per conversation session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SessionStore                                                           │
//! │  Mutex<HashMap<session_id, SessionEntry>>                               │
//! │     │                                                                   │
//! │     ├── "thread-a" ──► Arc<Mutex<Cart>>  last_active 12:00:04           │
//! │     ├── "thread-b" ──► Arc<Mutex<Cart>>  last_active 11:41:10           │
//! │     └── ...                                                             │
//! │                                                                         │
//! │  The map lock is held only to look up or insert an entry. Tool calls   │
//! │  then lock their own cart, so sessions never block each other.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use orderdesk_core::Cart;

/// A session's cart. Tool calls hold this lock for their whole duration.
pub type SharedCart = Arc<Mutex<Cart>>;

#[derive(Debug)]
struct SessionEntry {
    cart: SharedCart,
    last_active: Instant,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session's cart, creating an empty one on first use.
    pub async fn cart(&self, session_id: &str) -> SharedCart {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id = %session_id, "Opening session");
                SessionEntry {
                    cart: Arc::new(Mutex::new(Cart::new())),
                    last_active: Instant::now(),
                }
            });
        entry.last_active = Instant::now();
        entry.cart.clone()
    }

    /// Returns the cart only if the session already exists.
    pub async fn existing(&self, session_id: &str) -> Option<SharedCart> {
        let mut sessions = self.sessions.lock().await;
        sessions.get_mut(session_id).map(|entry| {
            entry.last_active = Instant::now();
            entry.cart.clone()
        })
    }

    /// Drops a session. Returns whether it existed.
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.lock().await.remove(session_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Evicts sessions idle for at least `idle`. Returns how many were dropped.
    pub async fn sweep(&self, idle: Duration) -> usize {
        self.sweep_at(Instant::now(), idle).await
    }

    async fn sweep_at(&self, now: Instant, idle: Duration) -> usize {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();

        sessions.retain(|_, entry| {
            // A locked cart is mid-operation
            let busy = entry.cart.try_lock().is_err();
            busy || now.saturating_duration_since(entry.last_active) < idle
        });

        before - sessions.len()
    }

    /// Runs [`SessionStore::sweep`] every `every` until the task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, idle: Duration, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = self.sweep(idle).await;
                if evicted > 0 {
                    let remaining = self.len().await;
                    info!(evicted, remaining, "Evicted idle sessions");
                }
            }
        })
    }
}
