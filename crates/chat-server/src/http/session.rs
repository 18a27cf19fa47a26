use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Response;
use shared::conversation::ConversationHistory;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE_NAME: &str = "admissions_session";

/// Per-client conversation state kept in process memory, keyed by the id carried
/// in the session cookie.
#[derive(Clone)]
pub struct SessionStore {
    entries: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

#[derive(Debug)]
struct SessionEntry {
    history: ConversationHistory,
    last_seen: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle {
    pub id: Uuid,
    /// True when the id was minted for this request and must be sent back as a cookie.
    pub is_new: bool,
}

impl SessionStore {
    /// At most `max_sessions` conversations are held; starting one more evicts the
    /// least recently seen.
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn spawn_pruner(&self, interval: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                store.prune_at(Instant::now());
            }
        })
    }

    /// Returns the caller's live session, or starts a new one when the cookie is
    /// missing, malformed, or names a session this process does not hold.
    pub fn resolve(&self, headers: &HeaderMap) -> SessionHandle {
        self.resolve_at(headers, Instant::now())
    }

    fn resolve_at(&self, headers: &HeaderMap, now: Instant) -> SessionHandle {
        let mut entries = self.lock_entries();

        if let Some(id) = session_id_from_headers(headers)
            && let Some(entry) = entries.get_mut(&id)
            && now.saturating_duration_since(entry.last_seen) <= self.idle_ttl
        {
            entry.last_seen = now;
            return SessionHandle { id, is_new: false };
        }

        if entries.len() >= self.max_sessions {
            evict_least_recently_seen(&mut entries);
        }

        let id = Uuid::new_v4();
        entries.insert(
            id,
            SessionEntry {
                history: ConversationHistory::new(),
                last_seen: now,
            },
        );
        debug!(session_id = %id, "started chat session");

        SessionHandle { id, is_new: true }
    }

    /// Snapshot of the session's turns; empty for unknown sessions.
    pub fn history(&self, id: Uuid) -> ConversationHistory {
        self.lock_entries()
            .get(&id)
            .map(|entry| entry.history.clone())
            .unwrap_or_default()
    }

    /// Replaces the stored history. Concurrent writers for one session: last write wins.
    pub fn store_history(&self, id: Uuid, history: ConversationHistory) {
        let now = Instant::now();
        let mut entries = self.lock_entries();
        let entry = entries.entry(id).or_insert_with(|| SessionEntry {
            history: ConversationHistory::new(),
            last_seen: now,
        });
        entry.history = history;
        entry.last_seen = now;
    }

    pub fn clear(&self, id: Uuid) {
        if let Some(entry) = self.lock_entries().get_mut(&id) {
            entry.history.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune_at(&self, now: Instant) {
        let mut entries = self.lock_entries();
        let before = entries.len();
        entries.retain(|_, entry| now.saturating_duration_since(entry.last_seen) <= self.idle_ttl);
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = entries.len(), "evicted idle chat sessions");
        }
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.entries
            .lock()
            .expect("session store mutex should not be poisoned")
    }
}

fn evict_least_recently_seen(entries: &mut HashMap<Uuid, SessionEntry>) {
    let oldest = entries
        .iter()
        .min_by_key(|(_, entry)| entry.last_seen)
        .map(|(id, _)| *id);
    if let Some(id) = oldest {
        entries.remove(&id);
        debug!(session_id = %id, "evicted oldest chat session at capacity");
    }
}

pub(super) fn attach_session_cookie(mut response: Response, session: SessionHandle) -> Response {
    if session.is_new {
        response
            .headers_mut()
            .append(header::SET_COOKIE, session_cookie(session.id));
    }
    response
}

fn session_cookie(id: Uuid) -> HeaderValue {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE_NAME}={id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .expect("uuid cookie should be a valid header value")
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
