//! Per-browser session state for random play.
//!
//! A session is created (with empty progress) the first time a request arrives
//! without a known session cookie. Each session's data sits behind its own
//! mutex; handlers hold it for the whole read-modify-write so two requests from
//! the same browser are applied one after the other.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::QuestionId;

/// Ids answered correctly in the current streak. Score is its length.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    #[serde(rename = "resueltos", default)]
    answered_ids: Vec<QuestionId>,
}

impl SessionProgress {
    pub fn answered_ids(&self) -> &[QuestionId] {
        &self.answered_ids
    }

    pub fn score(&self) -> usize {
        self.answered_ids.len()
    }

    /// Record a correct answer. Returns false if the id was already counted.
    pub fn record(&mut self, id: QuestionId) -> bool {
        if self.answered_ids.contains(&id) {
            return false;
        }
        self.answered_ids.push(id);
        true
    }

    pub fn reset(&mut self) {
        self.answered_ids.clear();
    }
}

/// Everything kept for one session: `{ "randomPlay": { "resueltos": [...] } }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(rename = "randomPlay", default)]
    pub random_play: SessionProgress,
}

struct Slot {
    data: Arc<Mutex<SessionData>>,
    last_seen: Instant,
}

/// Session id → data, keyed by the value of the session cookie.
pub struct SessionStore {
    slots: RwLock<HashMap<Uuid, Slot>>,
    cookie_name: String,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(cookie_name: impl Into<String>, idle_timeout: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            cookie_name: cookie_name.into(),
            idle_timeout,
        }
    }

    /// Resolve the session named by the request cookies, or start a new one.
    pub async fn open(&self, headers: &HeaderMap) -> PlaySession {
        let now = Instant::now();
        let mut slots = self.slots.write().await;

        if let Some(id) = session_id_from_cookies(headers, &self.cookie_name) {
            if let Some(slot) = slots.get_mut(&id) {
                if now.duration_since(slot.last_seen) <= self.idle_timeout {
                    slot.last_seen = now;
                    return PlaySession::existing(id, slot.data.clone());
                }
                debug!(target: "quiz_backend", session = %id, "Session expired");
            } else {
                debug!(target: "quiz_backend", session = %id, "Unknown session cookie");
            }
        }

        let before = slots.len();
        slots.retain(|_, s| now.duration_since(s.last_seen) <= self.idle_timeout);
        let purged = before - slots.len();
        if purged > 0 {
            info!(target: "quiz_backend", purged, "Purged idle sessions");
        }

        let id = Uuid::new_v4();
        let data = Arc::new(Mutex::new(SessionData::default()));
        slots.insert(id, Slot { data: data.clone(), last_seen: now });
        debug!(target: "quiz_backend", session = %id, live = slots.len(), "Session created");
        PlaySession::fresh(id, data, &self.cookie_name)
    }

    /// Forget a session, e.g. one created for a request that then failed.
    pub async fn discard(&self, id: Uuid) {
        if self.slots.write().await.remove(&id).is_some() {
            debug!(target: "quiz_backend", session = %id, "Session discarded");
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }
}

fn session_id_from_cookies(headers: &HeaderMap, name: &str) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .and_then(|(_, v)| Uuid::parse_str(v.trim()).ok())
}

/// Handle to the current request's session.
pub struct PlaySession {
    pub id: Uuid,
    data: Arc<Mutex<SessionData>>,
    set_cookie: Option<HeaderValue>,
}

impl PlaySession {
    fn existing(id: Uuid, data: Arc<Mutex<SessionData>>) -> Self {
        Self { id, data, set_cookie: None }
    }

    fn fresh(id: Uuid, data: Arc<Mutex<SessionData>>, cookie_name: &str) -> Self {
        let cookie = format!("{cookie_name}={id}; Path=/; HttpOnly; SameSite=Lax");
        let set_cookie = match HeaderValue::from_str(&cookie) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(target: "quiz_backend", error = %e, "Session cookie name is not a valid header value");
                None
            }
        };
        Self { id, data, set_cookie }
    }

    pub fn is_new(&self) -> bool {
        self.set_cookie.is_some()
    }

    /// Exclusive access to the session data until the guard is dropped.
    pub async fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.data.lock().await
    }

    /// Attach `Set-Cookie` to the response when this session was just created.
    pub fn respond(&self, body: impl IntoResponse) -> Response {
        let mut resp = body.into_response();
        if let Some(cookie) = &self.set_cookie {
            resp.headers_mut().append(SET_COOKIE, cookie.clone());
        }
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn record_is_idempotent() {
        let mut p = SessionProgress::default();
        assert!(p.record(3));
        assert!(!p.record(3));
        assert!(p.record(1));
        assert_eq!(p.answered_ids(), &[3, 1]);
        assert_eq!(p.score(), 2);
        p.reset();
        assert_eq!(p.score(), 0);
    }

    #[test]
    fn session_data_uses_persisted_shape() {
        let mut data = SessionData::default();
        data.random_play.record(7);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({ "randomPlay": { "resueltos": [7] } }));

        let back: SessionData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }

    #[tokio::test]
    async fn cookie_reopens_the_same_session() {
        let store = SessionStore::new("quiz.sid", Duration::from_secs(60));
        let first = store.open(&HeaderMap::new()).await;
        assert!(first.is_new());
        first.lock().await.random_play.record(5);

        let headers = cookie_headers(&format!("theme=dark; quiz.sid={}", first.id));
        let again = store.open(&headers).await;
        assert!(!again.is_new());
        assert_eq!(again.id, first.id);
        assert_eq!(again.lock().await.random_play.answered_ids(), &[5]);
    }

    #[tokio::test]
    async fn unknown_or_garbled_cookie_starts_a_new_session() {
        let store = SessionStore::new("quiz.sid", Duration::from_secs(60));
        let garbled = store.open(&cookie_headers("quiz.sid=not-a-uuid")).await;
        assert!(garbled.is_new());

        let unknown = store.open(&cookie_headers(&format!("quiz.sid={}", Uuid::new_v4()))).await;
        assert!(unknown.is_new());
        assert_eq!(unknown.lock().await.random_play.score(), 0);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn discarded_session_is_not_reopened() {
        let store = SessionStore::new("quiz.sid", Duration::from_secs(60));
        let first = store.open(&HeaderMap::new()).await;
        store.discard(first.id).await;
        assert_eq!(store.len().await, 0);

        let again = store.open(&cookie_headers(&format!("quiz.sid={}", first.id))).await;
        assert!(again.is_new());
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = SessionStore::new("quiz.sid", Duration::ZERO);
        let first = store.open(&HeaderMap::new()).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let again = store.open(&cookie_headers(&format!("quiz.sid={}", first.id))).await;
        assert!(again.is_new());
        assert_ne!(again.id, first.id);
        assert_eq!(store.len().await, 1);
    }
}
