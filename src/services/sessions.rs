use redis::aio::ConnectionManager;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use crate::models::PreferenceProfile;

/// Errors that can occur with session storage
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Handle to one session's profile
///
/// The mutex is the single-writer guard for that session: callers hold it
/// for the whole read-modify-write of the profile.
pub type SessionHandle = Arc<Mutex<PreferenceProfile>>;

/// Per-session preference profiles
///
/// Profiles live in an in-process cache (one mutex per session id, evicted
/// after an idle period). When Redis is configured, every update is also
/// written through as a JSON snapshot so another instance, or this one after
/// a restart, can pick the session up again.
pub struct SessionStore {
    sessions: moka::future::Cache<String, SessionHandle>,
    redis: Option<Arc<Mutex<ConnectionManager>>>,
    ttl_secs: u64,
}

impl SessionStore {
    /// Create an in-process store with no snapshot backend
    pub fn in_memory(max_sessions: u64, ttl_secs: u64) -> Self {
        let sessions = moka::future::CacheBuilder::new(max_sessions)
            .time_to_idle(Duration::from_secs(ttl_secs))
            .build();

        Self {
            sessions,
            redis: None,
            ttl_secs,
        }
    }

    /// Create a store that snapshots profiles to Redis
    pub async fn with_redis(redis_url: &str, max_sessions: u64, ttl_secs: u64) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let mut store = Self::in_memory(max_sessions, ttl_secs);
        store.redis = Some(Arc::new(Mutex::new(redis)));
        Ok(store)
    }

    /// Get the handle for `session_id`, creating the session if needed
    ///
    /// A session unknown to this process is restored from its Redis snapshot
    /// when one exists, otherwise it starts with every field unset.
    pub async fn session(&self, session_id: &str) -> SessionHandle {
        self.sessions
            .get_with(session_id.to_string(), async {
                let profile = match self.load_snapshot(session_id).await {
                    Ok(Some(profile)) => {
                        tracing::debug!("Restored session {} from snapshot", session_id);
                        profile
                    }
                    Ok(None) => PreferenceProfile::new(),
                    Err(e) => {
                        tracing::warn!("Failed to load snapshot for session {}: {}", session_id, e);
                        PreferenceProfile::new()
                    }
                };
                Arc::new(Mutex::new(profile))
            })
            .await
    }

    /// Look up an existing session without creating it
    pub async fn get(&self, session_id: &str) -> Option<PreferenceProfile> {
        if let Some(handle) = self.sessions.get(session_id).await {
            return Some(handle.lock().await.clone());
        }

        match self.load_snapshot(session_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Failed to load snapshot for session {}: {}", session_id, e);
                None
            }
        }
    }

    /// Write a snapshot of `profile` for `session_id` (no-op without Redis)
    pub async fn persist(&self, session_id: &str, profile: &PreferenceProfile) -> Result<(), SessionError> {
        let Some(redis) = &self.redis else {
            return Ok(());
        };

        let json = serde_json::to_string(profile)?;
        let mut conn = redis.lock().await;
        redis::cmd("SETEX")
            .arg(SessionKey::profile(session_id))
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Snapshot written: {}", session_id);
        Ok(())
    }

    async fn load_snapshot(&self, session_id: &str) -> Result<Option<PreferenceProfile>, SessionError> {
        let Some(redis) = &self.redis else {
            return Ok(None);
        };

        let mut conn = redis.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(SessionKey::profile(session_id))
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Number of sessions held in this process
    pub fn active_sessions(&self) -> u64 {
        self.sessions.entry_count()
    }

    /// Flush pending cache maintenance (eviction bookkeeping, counts)
    pub async fn sync(&self) {
        self.sessions.run_pending_tasks().await;
    }
}

/// Session key builder
pub struct SessionKey;

impl SessionKey {
    /// Build the snapshot key for a session profile
    pub fn profile(session_id: &str) -> String {
        format!("session:{}:profile", session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoomType, TriState};

    #[tokio::test]
    async fn test_new_session_starts_empty() {
        let store = SessionStore::in_memory(100, 60);
        let handle = store.session("s1").await;

        assert!(handle.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_same_session_shares_profile() {
        let store = SessionStore::in_memory(100, 60);

        {
            let handle = store.session("s1").await;
            let mut profile = handle.lock().await;
            profile.room_type = Some(RoomType::Pg);
        }

        let handle = store.session("s1").await;
        assert_eq!(handle.lock().await.room_type, Some(RoomType::Pg));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::in_memory(100, 60);

        {
            let handle = store.session("a").await;
            handle.lock().await.furnished = TriState::Yes;
        }

        let other = store.session("b").await;
        assert_eq!(other.lock().await.furnished, TriState::Unknown);
    }

    #[tokio::test]
    async fn test_get_does_not_create() {
        let store = SessionStore::in_memory(100, 60);

        assert!(store.get("missing").await.is_none());
        store.sync().await;
        assert_eq!(store.active_sessions(), 0);

        store.session("present").await;
        assert!(store.get("present").await.is_some());
        store.sync().await;
        assert_eq!(store.active_sessions(), 1);
    }

    #[tokio::test]
    async fn test_persist_without_redis_is_noop() {
        let store = SessionStore::in_memory(100, 60);
        assert!(store.persist("s1", &PreferenceProfile::new()).await.is_ok());
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_snapshot_round_trip() {
        let store = SessionStore::with_redis("redis://127.0.0.1:6379", 100, 60)
            .await
            .expect("Failed to connect to Redis");

        let profile = PreferenceProfile {
            budget: Some(11000),
            ..PreferenceProfile::default()
        };
        store.persist("snapshot-test", &profile).await.unwrap();

        let fresh = SessionStore::with_redis("redis://127.0.0.1:6379", 100, 60)
            .await
            .unwrap();
        assert_eq!(fresh.get("snapshot-test").await, Some(profile));
    }

    #[test]
    fn test_session_key_builder() {
        assert_eq!(SessionKey::profile("abc"), "session:abc:profile");
    }
}
