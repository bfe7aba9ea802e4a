//! Redis adapter for session state.
//!
//! Key scheme (shared with existing deployments, do not change):
//! - `access:<user_id>:<session_id>`  → active access `jti`
//! - `refresh:<user_id>:<session_id>` → active refresh `jti`
//! - `family:<user_id>:<family_id>`   → liveness sentinel
//! - `used:<user_id>:<jti>`           → consumed-refresh marker

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};

use crate::models::TokenMode;

/// Active-record key for a (user, session, mode) triple.
pub fn active_key(mode: TokenMode, user_id: &str, session_id: &str) -> String {
    format!("{}:{}:{}", mode.key_prefix(), user_id, session_id)
}

/// Family liveness key.
pub fn family_key(user_id: &str, family_id: &str) -> String {
    format!("family:{}:{}", user_id, family_id)
}

/// Consumed-refresh marker key.
pub fn used_key(user_id: &str, jti: &str) -> String {
    format!("used:{}:{}", user_id, jti)
}

/// Redis-backed store for session state
///
/// Thin adapter over a `ConnectionManager`: the manager reconnects on its
/// own and is cheap to clone, so one instance is shared by every handler.
#[derive(Clone)]
pub struct SessionStore {
    client: ConnectionManager,
}

impl SessionStore {
    pub fn new(manager: ConnectionManager) -> Self {
        tracing::info!("Session store initialized");
        Self { client: manager }
    }

    /// Cloned raw connection, for script invocations.
    pub(crate) fn connection(&self) -> ConnectionManager {
        self.client.clone()
    }

    /// Get a key's value
    pub async fn get(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.client.clone();
        conn.get(key).await
    }

    /// Set a key with a TTL in seconds
    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> RedisResult<()> {
        let mut conn = self.client.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    /// Delete a key (no-op if absent)
    pub async fn delete(&self, key: &str) -> RedisResult<()> {
        let mut conn = self.client.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> RedisResult<bool> {
        let mut conn = self.client.clone();
        conn.exists(key).await
    }

    /// Slide a key's TTL forward. Returns false if the key does not exist.
    pub async fn expire(&self, key: &str, ttl_seconds: i64) -> RedisResult<bool> {
        let mut conn = self.client.clone();
        conn.expire(key, ttl_seconds).await
    }

    /// Delete every key matching a pattern, returning the number deleted.
    ///
    /// Uses cursor SCAN + batched DEL rather than KEYS so a large keyspace
    /// never blocks the shared Redis.
    pub async fn delete_matching(&self, pattern: &str) -> RedisResult<u64> {
        let mut conn = self.client.clone();
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let removed: u64 = conn.del(&keys).await?;
                deleted += removed;
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_scheme_is_stable() {
        // Shared with existing deployments; a change here invalidates every
        // outstanding session.
        assert_eq!(active_key(TokenMode::Access, "u1", "s1"), "access:u1:s1");
        assert_eq!(active_key(TokenMode::Refresh, "u1", "s1"), "refresh:u1:s1");
        assert_eq!(family_key("u1", "f1"), "family:u1:f1");
        assert_eq!(used_key("u1", "j1"), "used:u1:j1");
    }
}
