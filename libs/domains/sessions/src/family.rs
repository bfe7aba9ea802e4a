//! Refresh-token family ledger.
//!
//! A family is the lineage of refresh tokens produced by successive rotations
//! from one login. Liveness is presence of `family:<user>:<family>` in the
//! store; the TTL slides forward on every successful rotation, so a lineage
//! stays alive exactly as long as it keeps being used.

use redis::RedisResult;

use crate::store::{family_key, SessionStore};

/// Liveness sentinel stored under the family key.
const FAMILY_LIVE: &str = "1";

#[derive(Clone)]
pub struct FamilyLedger {
    store: SessionStore,
}

impl FamilyLedger {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Open a new family with the given TTL in seconds.
    pub async fn open(&self, user_id: &str, family_id: &str, ttl_seconds: u64) -> RedisResult<()> {
        self.store
            .set_with_ttl(&family_key(user_id, family_id), FAMILY_LIVE, ttl_seconds)
            .await
    }

    /// Whether the family is still live.
    pub async fn is_live(&self, user_id: &str, family_id: &str) -> RedisResult<bool> {
        self.store.exists(&family_key(user_id, family_id)).await
    }

    /// Slide the family's expiration forward (called on successful rotation).
    ///
    /// Returns false if the family lapsed in the meantime.
    pub async fn extend(
        &self,
        user_id: &str,
        family_id: &str,
        ttl_seconds: i64,
    ) -> RedisResult<bool> {
        self.store
            .expire(&family_key(user_id, family_id), ttl_seconds)
            .await
    }

    /// Close the family. Safe to call if it is already gone.
    pub async fn close(&self, user_id: &str, family_id: &str) -> RedisResult<()> {
        self.store.delete(&family_key(user_id, family_id)).await
    }
}
