//! Bulk revocation: the logout-everywhere / anomaly-response path.

use crate::error::AuthResult;
use crate::store::SessionStore;

/// Deletes every session-related key a user owns.
///
/// Idempotent and safe to run against an empty keyspace, so it doubles as
/// the anomaly response (called mid-rotation on theft signals) and as an
/// explicit user/admin action.
#[derive(Clone)]
pub struct RevocationCoordinator {
    store: SessionStore,
}

impl RevocationCoordinator {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Delete all active records, family entries, and used markers for the
    /// user. Returns the number of keys removed.
    pub async fn revoke_all(&self, user_id: &str) -> AuthResult<u64> {
        let patterns = [
            format!("access:{}:*", user_id),
            format!("refresh:{}:*", user_id),
            format!("family:{}:*", user_id),
            format!("used:{}:*", user_id),
        ];

        let mut revoked = 0;
        for pattern in &patterns {
            revoked += self.store.delete_matching(pattern).await?;
        }

        tracing::info!(user_id, revoked, "revoked all sessions");
        Ok(revoked)
    }
}
