//! Read-only boundary to the external identity system.
//!
//! The engine never owns user records; it only needs to know whether the
//! subject of a token still exists, is blocked, or is unverified before
//! issuing or rotating credentials.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AuthError, AuthResult};

/// The engine's view of a user record.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UserRecord {
    /// Opaque user identifier (the token `sub`)
    #[validate(length(min = 1, max = 128))]
    pub id: String,
    /// Blocked users are denied login and refresh
    #[serde(default)]
    pub blocked: bool,
    /// Unverified users are denied login and refresh
    #[serde(default = "default_verified")]
    pub verified: bool,
}

fn default_verified() -> bool {
    true
}

/// Reject a lookup result unless the account may hold a session.
pub fn check_account(record: Option<UserRecord>) -> AuthResult<UserRecord> {
    let record = record.ok_or(AuthError::UnknownUser)?;
    if record.blocked {
        return Err(AuthError::Blocked);
    }
    if !record.verified {
        return Err(AuthError::NotVerified);
    }
    Ok(record)
}

/// Lookup trait implemented by whatever holds user records.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by id. `Ok(None)` means "no such user", errors mean the
    /// directory itself failed.
    async fn find(&self, user_id: &str) -> AuthResult<Option<UserRecord>>;
}

/// In-memory implementation of UserDirectory (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a record.
    pub async fn upsert(&self, record: UserRecord) {
        let mut users = self.users.write().await;
        users.insert(record.id.clone(), record);
    }

    pub async fn remove(&self, user_id: &str) -> bool {
        let mut users = self.users.write().await;
        users.remove(user_id).is_some()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, user_id: &str) -> AuthResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, blocked: bool, verified: bool) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            blocked,
            verified,
        }
    }

    #[tokio::test]
    async fn test_upsert_and_find() {
        let directory = InMemoryUserDirectory::new();
        directory.upsert(user("u1", false, true)).await;

        let found = directory.find("u1").await.unwrap();
        assert_eq!(found.unwrap().id, "u1");

        let missing = directory.find("nobody").await.unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_check_account_rules() {
        assert!(matches!(check_account(None), Err(AuthError::UnknownUser)));
        assert!(matches!(
            check_account(Some(user("u1", true, true))),
            Err(AuthError::Blocked)
        ));
        assert!(matches!(
            check_account(Some(user("u1", false, false))),
            Err(AuthError::NotVerified)
        ));
        assert!(check_account(Some(user("u1", false, true))).is_ok());
    }

    #[test]
    fn test_record_deserialization_defaults() {
        // Records seeded from JSON may omit the flags
        let record: UserRecord = serde_json::from_str(r#"{"id":"u1"}"#).unwrap();
        assert!(!record.blocked);
        assert!(record.verified);
    }
}
