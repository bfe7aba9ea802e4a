//! Atomic refresh-token rotation.
//!
//! Two concurrent requests carrying the same refresh token must never both
//! succeed. The check-and-retire step therefore runs as a single server-side
//! Lua script: any read-then-write sequence issued from here would leave a
//! window where both callers pass the checks before either consumes the
//! token.

use crate::error::{AuthError, AuthResult};
use crate::models::{TokenMode, TokenPair};
use crate::registry::SessionRegistry;
use crate::revocation::RevocationCoordinator;
use crate::store::{active_key, used_key};
use uuid::Uuid;

/// Atomically checks and retires a refresh token.
///
/// KEYS[1] = active refresh record, KEYS[2] = used marker.
/// ARGV[1] = presented jti, ARGV[2] = used-marker TTL in seconds.
const ROTATE_REFRESH_TOKEN_SCRIPT: &str = r"
local refresh_key = KEYS[1]
local used_key = KEYS[2]
local expected_jti = ARGV[1]
local used_ttl_seconds = ARGV[2]

-- Already consumed by an earlier rotation?
if redis.call('EXISTS', used_key) == 1 then
    return 'REUSED'
end

-- Still the active token for this session?
local stored_jti = redis.call('GET', refresh_key)
if stored_jti ~= expected_jti then
    return 'INVALID'
end

-- Consume: mark used, retire the active record
redis.call('SETEX', used_key, used_ttl_seconds, 'used')
redis.call('DEL', refresh_key)

return 'OK'
";

/// Outcome of the atomic check-and-retire step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The presented token was the live one and has been consumed.
    Rotated,
    /// The token's jti already carries a used marker.
    Reused,
    /// The active record is absent or holds a different jti.
    Superseded,
}

/// The rotation engine: validates a presented refresh token, consumes it
/// atomically, and issues the replacement pair in the same family.
///
/// Suspicious rejections (reuse, dead family, missing rotation fields)
/// trigger [`RevocationCoordinator::revoke_all`] before the error is
/// reported: the credential chain may be compromised, so every session the
/// user owns is taken down.
#[derive(Clone)]
pub struct RotationEngine {
    registry: SessionRegistry,
    revocation: RevocationCoordinator,
}

impl RotationEngine {
    pub fn new(registry: SessionRegistry, revocation: RevocationCoordinator) -> Self {
        Self {
            registry,
            revocation,
        }
    }

    /// The opaque atomic step: one script invocation, one outcome.
    ///
    /// Callers never see the individual reads and writes, so nothing outside
    /// this function can accidentally reorder or split them.
    async fn try_rotate(
        &self,
        user_id: &str,
        session_id: &str,
        jti: &str,
    ) -> AuthResult<RotationOutcome> {
        let refresh_key = active_key(TokenMode::Refresh, user_id, session_id);
        let used = used_key(user_id, jti);
        let used_ttl = self.registry.config().used_marker_ttl();

        let script = redis::Script::new(ROTATE_REFRESH_TOKEN_SCRIPT);
        let mut conn = self.registry.store().connection();

        let result: String = script
            .key(&refresh_key)
            .key(&used)
            .arg(jti)
            .arg(used_ttl)
            .invoke_async(&mut conn)
            .await?;

        match result.as_str() {
            "OK" => Ok(RotationOutcome::Rotated),
            "REUSED" => Ok(RotationOutcome::Reused),
            "INVALID" => Ok(RotationOutcome::Superseded),
            other => Err(AuthError::Internal(format!(
                "unexpected rotation script reply: {}",
                other
            ))),
        }
    }

    /// Exchange a refresh token for a new access/refresh pair.
    ///
    /// The new pair lives under a fresh session id but keeps the family, and
    /// the family's TTL slides forward: an actively used lineage never
    /// lapses.
    pub async fn rotate(&self, token: &str) -> AuthResult<TokenPair> {
        let claims = self.registry.codec().verify(token)?;

        if claims.mode != TokenMode::Refresh {
            return Err(AuthError::Malformed);
        }

        let user_id = claims.sub;

        // A refresh token without its rotation fields cannot be a legitimate
        // rotation input: treat as tampering.
        let (jti, session_id, family_id) = match (claims.jti, claims.session_id, claims.family) {
            (Some(jti), Some(session_id), Some(family_id)) => (jti, session_id, family_id),
            _ => return self.cascade(&user_id, AuthError::MalformedStructure).await,
        };

        if !self
            .registry
            .ledger()
            .is_live(&user_id, &family_id)
            .await?
        {
            return self.cascade(&user_id, AuthError::FamilyInvalid).await;
        }

        match self.try_rotate(&user_id, &session_id, &jti).await? {
            RotationOutcome::Rotated => {}
            RotationOutcome::Reused => {
                return self.cascade(&user_id, AuthError::ReuseDetected).await;
            }
            // A stale-but-unconsumed token (late duplicate retry, logged-out
            // session) is denied without punishing the user.
            RotationOutcome::Superseded => return Err(AuthError::Superseded),
        }

        // The old token is consumed; mint the replacement pair under a fresh
        // session id, same family.
        let new_session_id = Uuid::new_v4().to_string();

        let refresh_token = self
            .registry
            .issue_refresh(&user_id, &new_session_id, &family_id)
            .await?;

        self.registry
            .ledger()
            .extend(&user_id, &family_id, self.registry.config().refresh_ttl)
            .await?;

        let access_token = self
            .registry
            .issue_access(&user_id, &new_session_id)
            .await?;

        tracing::info!(
            user_id,
            session_id = new_session_id,
            family_id,
            "refresh token rotated"
        );

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Revoke every session the user owns, then report the rejection upward.
    async fn cascade(&self, user_id: &str, rejection: AuthError) -> AuthResult<TokenPair> {
        tracing::warn!(
            user_id,
            kind = ?rejection,
            "suspicious refresh token, revoking all sessions"
        );
        self.revocation.revoke_all(user_id).await?;
        Err(rejection)
    }
}
