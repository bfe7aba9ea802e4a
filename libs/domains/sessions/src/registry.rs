//! Session registry: issues sessions and answers "is this token still the
//! live one".

use chrono::Utc;
use uuid::Uuid;

use crate::codec::TokenCodec;
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::family::FamilyLedger;
use crate::models::{TokenClaims, TokenMode, TokenPair, VerifiedIdentity};
use crate::store::{active_key, used_key, SessionStore};

/// Result of a login: the new session, its family, and the signed pair.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub session_id: String,
    pub family_id: String,
    pub tokens: TokenPair,
}

/// Maps a (user, session) pair to the currently-active access/refresh token
/// identifiers.
///
/// At most one `jti` is active per (user, session, mode); a presented token
/// whose `jti` differs from the recorded one is stale, however valid its
/// signature.
#[derive(Clone)]
pub struct SessionRegistry {
    codec: TokenCodec,
    store: SessionStore,
    ledger: FamilyLedger,
    config: AuthConfig,
}

impl SessionRegistry {
    pub fn new(store: SessionStore, config: AuthConfig) -> Self {
        Self {
            codec: TokenCodec::new(config.secret.clone()),
            ledger: FamilyLedger::new(store.clone()),
            store,
            config,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &SessionStore {
        &self.store
    }

    pub(crate) fn ledger(&self) -> &FamilyLedger {
        &self.ledger
    }

    /// Sign a fresh token of the given mode, returning the token and its jti.
    fn mint(
        &self,
        user_id: &str,
        mode: TokenMode,
        session_id: &str,
        family_id: Option<&str>,
    ) -> AuthResult<(String, String)> {
        let ttl = match mode {
            TokenMode::Access => self.config.access_ttl,
            TokenMode::Refresh => self.config.refresh_ttl,
        };
        let now = Utc::now().timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = TokenClaims {
            sub: user_id.to_string(),
            exp: now + ttl,
            iat: now,
            mode,
            jti: Some(jti.clone()),
            session_id: Some(session_id.to_string()),
            family: family_id.map(|f| f.to_string()),
        };

        let token = self.codec.sign(&claims)?;
        Ok((token, jti))
    }

    /// Open a new session: fresh session id, fresh family, signed pair,
    /// active records written with their mode's TTL.
    ///
    /// No side effect on failure other than possibly-written records that the
    /// next login for the session id would never match (the ids are random).
    pub async fn issue(&self, user_id: &str) -> AuthResult<IssuedSession> {
        let session_id = Uuid::new_v4().to_string();
        let family_id = Uuid::new_v4().to_string();

        let access_token = self.issue_access(user_id, &session_id).await?;
        let refresh_token = self
            .issue_refresh(user_id, &session_id, &family_id)
            .await?;

        self.ledger
            .open(user_id, &family_id, self.config.refresh_ttl as u64)
            .await?;

        tracing::info!(user_id, session_id, "session issued");

        Ok(IssuedSession {
            session_id,
            family_id,
            tokens: TokenPair {
                access_token,
                refresh_token,
            },
        })
    }

    /// Issue a new access token bound to an existing session.
    pub async fn issue_access(&self, user_id: &str, session_id: &str) -> AuthResult<String> {
        let (token, jti) = self.mint(user_id, TokenMode::Access, session_id, None)?;

        self.store
            .set_with_ttl(
                &active_key(TokenMode::Access, user_id, session_id),
                &jti,
                self.config.access_ttl as u64,
            )
            .await?;

        Ok(token)
    }

    /// Issue a new refresh token under an existing family.
    pub(crate) async fn issue_refresh(
        &self,
        user_id: &str,
        session_id: &str,
        family_id: &str,
    ) -> AuthResult<String> {
        let (token, jti) = self.mint(user_id, TokenMode::Refresh, session_id, Some(family_id))?;

        self.store
            .set_with_ttl(
                &active_key(TokenMode::Refresh, user_id, session_id),
                &jti,
                self.config.refresh_ttl as u64,
            )
            .await?;

        Ok(token)
    }

    /// Verify a presented token against registry and ledger state.
    ///
    /// Decode failures surface as [`AuthError::Malformed`] or
    /// [`AuthError::Expired`]. A mode mismatch is `Malformed` too: an access
    /// token at the refresh endpoint is not a rotation input.
    ///
    /// Refresh tokens are additionally checked, in order, against the
    /// used-marker (→ [`AuthError::ReuseDetected`]), the family ledger
    /// (→ [`AuthError::FamilyInvalid`], missing family field →
    /// [`AuthError::MalformedStructure`]), and only then the active record
    /// (mismatch → [`AuthError::Superseded`]).
    ///
    /// This is a read-only check: callers decide whether a cascading
    /// rejection should actually trigger revocation.
    pub async fn verify(
        &self,
        token: &str,
        expected_mode: TokenMode,
    ) -> AuthResult<VerifiedIdentity> {
        let claims = self.codec.verify(token)?;

        if claims.mode != expected_mode {
            return Err(AuthError::Malformed);
        }

        // A refresh token missing its rotation fields is a tamper signal;
        // an access token missing them is just malformed.
        let missing = match expected_mode {
            TokenMode::Refresh => AuthError::MalformedStructure,
            TokenMode::Access => AuthError::Malformed,
        };
        let jti = match claims.jti {
            Some(ref jti) => jti.clone(),
            None => return Err(missing),
        };
        let session_id = match claims.session_id {
            Some(ref sid) => sid.clone(),
            None => return Err(missing),
        };

        if expected_mode == TokenMode::Refresh {
            let family_id = match claims.family.as_deref() {
                Some(f) => f,
                None => return Err(AuthError::MalformedStructure),
            };

            if self.store.exists(&used_key(&claims.sub, &jti)).await? {
                return Err(AuthError::ReuseDetected);
            }

            if !self.ledger.is_live(&claims.sub, family_id).await? {
                return Err(AuthError::FamilyInvalid);
            }
        }

        match self
            .store
            .get(&active_key(expected_mode, &claims.sub, &session_id))
            .await?
        {
            Some(ref stored) if *stored == jti => {}
            _ => return Err(AuthError::Superseded),
        }

        Ok(VerifiedIdentity {
            user_id: claims.sub,
            session_id,
            jti,
            mode: claims.mode,
            family: claims.family,
        })
    }

    /// Tear down one session by dropping both active records.
    ///
    /// Benign and idempotent: used by logout, never by the anomaly path.
    /// The family is left to lapse on its own TTL: closing it here would
    /// turn a late duplicate of this logout's token into a theft-class
    /// rejection and take the user's other sessions down with it.
    pub async fn end_session(&self, identity: &VerifiedIdentity) -> AuthResult<()> {
        self.store
            .delete(&active_key(
                TokenMode::Access,
                &identity.user_id,
                &identity.session_id,
            ))
            .await?;
        self.store
            .delete(&active_key(
                TokenMode::Refresh,
                &identity.user_id,
                &identity.session_id,
            ))
            .await?;

        tracing::info!(
            user_id = %identity.user_id,
            session_id = %identity.session_id,
            "session ended"
        );

        Ok(())
    }
}
