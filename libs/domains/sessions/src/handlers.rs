//! HTTP boundary for the session engine.
//!
//! From the caller's side this surface is deliberately flat: every token
//! rejection, benign or theft-signal, produces the same generic 401. The
//! interesting distinctions live in [`crate::error::AuthError`] and in the
//! tracing events emitted on the cascade path.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_helpers::ValidatedJson;
use std::sync::Arc;

use crate::codec::strip_bearer;
use crate::error::{AuthError, AuthResult};
use crate::identity::{check_account, UserDirectory};
use crate::models::{LoginRequest, RevokeAllResponse, SessionInfo, TokenMode, TokenPair, VerifiedIdentity};
use crate::registry::SessionRegistry;
use crate::revocation::RevocationCoordinator;
use crate::rotation::RotationEngine;

/// Application state for the auth routes.
pub struct AuthState<D> {
    pub directory: Arc<D>,
    pub registry: SessionRegistry,
    pub engine: RotationEngine,
    pub revocation: RevocationCoordinator,
}

impl<D> Clone for AuthState<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            registry: self.registry.clone(),
            engine: self.engine.clone(),
            revocation: self.revocation.clone(),
        }
    }
}

impl<D: UserDirectory> AuthState<D> {
    pub fn new(
        directory: D,
        registry: SessionRegistry,
        engine: RotationEngine,
        revocation: RevocationCoordinator,
    ) -> Self {
        Self {
            directory: Arc::new(directory),
            registry,
            engine,
            revocation,
        }
    }
}

/// Pull a bearer-or-raw token out of the Authorization header.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| strip_bearer(v).to_string())
        .filter(|v| !v.is_empty())
}

/// Open a session for an identified user.
async fn login<D: UserDirectory + 'static>(
    State(state): State<AuthState<D>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AuthResult<Json<TokenPair>> {
    let user = check_account(state.directory.find(&input.user_id).await?)?;

    let issued = state.registry.issue(&user.id).await?;

    Ok(Json(issued.tokens))
}

/// Exchange a refresh token for a new access/refresh pair.
async fn refresh<D: UserDirectory + 'static>(
    State(state): State<AuthState<D>>,
    headers: HeaderMap,
) -> AuthResult<Json<TokenPair>> {
    let token = extract_token(&headers).ok_or(AuthError::Malformed)?;

    // The account checks need a subject, so decode first; the rotation
    // engine re-validates everything against the store atomically.
    let claims = state.registry.codec().verify(&token)?;
    check_account(state.directory.find(&claims.sub).await?)?;

    let pair = state.engine.rotate(&token).await?;

    Ok(Json(pair))
}

/// End the session the presented refresh token belongs to.
///
/// Idempotent: logging out with an already-dead token is not an error. It
/// also never escalates; a reused token at this endpoint gets a 204, not a
/// cascade (the rotation endpoint is where theft is judged).
async fn logout<D: UserDirectory + 'static>(
    State(state): State<AuthState<D>>,
    headers: HeaderMap,
) -> AuthResult<StatusCode> {
    let token = extract_token(&headers).ok_or(AuthError::Malformed)?;

    match state.registry.verify(&token, TokenMode::Refresh).await {
        Ok(identity) => {
            state.registry.end_session(&identity).await?;
            Ok(StatusCode::NO_CONTENT)
        }
        Err(
            AuthError::Superseded
            | AuthError::Expired
            | AuthError::ReuseDetected
            | AuthError::FamilyInvalid,
        ) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(e),
    }
}

/// Revoke every session of the authenticated user (logout-everywhere).
async fn logout_all<D: UserDirectory + 'static>(
    State(state): State<AuthState<D>>,
    Extension(identity): Extension<VerifiedIdentity>,
) -> AuthResult<Json<RevokeAllResponse>> {
    let revoked = state.revocation.revoke_all(&identity.user_id).await?;
    Ok(Json(RevokeAllResponse { revoked }))
}

/// Who am I, according to my access token?
async fn me(Extension(identity): Extension<VerifiedIdentity>) -> Json<SessionInfo> {
    Json(SessionInfo {
        user_id: identity.user_id,
        session_id: identity.session_id,
    })
}

/// Access-token guard.
///
/// Verifies the bearer token against the registry (signature, expiry, active
/// record) and inserts the [`VerifiedIdentity`] into request extensions.
pub async fn require_auth<D: UserDirectory + 'static>(
    State(state): State<AuthState<D>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = extract_token(&headers).ok_or(AuthError::Malformed)?;

    let identity = state.registry.verify(&token, TokenMode::Access).await?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Create the auth router.
pub fn auth_router<D: UserDirectory + 'static>(state: AuthState<D>) -> Router {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/logout/all", post(logout_all::<D>))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<D>,
        ));

    Router::new()
        .route("/login", post(login::<D>))
        .route("/login/refresh", post(refresh::<D>))
        .route("/logout", post(logout::<D>))
        .merge(protected)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_token_bearer_and_raw() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc123"));

        headers.insert("authorization", HeaderValue::from_static("abc123"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_extract_token_missing_or_empty() {
        let headers = HeaderMap::new();
        assert!(extract_token(&headers).is_none());

        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_token(&headers).is_none());
    }
}
