use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_helpers::errors::{ErrorCode, ErrorResponse};
use thiserror::Error;

/// Rejection taxonomy for token verification and rotation.
///
/// The distinctions matter internally: some rejections are benign (a late
/// duplicate of an already-rotated request, an expired token), others are
/// treated as theft signals and trigger revocation of every session the user
/// has. Externally all of them collapse into the same generic 401 so a caller
/// cannot probe *why* a token failed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad signature, undecodable payload, or wrong token mode.
    #[error("Token is malformed")]
    Malformed,

    /// Structurally valid signature but fields required for rotation are
    /// missing. A refresh token without a family cannot be a legitimate
    /// rotation input.
    #[error("Invalid token structure")]
    MalformedStructure,

    /// Signature fine, `exp` in the past.
    #[error("Token expired")]
    Expired,

    /// The token was valid once but a later rotation, logout, or login
    /// replaced it.
    #[error("Token invalidated or superseded")]
    Superseded,

    /// A refresh token that was already consumed by a rotation was presented
    /// again. The primary theft signal.
    #[error("Token reuse detected")]
    ReuseDetected,

    /// The token's family ledger entry is absent or expired.
    #[error("Token family is not live")]
    FamilyInvalid,

    /// No such user in the directory.
    #[error("Unknown user")]
    UnknownUser,

    /// The user exists but is blocked.
    #[error("User is blocked")]
    Blocked,

    /// The user exists but has not verified their account.
    #[error("User is not verified")]
    NotVerified,

    /// Redis is unreachable or misbehaving. Retryable; never to be conflated
    /// with an auth rejection.
    #[error("Session store unavailable: {0}")]
    Store(#[from] redis::RedisError),

    /// Token signing or another unexpected internal failure.
    #[error("Internal auth error: {0}")]
    Internal(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Whether this rejection should trigger revocation of every session the
    /// user owns.
    ///
    /// Reuse of a consumed token, a dead or forged family, and a refresh
    /// token missing its rotation fields all indicate the credential chain
    /// may be compromised. Expired and superseded tokens do not: they show up
    /// in ordinary operation (late retries, logout, re-login).
    pub fn should_cascade(&self) -> bool {
        matches!(
            self,
            AuthError::MalformedStructure | AuthError::ReuseDetected | AuthError::FamilyInvalid
        )
    }

    /// Whether this is a token rejection (as opposed to an account or
    /// infrastructure problem).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::Malformed
                | AuthError::MalformedStructure
                | AuthError::Expired
                | AuthError::Superseded
                | AuthError::ReuseDetected
                | AuthError::FamilyInvalid
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // Every token rejection looks identical from the outside. The
            // cascade already happened (or didn't) before we got here.
            AuthError::Malformed
            | AuthError::MalformedStructure
            | AuthError::Expired
            | AuthError::Superseded
            | AuthError::ReuseDetected
            | AuthError::FamilyInvalid
            | AuthError::UnknownUser => {
                tracing::info!(kind = ?self, "authentication rejected");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::with_message(
                        ErrorCode::Unauthorized,
                        "Could not validate credentials",
                    ),
                )
            }
            AuthError::Blocked => (
                StatusCode::FORBIDDEN,
                ErrorResponse::with_message(ErrorCode::Forbidden, "User is blocked"),
            ),
            AuthError::NotVerified => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::with_message(
                    ErrorCode::UnprocessableEntity,
                    "User is not verified",
                ),
            ),
            AuthError::Store(e) => {
                tracing::error!("session store unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::from_code(ErrorCode::ServiceUnavailable),
                )
            }
            AuthError::Internal(msg) => {
                tracing::error!("internal auth error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::from_code(ErrorCode::InternalError),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_classification() {
        assert!(AuthError::ReuseDetected.should_cascade());
        assert!(AuthError::FamilyInvalid.should_cascade());
        assert!(AuthError::MalformedStructure.should_cascade());

        assert!(!AuthError::Malformed.should_cascade());
        assert!(!AuthError::Expired.should_cascade());
        assert!(!AuthError::Superseded.should_cascade());
        assert!(!AuthError::Blocked.should_cascade());
    }

    #[test]
    fn test_rejections_share_one_response() {
        // Information hiding: benign and cascading rejections must be
        // indistinguishable to the caller.
        let benign = AuthError::Superseded.into_response();
        let theft = AuthError::ReuseDetected.into_response();
        assert_eq!(benign.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(theft.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_store_failure_is_not_a_rejection() {
        let err = AuthError::Internal("sign".into());
        assert!(!err.is_rejection());
        assert!(!err.should_cascade());
    }
}
