use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Token mode carried in the `mode` claim.
///
/// Validity rules differ per mode: access tokens are checked against their
/// active record only, refresh tokens additionally against the used-marker
/// and family ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TokenMode {
    #[serde(rename = "access_token")]
    Access,
    #[serde(rename = "refresh_token")]
    Refresh,
}

impl TokenMode {
    /// Redis key prefix for this mode's active records.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            TokenMode::Access => "access",
            TokenMode::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenMode::Access => write!(f, "access_token"),
            TokenMode::Refresh => write!(f, "refresh_token"),
        }
    }
}

/// Signed claim set.
///
/// Wire format: `{sub, exp, iat, mode, jti, session_id, family?}`. The token
/// content only proves authenticity and carries identifiers: whether the
/// token is *currently* valid is decided entirely by registry and ledger
/// state.
///
/// `jti`, `session_id`, and `family` are optional at the decode boundary so
/// that a structurally deficient (possibly tampered) token can still be
/// attributed to its `sub` for the revocation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: i64,
    /// Token mode
    pub mode: TokenMode,
    /// Unique token identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Session this token belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Refresh-token family (refresh mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// Access/refresh pair returned by login and rotation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of a successful verification: the decoded identity, with the
/// optional claims resolved to concrete values.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub session_id: String,
    pub jti: String,
    pub mode: TokenMode,
    pub family: Option<String>,
}

/// Login request body.
///
/// Credential verification happens upstream in the identity system; this
/// endpoint issues a session for an already-identified user.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
}

/// Response for the authenticated `/me` endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionInfo {
    pub user_id: String,
    pub session_id: String,
}

/// Response for `/logout/all`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RevokeAllResponse {
    /// Number of store entries removed
    pub revoked: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(
            serde_json::to_string(&TokenMode::Access).unwrap(),
            "\"access_token\""
        );
        assert_eq!(
            serde_json::to_string(&TokenMode::Refresh).unwrap(),
            "\"refresh_token\""
        );
    }

    #[test]
    fn test_mode_key_prefixes() {
        assert_eq!(TokenMode::Access.key_prefix(), "access");
        assert_eq!(TokenMode::Refresh.key_prefix(), "refresh");
    }

    #[test]
    fn test_claims_tolerate_missing_optional_fields() {
        // A token minted by some other issuer may omit jti/session_id/family;
        // decoding must not fail, classification happens later.
        let json = r#"{"sub":"u1","exp":1999999999,"iat":1700000000,"mode":"refresh_token"}"#;
        let claims: TokenClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "u1");
        assert!(claims.jti.is_none());
        assert!(claims.family.is_none());
    }

    #[test]
    fn test_claims_skip_absent_fields_on_serialize() {
        let claims = TokenClaims {
            sub: "u1".into(),
            exp: 1,
            iat: 0,
            mode: TokenMode::Access,
            jti: Some("j1".into()),
            session_id: Some("s1".into()),
            family: None,
        };
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("family"));
        assert!(json.contains("\"jti\":\"j1\""));
    }
}
