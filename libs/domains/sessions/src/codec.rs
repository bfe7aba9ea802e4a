//! Signed token codec.
//!
//! Encodes and decodes the compact HS256 credential. The codec only proves
//! authenticity and freshness of the claim set: liveness questions (rotated?
//! revoked? reused?) belong to the registry and ledger.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{AuthError, AuthResult};
use crate::models::TokenClaims;

/// Strip an optional `Bearer ` prefix from an Authorization header value.
pub fn strip_bearer(token: &str) -> &str {
    token
        .strip_prefix("Bearer ")
        .or_else(|| token.strip_prefix("bearer "))
        .unwrap_or(token)
        .trim()
}

/// HS256 signer/verifier for the session claim set.
#[derive(Clone)]
pub struct TokenCodec {
    secret: String,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign a claim set into a compact token string.
    pub fn sign(&self, claims: &TokenClaims) -> AuthResult<String> {
        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        encode(
            &header,
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Verify signature and expiry, returning the claim set.
    ///
    /// Accepts a bare token or a `Bearer `-prefixed header value. Expiry maps
    /// to [`AuthError::Expired`]; every other decode failure (bad signature,
    /// garbage payload, wrong algorithm) maps to [`AuthError::Malformed`].
    pub fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        let token = strip_bearer(token);

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Malformed,
        })?;

        Ok(token_data.claims)
    }
}
