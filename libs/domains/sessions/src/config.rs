//! Engine configuration.
//!
//! Lifetimes and the signing secret are passed in as an explicit value rather
//! than read from ambient process state, so the engine stays testable with
//! short TTLs and throwaway secrets.

use core_config::{env_or_default, env_required, ConfigError, FromEnv};

/// Default access-token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TOKEN_TTL: i64 = 900;
/// Default refresh-token lifetime: 7 days.
pub const DEFAULT_REFRESH_TOKEN_TTL: i64 = 604_800;
/// Default used-marker retention: 24 hours.
pub const DEFAULT_USED_RETENTION: i64 = 86_400;

/// Session engine configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - must be at least 32 characters
/// - `ACCESS_TOKEN_TTL_SECONDS` (default 900)
/// - `REFRESH_TOKEN_TTL_SECONDS` (default 604800)
/// - `USED_TOKEN_RETENTION_SECONDS` (default 86400)
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HS256 signing secret (minimum 32 characters)
    pub secret: String,
    /// Access-token lifetime in seconds
    pub access_ttl: i64,
    /// Refresh-token lifetime in seconds
    pub refresh_ttl: i64,
    /// How long a consumed refresh `jti` stays marked as used, in seconds.
    /// Effective TTL is capped at `refresh_ttl`: see [`used_marker_ttl`].
    ///
    /// [`used_marker_ttl`]: AuthConfig::used_marker_ttl
    pub used_retention: i64,
}

impl AuthConfig {
    /// Create a config with default lifetimes.
    ///
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self {
            secret,
            access_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            refresh_ttl: DEFAULT_REFRESH_TOKEN_TTL,
            used_retention: DEFAULT_USED_RETENTION,
        }
    }

    /// Create a config with explicit lifetimes (mainly for tests).
    ///
    /// # Panics
    /// Panics if the secret is less than 32 characters or any lifetime is
    /// not positive.
    pub fn with_lifetimes(
        secret: impl Into<String>,
        access_ttl: i64,
        refresh_ttl: i64,
        used_retention: i64,
    ) -> Self {
        assert!(
            access_ttl > 0 && refresh_ttl > 0 && used_retention > 0,
            "token lifetimes must be positive"
        );
        let mut config = Self::new(secret);
        config.access_ttl = access_ttl;
        config.refresh_ttl = refresh_ttl;
        config.used_retention = used_retention;
        config
    }

    /// Effective TTL for used markers.
    ///
    /// Never exceeds the refresh lifetime: once every token in a family has
    /// expired, there is nothing left to replay, so keeping markers longer
    /// only wastes memory.
    pub fn used_marker_ttl(&self) -> i64 {
        self.used_retention.min(self.refresh_ttl)
    }
}

impl FromEnv for AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters for security (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        let parse_ttl = |key: &str, default: i64| -> Result<i64, ConfigError> {
            let value: i64 = env_or_default(key, &default.to_string())
                .parse()
                .map_err(|e| ConfigError::ParseError {
                    key: key.to_string(),
                    details: format!("{}", e),
                })?;
            if value <= 0 {
                return Err(ConfigError::ParseError {
                    key: key.to_string(),
                    details: "must be a positive number of seconds".to_string(),
                });
            }
            Ok(value)
        };

        Ok(Self {
            secret,
            access_ttl: parse_ttl("ACCESS_TOKEN_TTL_SECONDS", DEFAULT_ACCESS_TOKEN_TTL)?,
            refresh_ttl: parse_ttl("REFRESH_TOKEN_TTL_SECONDS", DEFAULT_REFRESH_TOKEN_TTL)?,
            used_retention: parse_ttl("USED_TOKEN_RETENTION_SECONDS", DEFAULT_USED_RETENTION)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_new_uses_defaults() {
        let config = AuthConfig::new(SECRET);
        assert_eq!(config.access_ttl, DEFAULT_ACCESS_TOKEN_TTL);
        assert_eq!(config.refresh_ttl, DEFAULT_REFRESH_TOKEN_TTL);
        assert_eq!(config.used_retention, DEFAULT_USED_RETENTION);
    }

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_new_rejects_short_secret() {
        AuthConfig::new("short");
    }

    #[test]
    fn test_used_marker_ttl_is_capped_at_refresh_lifetime() {
        // Retention larger than the refresh lifetime must be clamped
        let config = AuthConfig::with_lifetimes(SECRET, 900, 3600, 999_999);
        assert_eq!(config.used_marker_ttl(), 3600);

        // Retention below the refresh lifetime wins
        let config = AuthConfig::with_lifetimes(SECRET, 900, 604_800, 3600);
        assert_eq!(config.used_marker_ttl(), 3600);
    }

    #[test]
    fn test_from_env_with_defaults() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("ACCESS_TOKEN_TTL_SECONDS", None),
                ("REFRESH_TOKEN_TTL_SECONDS", None),
                ("USED_TOKEN_RETENTION_SECONDS", None),
            ],
            || {
                let config = AuthConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.access_ttl, DEFAULT_ACCESS_TOKEN_TTL);
            },
        );
    }

    #[test]
    fn test_from_env_custom_lifetimes() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("ACCESS_TOKEN_TTL_SECONDS", Some("60")),
                ("REFRESH_TOKEN_TTL_SECONDS", Some("120")),
                ("USED_TOKEN_RETENTION_SECONDS", Some("240")),
            ],
            || {
                let config = AuthConfig::from_env().unwrap();
                assert_eq!(config.access_ttl, 60);
                assert_eq!(config.refresh_ttl, 120);
                // Cap applies even when the configured retention is larger
                assert_eq!(config.used_marker_ttl(), 120);
            },
        );
    }

    #[test]
    fn test_from_env_missing_secret() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = AuthConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_from_env_short_secret() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let err = AuthConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }

    #[test]
    fn test_from_env_rejects_non_positive_ttl() {
        temp_env::with_vars(
            [
                ("JWT_SECRET", Some(SECRET)),
                ("ACCESS_TOKEN_TTL_SECONDS", Some("0")),
            ],
            || {
                let err = AuthConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("ACCESS_TOKEN_TTL_SECONDS"));
            },
        );
    }
}
