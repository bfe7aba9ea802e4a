use core_config::{app_info, server::ServerConfig, AppInfo, FromEnv};
use database::redis::RedisConfig;
use domain_sessions::AuthConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the workspace libraries
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let redis = RedisConfig::from_env()?; // Required - will fail if not set
        let auth = AuthConfig::from_env()?; // Required - will fail without JWT_SECRET

        Ok(Self {
            app: app_info!(),
            redis,
            server,
            auth,
            environment,
        })
    }
}
