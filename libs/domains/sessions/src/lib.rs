//! Sessions Domain
//!
//! Issues, verifies, rotates, and revokes access/refresh token pairs, with
//! Redis as the single source of truth for "is this token currently valid".
//!
//! A login opens a *session* and a refresh-token *family*. Every successful
//! rotation retires the presented refresh token, marks its `jti` as used, and
//! issues a replacement pair under a fresh session id but the same family.
//! Presenting an already-rotated token again is treated as theft: the whole
//! family is revoked, along with every other session of the user.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints + access-token guard
//! └──────┬──────┘
//!        │
//! ┌──────▼──────────────┐
//! │ Registry / Rotation │  ← issue, verify, atomic rotate, revoke-all
//! └──────┬──────────────┘
//!        │
//! ┌──────▼──────┐
//! │ SessionStore│  ← Redis adapter (active records, families, used markers)
//! └─────────────┘
//! ```
//!
//! The only multi-key mutation, the rotation check-and-retire step, runs as a
//! single server-side Lua script so concurrent rotations of the same token
//! cannot both succeed.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_sessions::{
//!     AuthConfig, AuthState, InMemoryUserDirectory, RevocationCoordinator,
//!     RotationEngine, SessionRegistry, SessionStore,
//! };
//!
//! let store = SessionStore::new(redis_manager);
//! let config = AuthConfig::new("a-secret-that-is-at-least-32-chars!!");
//! let registry = SessionRegistry::new(store.clone(), config);
//! let revocation = RevocationCoordinator::new(store);
//! let engine = RotationEngine::new(registry.clone(), revocation.clone());
//!
//! let router = domain_sessions::handlers::auth_router(AuthState::new(
//!     InMemoryUserDirectory::new(),
//!     registry,
//!     engine,
//!     revocation,
//! ));
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod family;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod registry;
pub mod revocation;
pub mod rotation;
pub mod store;

// Re-export commonly used types
pub use codec::TokenCodec;
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use family::FamilyLedger;
pub use handlers::{auth_router, AuthState};
pub use identity::{InMemoryUserDirectory, UserDirectory, UserRecord};
pub use models::{TokenClaims, TokenMode, TokenPair, VerifiedIdentity};
pub use registry::{IssuedSession, SessionRegistry};
pub use revocation::RevocationCoordinator;
pub use rotation::{RotationEngine, RotationOutcome};
pub use store::SessionStore;
