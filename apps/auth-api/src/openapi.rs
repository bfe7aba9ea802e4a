use utoipa::OpenApi;

/// Auth API documentation
///
/// The auth endpoints live under `/api/auth`:
/// - `POST /login`: issue an access/refresh pair for an identified user
/// - `POST /login/refresh`: rotate a refresh token (bearer or raw)
/// - `POST /logout`: end the presented token's session
/// - `POST /logout/all`: revoke every session (requires access token)
/// - `GET /me`: identity carried by the presented access token
#[derive(OpenApi)]
#[openapi(
    components(schemas(
        domain_sessions::models::LoginRequest,
        domain_sessions::models::SessionInfo,
        domain_sessions::models::RevokeAllResponse,
        domain_sessions::TokenPair,
        domain_sessions::UserRecord,
        axum_helpers::ErrorResponse,
        axum_helpers::ErrorCode,
    )),
    tags(
        (name = "auth", description = "Session issuance, rotation, and revocation"),
        (name = "directory", description = "Development user-directory seeding")
    )
)]
pub struct ApiDoc;
