//! Development/admin glue for the in-memory user directory.
//!
//! Stands in for the external identity system: lets an operator (or a test
//! environment) seed the users the auth routes will accept.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_helpers::ValidatedJson;
use domain_sessions::UserRecord;

use crate::state::AppState;

/// Insert or replace a user record
async fn upsert_user(
    State(state): State<AppState>,
    ValidatedJson(record): ValidatedJson<UserRecord>,
) -> (StatusCode, Json<UserRecord>) {
    tracing::info!(user_id = %record.id, "directory record upserted");
    state.directory.upsert(record.clone()).await;
    (StatusCode::CREATED, Json(record))
}

pub fn router(state: &AppState) -> Router {
    Router::new()
        .route("/users", post(upsert_user))
        .with_state(state.clone())
}
