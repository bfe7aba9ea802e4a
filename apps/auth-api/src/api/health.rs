use axum::{extract::State, response::IntoResponse, response::Response};
use axum_helpers::server::{run_health_checks, HealthCheckFuture};

use crate::state::AppState;

/// Readiness probe: verifies the backing Redis answers PING.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let mut redis = state.redis.clone();

    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "redis",
        Box::pin(async move {
            database::redis::check_health(&mut redis)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    match run_health_checks(checks).await {
        Ok(ok) => ok.into_response(),
        Err(err) => err.into_response(),
    }
}
