use axum::Router;

pub mod auth;
pub mod directory;
pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
///
/// Sub-routers have their state applied internally, so this returns a
/// stateless Router.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/auth", auth::router(state)) // Auth routes at /api/auth
        .nest("/directory", directory::router(state))
}

/// Creates a router with the /ready endpoint that performs actual health
/// checks against the backing services.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
