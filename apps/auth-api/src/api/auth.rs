use axum::Router;
use domain_sessions::{auth_router, AuthState};

pub fn router(state: &crate::state::AppState) -> Router {
    let auth_state = AuthState::new(
        state.directory.clone(),
        state.registry.clone(),
        state.engine.clone(),
        state.revocation.clone(),
    );

    auth_router(auth_state)
}
