//! Route configuration.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check (intentionally unauthenticated for probes)
        .route("/v1/health", get(handlers::health_check))
        // Authentication
        .route("/v1/auth/challenge", post(handlers::issue_challenge))
        .route("/v1/auth/authenticate", post(handlers::authenticate))
        .route("/v1/auth/bootstrap", post(handlers::bootstrap_login))
        // Repositories
        .route(
            "/v1/repositories",
            post(handlers::create_repository).get(handlers::list_repositories),
        )
        .route(
            "/v1/repositories/{repo_id}",
            get(handlers::get_repository)
                .put(handlers::update_repository)
                .delete(handlers::delete_repository),
        )
        .route(
            "/v1/repositories/by-name/{name}",
            get(handlers::get_repository_by_name),
        )
        // Users
        .route(
            "/v1/users",
            post(handlers::create_user).get(handlers::list_users),
        )
        .route(
            "/v1/users/{user_id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route(
            "/v1/users/by-username/{username}",
            get(handlers::get_user_by_username),
        )
        // Push signals
        .route("/v1/signals/commit", post(handlers::commit_signal));

    // Middleware layers are applied in reverse order (outermost first).
    // Order of execution: TraceLayer -> Auth -> Handler
    router
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
