//! HTTP request handlers.

pub mod auth;
pub mod repositories;
pub mod signals;
pub mod users;

pub use auth::{authenticate, bootstrap_login, issue_challenge};
pub use repositories::{
    create_repository, delete_repository, get_repository, get_repository_by_name,
    list_repositories, update_repository,
};
pub use signals::commit_signal;
pub use users::{create_user, delete_user, get_user, get_user_by_username, list_users, update_user};

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;
use warden_metadata::MetadataStore;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /v1/health - Health check.
///
/// Intentionally unauthenticated so load balancers and probes can reach it.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.metadata.health_check().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }))
}
