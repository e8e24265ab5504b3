//! Push notification endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use time::OffsetDateTime;
use warden_metadata::RepositoryRepo;
use warden_metadata::models::RepositoryRow;

/// Notification that a commit was pushed to a repository.
#[derive(Debug, Deserialize)]
pub struct CommitSignalRequest {
    pub repository: String,
    pub commit: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

/// POST /v1/signals/commit - Refresh repository freshness after a push.
///
/// Only the repository's last-update timestamp changes; nothing is scheduled
/// or executed. This is the hook point for future build triggering.
pub async fn commit_signal(
    State(state): State<AppState>,
    Json(body): Json<CommitSignalRequest>,
) -> ApiResult<StatusCode> {
    let current = state
        .metadata
        .get_repository_by_name(&body.repository)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("repository '{}' not found", body.repository)))?;

    tracing::info!(
        repository = %body.repository,
        commit = %body.commit,
        branch = body.branch.as_deref().unwrap_or(""),
        tag = body.tag.as_deref().unwrap_or(""),
        "commit signal received"
    );

    let record = RepositoryRow {
        repo_id: current.repo_id,
        name: current.name,
        description: current.description,
        last_update: OffsetDateTime::now_utc(),
    };
    state.metadata.update_repository(&record).await?;
    Ok(StatusCode::NO_CONTENT)
}
