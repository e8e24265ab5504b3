//! Repository endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;
use warden_metadata::models::RepositoryRow;

/// Request to create a repository.
#[derive(Debug, Deserialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Language hint used to seed the initial ignore file.
    #[serde(default)]
    pub gitignore: Option<String>,
}

/// Request to update a repository.
#[derive(Debug, Deserialize)]
pub struct UpdateRepositoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Repository details.
#[derive(Debug, Serialize)]
pub struct RepositoryResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub last_update: String,
}

/// Response for listing repositories.
#[derive(Debug, Serialize)]
pub struct ListRepositoriesResponse {
    pub repositories: Vec<RepositoryResponse>,
}

fn repository_row_to_response(row: RepositoryRow) -> ApiResult<RepositoryResponse> {
    let last_update = row
        .last_update
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("failed to format last_update: {e}")))?;

    Ok(RepositoryResponse {
        id: row.repo_id.to_string(),
        name: row.name,
        description: row.description,
        last_update,
    })
}

/// POST /v1/repositories - Create a repository.
pub async fn create_repository(
    State(state): State<AppState>,
    Json(body): Json<CreateRepositoryRequest>,
) -> ApiResult<(StatusCode, Json<RepositoryResponse>)> {
    let record = state
        .lifecycle
        .create(&body.name, &body.description, body.gitignore.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(repository_row_to_response(record)?)))
}

/// GET /v1/repositories - List repositories.
pub async fn list_repositories(
    State(state): State<AppState>,
) -> ApiResult<Json<ListRepositoriesResponse>> {
    let repositories = state
        .lifecycle
        .list()
        .await?
        .into_iter()
        .map(repository_row_to_response)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(ListRepositoriesResponse { repositories }))
}

/// GET /v1/repositories/{repo_id} - Get a repository by id.
pub async fn get_repository(
    State(state): State<AppState>,
    Path(repo_id): Path<Uuid>,
) -> ApiResult<Json<RepositoryResponse>> {
    let record = state.lifecycle.get(repo_id).await?;
    Ok(Json(repository_row_to_response(record)?))
}

/// GET /v1/repositories/by-name/{name} - Get a repository by name.
pub async fn get_repository_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<RepositoryResponse>> {
    let record = state.lifecycle.get_by_name(&name).await?;
    Ok(Json(repository_row_to_response(record)?))
}

/// PUT /v1/repositories/{repo_id} - Update a repository.
pub async fn update_repository(
    State(state): State<AppState>,
    Path(repo_id): Path<Uuid>,
    Json(body): Json<UpdateRepositoryRequest>,
) -> ApiResult<Json<RepositoryResponse>> {
    let record = state
        .lifecycle
        .update(repo_id, &body.name, &body.description)
        .await?;
    Ok(Json(repository_row_to_response(record)?))
}

/// DELETE /v1/repositories/{repo_id} - Delete a repository.
pub async fn delete_repository(
    State(state): State<AppState>,
    Path(repo_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.lifecycle.delete(repo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
