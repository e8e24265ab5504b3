//! User endpoints.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;
use warden_metadata::UserRepo;
use warden_metadata::models::UserRow;

/// Request to create a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    /// OpenSSH authorized-key line for challenge verification.
    pub public_key: String,
}

/// Request to update a user.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub public_key: String,
}

/// User details. The stored public key is not echoed back.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Response for listing users.
#[derive(Debug, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
}

fn user_row_to_response(row: UserRow) -> ApiResult<UserResponse> {
    let created_at = row
        .created_at
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("failed to format created_at: {e}")))?;
    let updated_at = row
        .updated_at
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("failed to format updated_at: {e}")))?;

    Ok(UserResponse {
        id: row.user_id.to_string(),
        username: row.username,
        created_at,
        updated_at,
    })
}

fn validate_user_fields(username: &str, public_key: &str) -> ApiResult<()> {
    if username.trim().is_empty() {
        return Err(ApiError::Validation("username is required".to_string()));
    }
    if public_key.trim().is_empty() {
        return Err(ApiError::Validation("public_key is required".to_string()));
    }
    Ok(())
}

/// POST /v1/users - Create a user.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    validate_user_fields(&body.username, &body.public_key)?;

    let now = OffsetDateTime::now_utc();
    let record = UserRow {
        user_id: Uuid::new_v4(),
        username: body.username,
        public_key: body.public_key,
        created_at: now,
        updated_at: now,
    };
    state.metadata.create_user(&record).await?;
    tracing::info!(username = %record.username, "user created");
    Ok((StatusCode::CREATED, Json(user_row_to_response(record)?)))
}

/// GET /v1/users - List users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<ListUsersResponse>> {
    let users = state
        .metadata
        .list_users()
        .await?
        .into_iter()
        .map(user_row_to_response)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(ListUsersResponse { users }))
}

/// GET /v1/users/{user_id} - Get a user by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let record = state
        .metadata
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))?;
    Ok(Json(user_row_to_response(record)?))
}

/// GET /v1/users/by-username/{username} - Get a user by username.
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let record = state
        .metadata
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user '{username}' not found")))?;
    Ok(Json(user_row_to_response(record)?))
}

/// PUT /v1/users/{user_id} - Update a user.
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    validate_user_fields(&body.username, &body.public_key)?;

    let current = state
        .metadata
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))?;

    let record = UserRow {
        user_id,
        username: body.username,
        public_key: body.public_key,
        created_at: current.created_at,
        updated_at: OffsetDateTime::now_utc(),
    };
    state.metadata.update_user(&record).await?;
    Ok(Json(user_row_to_response(record)?))
}

/// DELETE /v1/users/{user_id} - Delete a user.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.metadata.delete_user(user_id).await?;
    tracing::info!(user_id = %user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
