//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User account record.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub username: String,
    /// OpenSSH authorized-key line used for challenge verification.
    pub public_key: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Repository record.
#[derive(Debug, Clone, FromRow)]
pub struct RepositoryRow {
    pub repo_id: Uuid,
    pub name: String,
    pub description: String,
    /// Refreshed on every update and on each received commit signal.
    pub last_update: OffsetDateTime,
}
