//! User repository.

use crate::error::MetadataResult;
use crate::models::UserRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for user operations.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Create a user. Fails with `AlreadyExists` if the username is taken.
    async fn create_user(&self, user: &UserRow) -> MetadataResult<()>;

    /// Get a user by id.
    async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>>;

    /// Get a user by username.
    async fn get_user_by_username(&self, username: &str) -> MetadataResult<Option<UserRow>>;

    /// Update username, public key and updated-at for an existing user.
    async fn update_user(&self, user: &UserRow) -> MetadataResult<()>;

    /// List all users ordered by username.
    async fn list_users(&self) -> MetadataResult<Vec<UserRow>>;

    /// Delete a user by id.
    async fn delete_user(&self, user_id: Uuid) -> MetadataResult<()>;

    /// Get the stored public key for a username.
    async fn get_public_key_by_username(&self, username: &str) -> MetadataResult<Option<String>>;
}
