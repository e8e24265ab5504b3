//! Repository-record repository.

use crate::error::MetadataResult;
use crate::models::RepositoryRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for repository-record operations.
#[async_trait]
pub trait RepositoryRepo: Send + Sync {
    /// Create a repository record. Fails with `AlreadyExists` if the name is
    /// taken.
    async fn create_repository(&self, repository: &RepositoryRow) -> MetadataResult<()>;

    /// Get a repository by id.
    async fn get_repository(&self, repo_id: Uuid) -> MetadataResult<Option<RepositoryRow>>;

    /// Get a repository by name.
    async fn get_repository_by_name(&self, name: &str) -> MetadataResult<Option<RepositoryRow>>;

    /// Update name, description and last-update for an existing repository.
    async fn update_repository(&self, repository: &RepositoryRow) -> MetadataResult<()>;

    /// List all repositories ordered by name.
    async fn list_repositories(&self) -> MetadataResult<Vec<RepositoryRow>>;

    /// Delete a repository record by id.
    async fn delete_repository(&self, repo_id: Uuid) -> MetadataResult<()>;
}
