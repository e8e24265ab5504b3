//! Repository lifecycle orchestration.
//!
//! Keeps the filesystem-resident bare repository and its metadata record
//! consistent across create/rename/delete. There is no shared transaction
//! between the two resources; multi-step operations record compensating
//! actions that run best-effort when a later step fails. A crash between
//! steps can still leave the two sides inconsistent.

use crate::error::{ApiError, ApiResult};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;
use warden_gitstore::RepositoryBackend;
use warden_metadata::models::RepositoryRow;
use warden_metadata::{MetadataStore, RepositoryRepo};

/// An ordered list of compensating actions.
///
/// Each completed forward step pushes its reverse step; on a later failure
/// the recorded steps run in reverse order. Reverse-step failures are logged
/// and never propagated — the caller always sees the original error.
struct Rollback {
    steps: Vec<(&'static str, Pin<Box<dyn Future<Output = ApiResult<()>> + Send>>)>,
}

impl Rollback {
    fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn push<F>(&mut self, label: &'static str, step: F)
    where
        F: Future<Output = ApiResult<()>> + Send + 'static,
    {
        self.steps.push((label, Box::pin(step)));
    }

    async fn run(self) {
        for (label, step) in self.steps.into_iter().rev() {
            if let Err(err) = step.await {
                tracing::error!(step = label, error = %err, "compensating action failed");
            }
        }
    }
}

/// Orchestrates RepositoryBackend and MetadataStore for repository
/// create/rename/delete.
pub struct RepositoryLifecycleManager {
    metadata: Arc<dyn MetadataStore>,
    backend: Arc<dyn RepositoryBackend>,
    root: PathBuf,
}

impl RepositoryLifecycleManager {
    /// Create a new lifecycle manager rooted at `root`.
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        backend: Arc<dyn RepositoryBackend>,
        root: PathBuf,
    ) -> Self {
        Self {
            metadata,
            backend,
            root,
        }
    }

    /// Derive the filesystem path for a repository name.
    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.git"))
    }

    /// Validate a repository name: non-empty, no path separators, no
    /// traversal components.
    fn validate_name(name: &str) -> ApiResult<()> {
        if name.is_empty() {
            return Err(ApiError::Validation(
                "repository name is required".to_string(),
            ));
        }
        let safe = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !safe || name == "." || name == ".." {
            return Err(ApiError::Validation(format!(
                "invalid repository name: {name}"
            )));
        }
        Ok(())
    }

    /// Create a bare repository on disk, then persist its metadata record.
    ///
    /// There is no compensating deletion of the filesystem repository when
    /// metadata persistence fails; a failed create can leave an orphaned
    /// directory under the repository root.
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        language_hint: Option<&str>,
    ) -> ApiResult<RepositoryRow> {
        Self::validate_name(name)?;

        let path = self.repo_path(name);
        tracing::info!(name, path = %path.display(), "creating repository");
        self.backend.create(&path, language_hint).await?;

        let record = RepositoryRow {
            repo_id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            last_update: OffsetDateTime::now_utc(),
        };
        self.metadata.create_repository(&record).await?;
        Ok(record)
    }

    /// Rename on disk, then persist. A persistence failure reverses the
    /// rename best-effort and returns the original error.
    pub async fn update(
        &self,
        repo_id: Uuid,
        name: &str,
        description: &str,
    ) -> ApiResult<RepositoryRow> {
        Self::validate_name(name)?;

        let current = self
            .metadata
            .get_repository(repo_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("repository {repo_id} not found")))?;

        let mut rollback = Rollback::new();

        let old_path = self.repo_path(&current.name);
        let new_path = self.repo_path(name);
        if old_path != new_path {
            tracing::info!(from = %old_path.display(), to = %new_path.display(), "renaming repository");
            self.backend.rename(&old_path, &new_path).await?;

            let backend = self.backend.clone();
            let (from, to) = (new_path.clone(), old_path.clone());
            rollback.push("rename repository back", async move {
                backend.rename(&from, &to).await.map_err(ApiError::from)
            });
        }

        let record = RepositoryRow {
            repo_id,
            name: name.to_string(),
            description: description.to_string(),
            last_update: OffsetDateTime::now_utc(),
        };
        match self.metadata.update_repository(&record).await {
            Ok(()) => Ok(record),
            Err(err) => {
                rollback.run().await;
                Err(err.into())
            }
        }
    }

    /// Delete the metadata record, then the filesystem repository. A
    /// filesystem failure re-creates the record best-effort and returns the
    /// original error.
    pub async fn delete(&self, repo_id: Uuid) -> ApiResult<()> {
        let current = self
            .metadata
            .get_repository(repo_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("repository {repo_id} not found")))?;

        let mut rollback = Rollback::new();

        self.metadata.delete_repository(repo_id).await?;
        {
            let metadata = self.metadata.clone();
            // The store's create path always assigns a fresh id; the
            // compensating record does not keep identity with the original.
            let record = RepositoryRow {
                repo_id: Uuid::new_v4(),
                name: current.name.clone(),
                description: current.description.clone(),
                last_update: OffsetDateTime::now_utc(),
            };
            rollback.push("recreate repository record", async move {
                metadata.create_repository(&record).await.map_err(ApiError::from)
            });
        }

        let path = self.repo_path(&current.name);
        tracing::info!(name = %current.name, path = %path.display(), "deleting repository");
        match self.backend.delete(&path).await {
            Ok(()) => Ok(()),
            Err(err) => {
                rollback.run().await;
                Err(err.into())
            }
        }
    }

    /// Get a repository by id.
    pub async fn get(&self, repo_id: Uuid) -> ApiResult<RepositoryRow> {
        self.metadata
            .get_repository(repo_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("repository {repo_id} not found")))
    }

    /// Get a repository by name.
    pub async fn get_by_name(&self, name: &str) -> ApiResult<RepositoryRow> {
        self.metadata
            .get_repository_by_name(name)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("repository '{name}' not found")))
    }

    /// List all repositories.
    pub async fn list(&self) -> ApiResult<Vec<RepositoryRow>> {
        Ok(self.metadata.list_repositories().await?)
    }
}
