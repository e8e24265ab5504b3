//! Repository backend trait definitions.

use crate::error::GitStoreResult;
use async_trait::async_trait;
use std::path::Path;

/// Materializes, renames and deletes bare repositories on disk.
#[async_trait]
pub trait RepositoryBackend: Send + Sync + 'static {
    /// Create a bare repository at `path`, seeded with an initial commit and
    /// a post-receive hook. `language_hint` selects an ignore-file template;
    /// a failed template fetch aborts the whole create.
    async fn create(&self, path: &Path, language_hint: Option<&str>) -> GitStoreResult<()>;

    /// Move a repository from `old_path` to `new_path`.
    async fn rename(&self, old_path: &Path, new_path: &Path) -> GitStoreResult<()>;

    /// Remove the repository at `path`. Removing a missing path is a no-op.
    async fn delete(&self, path: &Path) -> GitStoreResult<()>;
}
