//! Bare-repository backend driving the git CLI.

use crate::error::{GitStoreError, GitStoreResult};
use crate::hook;
use crate::traits::RepositoryBackend;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Repository backend that shells out to the git CLI.
pub struct GitCliBackend {
    ignore_template_base_url: String,
    signal_url: String,
    http: reqwest::Client,
}

impl GitCliBackend {
    /// Create a new backend.
    ///
    /// `ignore_template_base_url` is the template source queried as
    /// `<base>/<hint>.gitignore`; `signal_url` is baked into the installed
    /// post-receive hooks.
    pub fn new(ignore_template_base_url: impl Into<String>, signal_url: impl Into<String>) -> Self {
        Self {
            ignore_template_base_url: ignore_template_base_url.into(),
            signal_url: signal_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Fetch the ignore-file template for `hint`.
    async fn fetch_ignore_template(&self, hint: &str) -> GitStoreResult<String> {
        let url = format!(
            "{}/{hint}.gitignore",
            self.ignore_template_base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| GitStoreError::Template(format!("failed to fetch {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(GitStoreError::Template(format!(
                "failed to fetch {url}: status {}",
                response.status()
            )));
        }
        response
            .text()
            .await
            .map_err(|e| GitStoreError::Template(format!("failed to read {url}: {e}")))
    }

    /// Build the initial commit in a temporary work tree and push it to the
    /// bare repository at `repo_path`.
    async fn seed_initial_commit(
        &self,
        repo_path: &Path,
        language_hint: Option<&str>,
    ) -> GitStoreResult<()> {
        let ignore = match language_hint {
            Some(hint) => self.fetch_ignore_template(hint).await?,
            None => String::new(),
        };

        let work_tree = tempfile::tempdir()?;
        run_git(&["init", "--quiet"], Some(work_tree.path())).await?;
        tokio::fs::write(work_tree.path().join(".gitignore"), ignore).await?;
        run_git(&["add", ".gitignore"], Some(work_tree.path())).await?;
        run_git(
            &[
                "-c",
                "user.name=warden",
                "-c",
                "user.email=warden@localhost",
                "commit",
                "--quiet",
                "-m",
                "Initial commit",
            ],
            Some(work_tree.path()),
        )
        .await?;

        let repo_path_str = repo_path.display().to_string();
        run_git(
            &[
                "push",
                "--quiet",
                repo_path_str.as_str(),
                "HEAD:refs/heads/master",
            ],
            Some(work_tree.path()),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RepositoryBackend for GitCliBackend {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn create(&self, path: &Path, language_hint: Option<&str>) -> GitStoreResult<()> {
        if tokio::fs::try_exists(path).await? {
            return Err(GitStoreError::AlreadyExists(path.display().to_string()));
        }
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let path_str = path.display().to_string();
        run_git(&["init", "--bare", "--quiet", path_str.as_str()], None).await?;
        self.seed_initial_commit(path, language_hint).await?;

        let repository = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        hook::install_post_receive(path, &self.signal_url, repository).await?;

        debug!("bare repository created");
        Ok(())
    }

    #[instrument(skip(self), fields(from = %old_path.display(), to = %new_path.display()))]
    async fn rename(&self, old_path: &Path, new_path: &Path) -> GitStoreResult<()> {
        if !tokio::fs::try_exists(old_path).await? {
            return Err(GitStoreError::NotFound(old_path.display().to_string()));
        }
        if tokio::fs::try_exists(new_path).await? {
            return Err(GitStoreError::AlreadyExists(new_path.display().to_string()));
        }
        tokio::fs::rename(old_path, new_path).await?;
        debug!("repository renamed");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn delete(&self, path: &Path) -> GitStoreResult<()> {
        if !tokio::fs::try_exists(path).await? {
            debug!("path does not exist; nothing to remove");
            return Ok(());
        }
        tokio::fs::remove_dir_all(path).await?;
        debug!("repository removed");
        Ok(())
    }
}

/// Run a git command, mapping non-zero exit to an error carrying stderr.
async fn run_git(args: &[&str], cwd: Option<&Path>) -> GitStoreResult<()> {
    let mut command = Command::new("git");
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }

    let output = command.output().await?;
    if !output.status.success() {
        return Err(GitStoreError::Command {
            command: format!("git {}", args.join(" ")),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn backend() -> GitCliBackend {
        GitCliBackend::new(
            "https://templates.invalid",
            "http://localhost:8080/v1/signals/commit",
        )
    }

    #[tokio::test]
    async fn delete_of_missing_path_is_noop() {
        let temp = tempfile::tempdir().unwrap();
        backend()
            .delete(&temp.path().join("missing.git"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rename_of_missing_path_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let err = backend()
            .rename(&temp.path().join("missing.git"), &temp.path().join("new.git"))
            .await
            .unwrap_err();
        assert!(matches!(err, GitStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn rename_onto_existing_path_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let old = temp.path().join("old.git");
        let new = temp.path().join("new.git");
        tokio::fs::create_dir(&old).await.unwrap();
        tokio::fs::create_dir(&new).await.unwrap();

        let err = backend().rename(&old, &new).await.unwrap_err();
        assert!(matches!(err, GitStoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn rename_moves_directory() {
        let temp = tempfile::tempdir().unwrap();
        let old = temp.path().join("old.git");
        let new = temp.path().join("new.git");
        tokio::fs::create_dir(&old).await.unwrap();

        backend().rename(&old, &new).await.unwrap();
        assert!(!old.exists());
        assert!(new.exists());
    }

    #[tokio::test]
    async fn create_of_existing_path_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("taken.git");
        tokio::fs::create_dir(&path).await.unwrap();

        let err = backend().create(&path, None).await.unwrap_err();
        assert!(matches!(err, GitStoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn fetch_ignore_template_returns_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/Rust.gitignore");
                then.status(200).body("/target\nCargo.lock\n");
            })
            .await;

        let backend = GitCliBackend::new(server.base_url(), "http://localhost/signal");
        let body = backend.fetch_ignore_template("Rust").await.unwrap();
        assert_eq!(body, "/target\nCargo.lock\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_ignore_template_maps_missing_template_to_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/NoSuchLanguage.gitignore");
                then.status(404);
            })
            .await;

        let backend = GitCliBackend::new(server.base_url(), "http://localhost/signal");
        let err = backend
            .fetch_ignore_template("NoSuchLanguage")
            .await
            .unwrap_err();
        assert!(matches!(err, GitStoreError::Template(_)));
    }
}
