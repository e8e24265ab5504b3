//! Metadata store trait and the SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{RepositoryRepo, UserRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: UserRepo + RepositoryRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    public_key TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS repositories (
    repo_id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    last_update TEXT NOT NULL
);
"#;

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store, running migrations.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MetadataError::Internal(format!(
                    "failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection
            // avoids persistent "database is locked" failures under load.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Whether a sqlx error is a UNIQUE constraint violation.
fn unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint"))
}

mod sqlite_impl {
    use super::*;
    use crate::models::{RepositoryRow, UserRow};
    use uuid::Uuid;

    #[async_trait]
    impl UserRepo for SqliteStore {
        async fn create_user(&self, user: &UserRow) -> MetadataResult<()> {
            if self.get_user_by_username(&user.username).await?.is_some() {
                return Err(MetadataError::AlreadyExists(format!(
                    "username '{}' already exists",
                    user.username
                )));
            }

            sqlx::query(
                "INSERT INTO users (user_id, username, public_key, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(user.user_id)
            .bind(&user.username)
            .bind(&user.public_key)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // Lost the pre-check race against a concurrent insert.
                if unique_violation(&e) {
                    MetadataError::AlreadyExists(format!(
                        "username '{}' already exists",
                        user.username
                    ))
                } else {
                    e.into()
                }
            })?;
            Ok(())
        }

        async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_user_by_username(&self, username: &str) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn update_user(&self, user: &UserRow) -> MetadataResult<()> {
            let result = sqlx::query(
                "UPDATE users SET username = ?, public_key = ?, updated_at = ? WHERE user_id = ?",
            )
            .bind(&user.username)
            .bind(&user.public_key)
            .bind(user.updated_at)
            .bind(user.user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if unique_violation(&e) {
                    MetadataError::AlreadyExists(format!(
                        "username '{}' already exists",
                        user.username
                    ))
                } else {
                    MetadataError::from(e)
                }
            })?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "user {} not found",
                    user.user_id
                )));
            }
            Ok(())
        }

        async fn list_users(&self) -> MetadataResult<Vec<UserRow>> {
            let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY username")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }

        async fn delete_user(&self, user_id: Uuid) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!("user {user_id} not found")));
            }
            Ok(())
        }

        async fn get_public_key_by_username(
            &self,
            username: &str,
        ) -> MetadataResult<Option<String>> {
            let key: Option<String> =
                sqlx::query_scalar("SELECT public_key FROM users WHERE username = ?")
                    .bind(username)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(key)
        }
    }

    #[async_trait]
    impl RepositoryRepo for SqliteStore {
        async fn create_repository(&self, repository: &RepositoryRow) -> MetadataResult<()> {
            if self
                .get_repository_by_name(&repository.name)
                .await?
                .is_some()
            {
                return Err(MetadataError::AlreadyExists(format!(
                    "repository '{}' already exists",
                    repository.name
                )));
            }

            sqlx::query(
                "INSERT INTO repositories (repo_id, name, description, last_update) VALUES (?, ?, ?, ?)",
            )
            .bind(repository.repo_id)
            .bind(&repository.name)
            .bind(&repository.description)
            .bind(repository.last_update)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if unique_violation(&e) {
                    MetadataError::AlreadyExists(format!(
                        "repository '{}' already exists",
                        repository.name
                    ))
                } else {
                    e.into()
                }
            })?;
            Ok(())
        }

        async fn get_repository(&self, repo_id: Uuid) -> MetadataResult<Option<RepositoryRow>> {
            let row =
                sqlx::query_as::<_, RepositoryRow>("SELECT * FROM repositories WHERE repo_id = ?")
                    .bind(repo_id)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn get_repository_by_name(
            &self,
            name: &str,
        ) -> MetadataResult<Option<RepositoryRow>> {
            let row =
                sqlx::query_as::<_, RepositoryRow>("SELECT * FROM repositories WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?;
            Ok(row)
        }

        async fn update_repository(&self, repository: &RepositoryRow) -> MetadataResult<()> {
            let result = sqlx::query(
                "UPDATE repositories SET name = ?, description = ?, last_update = ? WHERE repo_id = ?",
            )
            .bind(&repository.name)
            .bind(&repository.description)
            .bind(repository.last_update)
            .bind(repository.repo_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if unique_violation(&e) {
                    MetadataError::AlreadyExists(format!(
                        "repository '{}' already exists",
                        repository.name
                    ))
                } else {
                    MetadataError::from(e)
                }
            })?;

            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "repository {} not found",
                    repository.repo_id
                )));
            }
            Ok(())
        }

        async fn list_repositories(&self) -> MetadataResult<Vec<RepositoryRow>> {
            let rows =
                sqlx::query_as::<_, RepositoryRow>("SELECT * FROM repositories ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?;
            Ok(rows)
        }

        async fn delete_repository(&self, repo_id: Uuid) -> MetadataResult<()> {
            let result = sqlx::query("DELETE FROM repositories WHERE repo_id = ?")
                .bind(repo_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(MetadataError::NotFound(format!(
                    "repository {repo_id} not found"
                )));
            }
            Ok(())
        }
    }
}
