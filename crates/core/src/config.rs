//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::Duration;

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Git repository backend configuration.
    #[serde(default)]
    pub git: GitConfig,
}

impl AppConfig {
    /// Create a test configuration with everything rooted under `root`.
    ///
    /// **For testing only.** Uses a fixed secret so tokens are reproducible.
    pub fn for_testing(root: &std::path::Path) -> Self {
        Self {
            server: ServerConfig::default(),
            auth: AuthConfig {
                secret: Some("test-secret".to_string()),
                ..Default::default()
            },
            metadata: MetadataConfig::Sqlite {
                path: root.join("metadata.db"),
            },
            git: GitConfig {
                root: root.join("repositories"),
                ..Default::default()
            },
        }
    }
}

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Authentication configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric secret used to sign session tokens. When absent a random
    /// secret is generated at startup and sessions do not survive restarts.
    #[serde(default)]
    pub secret: Option<String>,
    /// Session token validity in days.
    #[serde(default = "default_token_validity_days")]
    pub token_validity_days: i64,
    /// Bootstrap token validity in seconds.
    #[serde(default = "default_bootstrap_validity_secs")]
    pub bootstrap_validity_secs: i64,
}

impl AuthConfig {
    /// Get the session token validity as a Duration.
    pub fn token_validity(&self) -> Duration {
        Duration::days(self.token_validity_days)
    }

    /// Get the bootstrap token validity as a Duration.
    pub fn bootstrap_validity(&self) -> Duration {
        Duration::seconds(self.bootstrap_validity_secs)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            token_validity_days: default_token_validity_days(),
            bootstrap_validity_secs: default_bootstrap_validity_secs(),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/metadata.db"),
        }
    }
}

/// Git repository backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GitConfig {
    /// Root directory under which bare repositories are materialized.
    #[serde(default = "default_repo_root")]
    pub root: PathBuf,
    /// Base URL of the ignore-file template source. `<hint>.gitignore` is
    /// appended when a repository is created with a language hint.
    #[serde(default = "default_ignore_template_base_url")]
    pub ignore_template_base_url: String,
    /// URL the installed post-receive hook reports pushes to.
    #[serde(default = "default_signal_url")]
    pub signal_url: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            root: default_repo_root(),
            ignore_template_base_url: default_ignore_template_base_url(),
            signal_url: default_signal_url(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_token_validity_days() -> i64 {
    30
}

fn default_bootstrap_validity_secs() -> i64 {
    86400 // 1 day
}

fn default_repo_root() -> PathBuf {
    PathBuf::from("./data/repositories")
}

fn default_ignore_template_base_url() -> String {
    "https://raw.githubusercontent.com/github/gitignore/main".to_string()
}

fn default_signal_url() -> String {
    "http://127.0.0.1:8080/v1/signals/commit".to_string()
}
