//! Server test utilities.

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use time::OffsetDateTime;
use uuid::Uuid;
use warden_core::config::AppConfig;
use warden_core::{BootstrapKey, SessionIssuer};
use warden_gitstore::{GitStoreResult, RepositoryBackend};
use warden_metadata::models::UserRow;
use warden_metadata::{MetadataStore, SqliteStore, UserRepo};
use warden_server::{AppState, create_router};

/// Fixed bootstrap key used by the test server.
#[allow(dead_code)]
pub const TEST_BOOTSTRAP_KEY: &str = "test-bootstrap-key";

/// In-memory repository backend recording every call.
///
/// API tests exercise handler and store behavior; the git CLI is covered by
/// the gitstore crate's own tests.
#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RepositoryBackend for RecordingBackend {
    async fn create(&self, path: &Path, _language_hint: Option<&str>) -> GitStoreResult<()> {
        self.record(format!("create {}", path.display()));
        Ok(())
    }

    async fn rename(&self, old_path: &Path, new_path: &Path) -> GitStoreResult<()> {
        self.record(format!(
            "rename {} {}",
            old_path.display(),
            new_path.display()
        ));
        Ok(())
    }

    async fn delete(&self, path: &Path) -> GitStoreResult<()> {
        self.record(format!("delete {}", path.display()));
        Ok(())
    }
}

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    pub backend: Arc<RecordingBackend>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage.
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let config = AppConfig::for_testing(temp_dir.path());

        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(temp_dir.path().join("metadata.db"))
                .await
                .expect("Failed to create metadata store"),
        );

        let backend = Arc::new(RecordingBackend::default());
        let sessions = SessionIssuer::new(b"test-secret");
        let bootstrap = BootstrapKey::new(TEST_BOOTSTRAP_KEY.to_string());

        let state = AppState::new(config, metadata, backend.clone(), sessions, bootstrap);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            backend,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying metadata store.
    pub fn metadata(&self) -> Arc<dyn MetadataStore> {
        self.state.metadata.clone()
    }

    /// Issue a valid session token for `username`.
    pub fn issue_token(&self, username: &str) -> String {
        self.state
            .sessions
            .issue(username, time::Duration::hours(1))
            .expect("Failed to issue token")
    }

    /// Issue an already-expired session token for `username`.
    pub fn issue_expired_token(&self, username: &str) -> String {
        self.state
            .sessions
            .issue(username, time::Duration::seconds(-30))
            .expect("Failed to issue token")
    }

    /// Register a user directly in the metadata store.
    pub async fn register_user(&self, username: &str, public_key: &str) -> UserRow {
        let now = OffsetDateTime::now_utc();
        let user = UserRow {
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            public_key: public_key.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.metadata()
            .create_user(&user)
            .await
            .expect("Failed to create user");
        user
    }
}

/// Helper to make JSON requests against the router.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
    auth_token: Option<&str>,
) -> (axum::http::StatusCode, serde_json::Value) {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = auth_token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
