//! Application state shared across handlers.

use crate::lifecycle::RepositoryLifecycleManager;
use std::sync::Arc;
use warden_core::config::AppConfig;
use warden_core::{BootstrapKey, ChallengeBroker, SessionIssuer};
use warden_gitstore::RepositoryBackend;
use warden_metadata::MetadataStore;

/// Shared application state.
///
/// Constructed once at startup. The secret-derived session issuer and the
/// bootstrap key live here rather than in process-wide globals.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// Filesystem repository backend.
    pub backend: Arc<dyn RepositoryBackend>,
    /// Repository lifecycle orchestration.
    pub lifecycle: Arc<RepositoryLifecycleManager>,
    /// Session token issuer.
    pub sessions: Arc<SessionIssuer>,
    /// Outstanding authentication challenges.
    pub challenges: Arc<ChallengeBroker>,
    /// One-time bootstrap credential.
    pub bootstrap: Arc<BootstrapKey>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        metadata: Arc<dyn MetadataStore>,
        backend: Arc<dyn RepositoryBackend>,
        sessions: SessionIssuer,
        bootstrap: BootstrapKey,
    ) -> Self {
        let config = Arc::new(config);
        let lifecycle = Arc::new(RepositoryLifecycleManager::new(
            metadata.clone(),
            backend.clone(),
            config.git.root.clone(),
        ));

        Self {
            config,
            metadata,
            backend,
            lifecycle,
            sessions: Arc::new(sessions),
            challenges: Arc::new(ChallengeBroker::new()),
            bootstrap: Arc::new(bootstrap),
        }
    }
}
