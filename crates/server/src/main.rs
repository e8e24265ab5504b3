//! Warden server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use warden_core::config::AppConfig;
use warden_core::{BootstrapKey, SessionIssuer};
use warden_gitstore::GitCliBackend;
use warden_server::{AppState, create_router};

/// Warden - a control plane for self-hosted git repositories
#[derive(Parser, Debug)]
#[command(name = "wardend")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "WARDEN_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Warden v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (file is optional, env vars can provide/override everything)
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();
    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("WARDEN_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Initialize metadata store
    let metadata = warden_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    metadata
        .health_check()
        .await
        .context("metadata store health check failed")?;
    tracing::info!("Metadata store initialized");

    // Initialize repository backend
    tokio::fs::create_dir_all(&config.git.root)
        .await
        .with_context(|| {
            format!(
                "failed to create repository root {}",
                config.git.root.display()
            )
        })?;
    let backend: Arc<dyn warden_gitstore::RepositoryBackend> = Arc::new(GitCliBackend::new(
        config.git.ignore_template_base_url.clone(),
        config.git.signal_url.clone(),
    ));
    tracing::info!(root = %config.git.root.display(), "Repository backend initialized");

    // Session secret: configured, or random for this process lifetime
    let secret = match &config.auth.secret {
        Some(secret) => secret.clone(),
        None => {
            tracing::warn!(
                "No auth secret configured; using a random secret, sessions will not survive restart"
            );
            warden_core::generate_key()
        }
    };
    let sessions = SessionIssuer::new(secret.as_bytes());

    // One-time bootstrap credential, surfaced once in the log
    let (bootstrap, bootstrap_key) = BootstrapKey::generate();
    tracing::info!("For first-time login, use bootstrap key: {bootstrap_key}");

    let bind = config.server.bind.clone();
    let state = AppState::new(config, metadata, backend, sessions, bootstrap);
    let app = create_router(state);

    let addr: SocketAddr = bind.parse().context("invalid bind address")?;
    tracing::info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
