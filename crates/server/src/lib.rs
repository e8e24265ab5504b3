//! HTTP control plane for self-hosted git repositories.
//!
//! This crate provides:
//! - Challenge-response authentication and session issuance
//! - The call-gating authorization middleware
//! - Repository lifecycle orchestration with compensating actions
//! - User and repository CRUD endpoints
//! - The push-signal endpoint that refreshes repository freshness

pub mod auth;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod routes;
pub mod state;

pub use auth::TraceId;
pub use error::ApiError;
pub use lifecycle::RepositoryLifecycleManager;
pub use routes::create_router;
pub use state::AppState;
