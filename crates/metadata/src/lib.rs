//! Metadata store abstraction and implementations for Warden.
//!
//! This crate provides the control-plane data model:
//! - User accounts and their stored public keys
//! - Repository records and freshness timestamps

pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use repos::{RepositoryRepo, UserRepo};
pub use store::{MetadataStore, SqliteStore};

use std::sync::Arc;
use warden_core::config::MetadataConfig;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
    }
}
