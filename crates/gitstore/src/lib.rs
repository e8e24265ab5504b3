//! Filesystem-resident bare repository management for Warden.
//!
//! Exposes the `RepositoryBackend` trait consumed by the control plane and a
//! git-CLI implementation that materializes bare repositories, seeds them
//! with an initial commit and installs the push-notification hook.

pub mod backends;
pub mod error;
pub mod hook;
pub mod traits;

pub use backends::GitCliBackend;
pub use error::{GitStoreError, GitStoreResult};
pub use traits::RepositoryBackend;
