//! Repository backend implementations.

pub mod git_cli;

pub use git_cli::GitCliBackend;
