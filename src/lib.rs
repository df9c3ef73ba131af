//! git-internals: a read-only inspector for loose Git object databases.
//!
//! Decodes blobs, trees and commits straight from `.git/objects`, resolves
//! branches from `refs/heads`, and renders object dumps, branch lists,
//! merge-aware history and flat file listings.

pub mod commands;
pub mod core;
pub mod repository;

// Re-export main components for easier consumption
pub use crate::commands::Inspector;
pub use crate::core::{ConfigError, GitError, InspectorConfig, ObjectId, ObjectType, Result};
pub use crate::repository::{
    Branch, Commit, HistoryEntry, Identity, Repository, RepositoryState, Tree, TreeEntry,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
