use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::object::ObjectId;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, GitError>;

/// Errors raised while reading and decoding a repository
#[derive(Error, Debug)]
pub enum GitError {
    /// The store layout is missing a required directory or file
    #[error("Not a Git repository: {}: {}", .0.display(), .1)]
    NotARepository(PathBuf, String),

    /// No loose object backs this id
    #[error("Object not found: {0}")]
    NotFound(ObjectId),

    /// The zlib stream of an object could not be inflated
    #[error("Corrupt object {0}: {1}")]
    CorruptObject(ObjectId, String),

    #[error("Malformed object header in {0}: {1}")]
    MalformedHeader(ObjectId, String),

    #[error("Malformed tree {0}: {1}")]
    MalformedTree(ObjectId, String),

    #[error("Malformed commit {0}: {1}")]
    MalformedCommit(ObjectId, String),

    /// A mandatory commit header was absent
    #[error("Commit {0} is missing the '{1}' field")]
    MissingField(ObjectId, &'static str),

    /// Zero or several other branch tips match the parents of a merge commit
    #[error("Cannot resolve merged branch for commit {commit}: {candidates} matching branch tips")]
    AmbiguousMerge { commit: ObjectId, candidates: usize },

    /// Octopus merges are not walked
    #[error("Commit {commit} has {parents} parents; at most two are supported")]
    UnsupportedMerge { commit: ObjectId, parents: usize },

    /// A walk revisited an object or ran past its depth guard
    #[error("Cycle detected while walking from {0}")]
    CycleDetected(ObjectId),

    #[error("Invalid object ID: {0}")]
    InvalidObjectId(String),

    #[error("Invalid branch name: {0}")]
    UnknownBranch(String),

    #[error("Object {id} is a {found}, expected a {expected}")]
    UnexpectedType {
        id: ObjectId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
