//! Read-only access to a repository's loose objects and branch refs

pub mod commit;
pub mod history;
pub mod object;
pub mod refs;
pub mod storage;
pub mod tree;
pub mod walker;

use std::path::{Path, PathBuf};

use log::info;

use crate::core::{GitError, InspectorConfig, ObjectId, Result};

pub use commit::{Commit, Identity};
pub use history::{HistoryEntry, HistoryTraversal};
pub use object::{parse_header, Object, ObjectReader, StoredObject};
pub use refs::{Branch, BranchTipIndex, RefStorage, RepositoryState};
pub use storage::{FileSystemObjectStore, ObjectStorage};
pub use tree::{Tree, TreeEntry};
pub use walker::TreeWalker;

/// An opened repository: object store plus the branch layout read at open time
pub struct Repository {
    objects: FileSystemObjectStore,
    state: RepositoryState,
    tip_index: BranchTipIndex,
    config: InspectorConfig,
}

impl Repository {
    /// Open a repository from its `.git` directory or from a working tree containing one
    pub fn open(path: &Path, config: InspectorConfig) -> Result<Self> {
        let git_dir = find_git_dir(path)?;
        validate_layout(&git_dir)?;

        let state = RefStorage::new(&git_dir).load_state()?;
        let tip_index = state.tip_index();
        info!(
            "Opened repository {} with {} branches (current: {})",
            git_dir.display(),
            state.branches.len(),
            state.current_branch.as_deref().unwrap_or("detached")
        );

        Ok(Self {
            objects: FileSystemObjectStore::new(git_dir.join("objects")),
            state,
            tip_index,
            config,
        })
    }

    pub fn state(&self) -> &RepositoryState {
        &self.state
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    /// Object reader over this repository's store
    pub fn reader(&self) -> ObjectReader<'_> {
        ObjectReader::new(&self.objects, self.config.verify_object_length)
    }

    pub fn branch(&self, name: &str) -> Result<&Branch> {
        self.state
            .branch(name)
            .ok_or_else(|| GitError::UnknownBranch(name.to_string()))
    }

    /// Commit history of `branch_name`, newest first
    pub fn history(&self, branch_name: &str) -> Result<Vec<HistoryEntry>> {
        let branch = self.branch(branch_name)?;
        let reader = self.reader();
        HistoryTraversal::new(&reader, &self.tip_index, self.config.max_history_depth).walk(branch)
    }

    /// Every file path in the tree of `commit_id`
    pub fn files_at(&self, commit_id: &ObjectId) -> Result<Vec<String>> {
        let reader = self.reader();
        let commit = reader.read_commit(commit_id)?;
        let tree = reader.read_tree(&commit.tree)?;
        TreeWalker::new(&reader, self.config.max_tree_depth).flatten(tree, "")
    }
}

fn find_git_dir(path: &Path) -> Result<PathBuf> {
    let nested = path.join(".git");
    if nested.is_dir() {
        return Ok(nested);
    }
    if path.is_dir() {
        return Ok(path.to_path_buf());
    }
    Err(GitError::NotARepository(
        path.to_path_buf(),
        "path does not exist or is not a directory".to_string(),
    ))
}

fn validate_layout(git_dir: &Path) -> Result<()> {
    for dir in ["objects", "refs/heads"] {
        if !git_dir.join(dir).is_dir() {
            return Err(GitError::NotARepository(
                git_dir.to_path_buf(),
                format!("missing {} directory", dir),
            ));
        }
    }
    if !git_dir.join("HEAD").is_file() {
        return Err(GitError::NotARepository(
            git_dir.to_path_buf(),
            "missing HEAD file".to_string(),
        ));
    }
    Ok(())
}
