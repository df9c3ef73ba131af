use crate::core::{ObjectId, Result};
use crate::repository::Repository;

/// Implements `commit-tree`: every file path in a commit's snapshot
pub struct CommitTreeCommand<'a> {
    repo: &'a Repository,
    commit: ObjectId,
}

impl<'a> CommitTreeCommand<'a> {
    pub fn new(repo: &'a Repository, hash: &str) -> Result<Self> {
        Ok(Self {
            repo,
            commit: ObjectId::from_hex(hash)?,
        })
    }

    pub fn execute(&self) -> Result<String> {
        Ok(self.repo.files_at(&self.commit)?.join("\n"))
    }
}
