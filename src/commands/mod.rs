//! The four inspection commands and their string dispatch

mod branches;
mod cat_file;
mod commit_tree;
mod log;

use std::path::Path;

pub use self::branches::ListBranchesCommand;
pub use self::cat_file::CatFileCommand;
pub use self::commit_tree::CommitTreeCommand;
pub use self::log::LogCommand;

use crate::core::{GitError, InspectorConfig, Result};
use crate::repository::Repository;

/// Front door for callers that receive commands as text
pub struct Inspector {
    repo: Repository,
}

impl Inspector {
    /// Open the repository at `path`
    pub fn open(path: &Path, config: InspectorConfig) -> Result<Self> {
        Ok(Self {
            repo: Repository::open(path, config)?,
        })
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Run `cmd` with its optional argument.
    ///
    /// Unknown commands produce an `Invalid command` message rather than an error.
    pub fn execute_command(&self, cmd: &str, argument: Option<&str>) -> Result<String> {
        ::log::debug!("Executing {} {:?}", cmd, argument);

        match cmd {
            "list-branches" => ListBranchesCommand::new(&self.repo).execute(),
            "cat-file" => CatFileCommand::new(&self.repo, required(cmd, argument)?)?.execute(),
            "log" => LogCommand::new(&self.repo, required(cmd, argument)?).execute(),
            "commit-tree" => CommitTreeCommand::new(&self.repo, required(cmd, argument)?)?.execute(),
            _ => Ok(format!("Invalid command: {}", cmd)),
        }
    }
}

fn required<'a>(cmd: &str, argument: Option<&'a str>) -> Result<&'a str> {
    argument
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .ok_or_else(|| GitError::InvalidArgument(format!("{} requires an argument", cmd)))
}
