use crate::core::Result;
use crate::repository::{HistoryEntry, Repository};

/// Implements `log`: the history of one branch, newest first
pub struct LogCommand<'a> {
    repo: &'a Repository,
    branch: String,
}

impl<'a> LogCommand<'a> {
    pub fn new(repo: &'a Repository, branch: &str) -> Self {
        Self {
            repo,
            branch: branch.to_string(),
        }
    }

    pub fn execute(&self) -> Result<String> {
        let history = self.repo.history(&self.branch)?;
        let timestamp_format = &self.repo.config().timestamp_format;

        let entries: Vec<String> = history
            .iter()
            .map(|entry| format_entry(entry, timestamp_format))
            .collect();

        Ok(entries.join("\n\n"))
    }
}

fn format_entry(entry: &HistoryEntry, timestamp_format: &str) -> String {
    let merged = if entry.merged { " (merged)" } else { "" };
    format!(
        "Commit: {}{}\n{}\n{}",
        entry.id,
        merged,
        entry.commit.committer.to_text("commit", timestamp_format),
        entry.commit.message
    )
}
