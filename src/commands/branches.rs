use crate::core::Result;
use crate::repository::Repository;

/// Implements `list-branches`
pub struct ListBranchesCommand<'a> {
    repo: &'a Repository,
}

impl<'a> ListBranchesCommand<'a> {
    pub fn new(repo: &'a Repository) -> Self {
        Self { repo }
    }

    /// One branch per line, the checked-out one marked with `* `
    pub fn execute(&self) -> Result<String> {
        let state = self.repo.state();
        let lines: Vec<String> = state
            .branches
            .keys()
            .map(|name| {
                let marker = if state.is_current(name) { "* " } else { "  " };
                format!("{}{}", marker, name)
            })
            .collect();

        Ok(lines.join("\n"))
    }
}
