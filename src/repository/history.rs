use std::collections::HashSet;

use log::{debug, warn};

use crate::core::{GitError, ObjectId, Result};
use crate::repository::commit::Commit;
use crate::repository::object::ObjectReader;
use crate::repository::refs::{Branch, BranchTipIndex};

/// One visited commit in a branch history
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: ObjectId,
    pub commit: Commit,
    /// Set when this commit is the tip of a branch merged in at the previous entry
    pub merged: bool,
}

/// Walks a branch from its tip back to the root commit.
///
/// Single-parent commits are followed directly. At a two-parent commit the
/// parent that is the tip of another branch is emitted as the merged-in
/// commit, and the walk continues through the other parent.
pub struct HistoryTraversal<'a> {
    reader: &'a ObjectReader<'a>,
    tips: &'a BranchTipIndex,
    max_depth: usize,
}

impl<'a> HistoryTraversal<'a> {
    pub fn new(reader: &'a ObjectReader<'a>, tips: &'a BranchTipIndex, max_depth: usize) -> Self {
        Self {
            reader,
            tips,
            max_depth,
        }
    }

    /// Newest first, root commit last, no id repeated
    pub fn walk(&self, branch: &Branch) -> Result<Vec<HistoryEntry>> {
        let mut entries = Vec::new();
        let mut emitted = HashSet::new();
        let mut walked = HashSet::new();
        let mut next = Some(branch.tip);

        while let Some(id) = next {
            if walked.len() >= self.max_depth {
                warn!("History of {} exceeded {} commits", branch.name, self.max_depth);
                return Err(GitError::CycleDetected(id));
            }
            if !walked.insert(id) {
                warn!("Commit {} reached twice while walking {}", id, branch.name);
                return Err(GitError::CycleDetected(id));
            }

            let commit = self.reader.read_commit(&id)?;
            let parents = commit.parents.clone();
            if emitted.insert(id) {
                entries.push(HistoryEntry {
                    id,
                    commit,
                    merged: false,
                });
            }

            next = match parents.as_slice() {
                [] => None,
                [parent] => Some(*parent),
                [first, second] => {
                    let (merged_tip, continue_with) = self.resolve_merge(&id, branch, *first, *second)?;
                    if emitted.insert(merged_tip) {
                        entries.push(HistoryEntry {
                            id: merged_tip,
                            commit: self.reader.read_commit(&merged_tip)?,
                            merged: true,
                        });
                    }
                    Some(continue_with)
                }
                _ => {
                    return Err(GitError::UnsupportedMerge {
                        commit: id,
                        parents: parents.len(),
                    })
                }
            };
        }

        Ok(entries)
    }

    /// Pick the parent that is the tip of exactly one other branch.
    ///
    /// Returns `(merged tip, parent to continue through)`.
    fn resolve_merge(
        &self,
        commit: &ObjectId,
        branch: &Branch,
        first: ObjectId,
        second: ObjectId,
    ) -> Result<(ObjectId, ObjectId)> {
        let mut candidates: Vec<(&str, ObjectId)> = Vec::new();
        for parent in [first, second] {
            for name in self.tips.branches_at(&parent) {
                if *name != branch.name {
                    candidates.push((name.as_str(), parent));
                }
            }
        }

        match candidates.as_slice() {
            [(name, tip)] => {
                debug!("Commit {} merges branch {} at {}", commit, name, tip);
                let continue_with = if *tip == first { second } else { first };
                Ok((*tip, continue_with))
            }
            _ => Err(GitError::AmbiguousMerge {
                commit: *commit,
                candidates: candidates.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::storage::MemoryObjectStore;

    fn oid(n: u8) -> ObjectId {
        ObjectId::new([n; 20])
    }

    fn add_commit(store: &mut MemoryObjectStore, id: u8, parents: &[u8]) {
        let mut text = format!("tree {}\n", oid(0xee));
        for parent in parents {
            text.push_str(&format!("parent {}\n", oid(*parent)));
        }
        text.push_str("author A U Thor <author@example.com> 1600000000 +0000\n");
        text.push_str("committer A U Thor <author@example.com> 1600000000 +0000\n");
        text.push_str(&format!("\ncommit {}\n", id));
        store.insert(oid(id), "commit", text.as_bytes());
    }

    fn branch(name: &str, tip: u8) -> Branch {
        Branch {
            name: name.to_string(),
            tip: oid(tip),
        }
    }

    fn walk(store: &MemoryObjectStore, branches: &[Branch], name: &str) -> Result<Vec<HistoryEntry>> {
        walk_with_depth(store, branches, name, 1000)
    }

    fn walk_with_depth(
        store: &MemoryObjectStore,
        branches: &[Branch],
        name: &str,
        max_depth: usize,
    ) -> Result<Vec<HistoryEntry>> {
        let reader = ObjectReader::new(store, true);
        let tips = BranchTipIndex::new(branches);
        let target = branches.iter().find(|b| b.name == name).unwrap();
        HistoryTraversal::new(&reader, &tips, max_depth).walk(target)
    }

    fn summary(entries: &[HistoryEntry]) -> Vec<(ObjectId, bool)> {
        entries.iter().map(|e| (e.id, e.merged)).collect()
    }

    #[test]
    fn root_commit_alone() {
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[]);

        let entries = walk(&store, &[branch("main", 1)], "main").unwrap();
        assert_eq!(summary(&entries), [(oid(1), false)]);
    }

    #[test]
    fn linear_history_is_newest_first() {
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[]);
        add_commit(&mut store, 2, &[1]);

        let branches = [branch("main", 2), branch("feature", 1)];
        let entries = walk(&store, &branches, "main").unwrap();
        assert_eq!(summary(&entries), [(oid(2), false), (oid(1), false)]);
        assert_eq!(entries[0].commit.message, "commit 2");
    }

    #[test]
    fn merge_splices_in_the_merged_tip_and_follows_the_other_parent() {
        // main: 1 - 2 - 4(merge of 3), feature: 1 - 3
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[]);
        add_commit(&mut store, 2, &[1]);
        add_commit(&mut store, 3, &[1]);
        add_commit(&mut store, 4, &[2, 3]);

        let branches = [branch("main", 4), branch("feature", 3)];
        let entries = walk(&store, &branches, "main").unwrap();
        assert_eq!(
            summary(&entries),
            [(oid(4), false), (oid(3), true), (oid(2), false), (oid(1), false)]
        );
    }

    #[test]
    fn merged_tip_may_be_either_parent() {
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[]);
        add_commit(&mut store, 2, &[1]);
        add_commit(&mut store, 3, &[1]);
        add_commit(&mut store, 4, &[3, 2]);

        let branches = [branch("main", 4), branch("feature", 3)];
        let entries = walk(&store, &branches, "main").unwrap();
        assert_eq!(
            summary(&entries),
            [(oid(4), false), (oid(3), true), (oid(2), false), (oid(1), false)]
        );
    }

    #[test]
    fn merged_tip_reached_again_is_not_repeated() {
        // feature tip 1 is also an ancestor of main's first parent
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[]);
        add_commit(&mut store, 2, &[1]);
        add_commit(&mut store, 4, &[2, 1]);

        let branches = [branch("main", 4), branch("feature", 1)];
        let entries = walk(&store, &branches, "main").unwrap();
        assert_eq!(summary(&entries), [(oid(4), false), (oid(1), true), (oid(2), false)]);
    }

    #[test]
    fn merge_without_matching_branch_is_ambiguous() {
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[]);
        add_commit(&mut store, 2, &[1]);
        add_commit(&mut store, 3, &[1]);
        add_commit(&mut store, 4, &[2, 3]);

        let err = walk(&store, &[branch("main", 4)], "main").unwrap_err();
        assert!(matches!(err, GitError::AmbiguousMerge { candidates: 0, .. }));
    }

    #[test]
    fn merge_matching_two_branches_is_ambiguous() {
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[]);
        add_commit(&mut store, 2, &[1]);
        add_commit(&mut store, 3, &[1]);
        add_commit(&mut store, 4, &[2, 3]);

        let branches = [branch("main", 4), branch("release", 2), branch("feature", 3)];
        let err = walk(&store, &branches, "main").unwrap_err();
        assert!(matches!(err, GitError::AmbiguousMerge { candidates: 2, .. }));
    }

    #[test]
    fn octopus_merge_is_rejected() {
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[]);
        add_commit(&mut store, 2, &[]);
        add_commit(&mut store, 3, &[]);
        add_commit(&mut store, 4, &[1, 2, 3]);

        let err = walk(&store, &[branch("main", 4)], "main").unwrap_err();
        assert!(matches!(err, GitError::UnsupportedMerge { parents: 3, .. }));
    }

    #[test]
    fn parent_cycle_is_detected() {
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[2]);
        add_commit(&mut store, 2, &[1]);

        let err = walk(&store, &[branch("main", 1)], "main").unwrap_err();
        assert!(matches!(err, GitError::CycleDetected(id) if id == oid(1)));
    }

    #[test]
    fn depth_guard_stops_long_walks() {
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 1, &[]);
        add_commit(&mut store, 2, &[1]);
        add_commit(&mut store, 3, &[2]);

        let err = walk_with_depth(&store, &[branch("main", 3)], "main", 2).unwrap_err();
        assert!(matches!(err, GitError::CycleDetected(_)));
    }

    #[test]
    fn missing_parent_is_not_found() {
        let mut store = MemoryObjectStore::default();
        add_commit(&mut store, 2, &[1]);

        let err = walk(&store, &[branch("main", 2)], "main").unwrap_err();
        assert!(matches!(err, GitError::NotFound(id) if id == oid(1)));
    }
}
