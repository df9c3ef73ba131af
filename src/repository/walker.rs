use log::warn;

use crate::core::{GitError, ObjectType, Result};
use crate::repository::object::ObjectReader;
use crate::repository::tree::{Tree, TreeEntry};

/// Expands a tree into the flat list of file paths below it
pub struct TreeWalker<'a> {
    reader: &'a ObjectReader<'a>,
    max_depth: usize,
}

impl<'a> TreeWalker<'a> {
    pub fn new(reader: &'a ObjectReader<'a>, max_depth: usize) -> Self {
        Self { reader, max_depth }
    }

    /// Paths of every non-tree entry, depth first in on-disk order.
    ///
    /// Whether an entry is a directory is decided by reading its target.
    /// Gitlinks are listed without being read.
    pub fn flatten(&self, tree: Tree, prefix: &str) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        let mut stack = vec![(prefix.to_string(), tree.entries.into_iter())];

        loop {
            let next: Option<(String, TreeEntry)> = match stack.last_mut() {
                None => break,
                Some((prefix, entries)) => entries
                    .next()
                    .map(|entry| (format!("{}{}", prefix, entry.name), entry)),
            };

            let (path, entry) = match next {
                Some(next) => next,
                None => {
                    stack.pop();
                    continue;
                }
            };

            if entry.is_gitlink() {
                paths.push(path);
                continue;
            }

            let stored = self.reader.read(&entry.target)?;
            if stored.kind != ObjectType::Tree {
                paths.push(path);
                continue;
            }

            if stack.len() >= self.max_depth {
                warn!("Tree nesting exceeded {} levels at {}", self.max_depth, path);
                return Err(GitError::CycleDetected(entry.target));
            }
            let subtree = Tree::decode(&entry.target, &stored.payload)?;
            stack.push((format!("{}/", path), subtree.entries.into_iter()));
        }

        Ok(paths)
    }
}
