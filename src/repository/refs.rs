use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::core::{GitError, ObjectId, Result};

const HEADS_DIR: &str = "refs/heads";
const SYMBOLIC_HEAD_PREFIX: &str = "ref: refs/heads/";

/// A named pointer to a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
    pub tip: ObjectId,
}

/// Branches and the checked-out branch, read once at startup
#[derive(Debug, Clone, Default)]
pub struct RepositoryState {
    /// `None` when HEAD is detached
    pub current_branch: Option<String>,
    pub branches: BTreeMap<String, Branch>,
}

impl RepositoryState {
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.get(name)
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.current_branch.as_deref() == Some(name)
    }

    /// Build the reverse tip lookup used to resolve merges
    pub fn tip_index(&self) -> BranchTipIndex {
        BranchTipIndex::new(self.branches.values())
    }
}

/// Reverse lookup from a commit id to the branches whose tip it is
#[derive(Debug, Clone, Default)]
pub struct BranchTipIndex {
    tips: HashMap<ObjectId, Vec<String>>,
}

impl BranchTipIndex {
    pub fn new<'a>(branches: impl IntoIterator<Item = &'a Branch>) -> Self {
        let mut tips: HashMap<ObjectId, Vec<String>> = HashMap::new();
        for branch in branches {
            tips.entry(branch.tip).or_default().push(branch.name.clone());
        }
        Self { tips }
    }

    /// Names of the branches pointing at `id`
    pub fn branches_at(&self, id: &ObjectId) -> &[String] {
        self.tips.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Read-only view of `refs/heads` and `HEAD`
pub struct RefStorage {
    path: PathBuf,
}

impl RefStorage {
    /// Create a reference reader over a `.git` directory
    pub fn new(git_dir: &Path) -> Self {
        Self {
            path: git_dir.to_path_buf(),
        }
    }

    /// Enumerate and resolve every branch plus the current branch
    pub fn load_state(&self) -> Result<RepositoryState> {
        let branches = self
            .list_branches()?
            .into_iter()
            .map(|branch| (branch.name.clone(), branch))
            .collect();

        Ok(RepositoryState {
            current_branch: self.current_branch()?,
            branches,
        })
    }

    /// Every ref file under `refs/heads`, nested names joined by `/`
    pub fn list_branches(&self) -> Result<Vec<Branch>> {
        let heads = self.path.join(HEADS_DIR);
        let mut branches = Vec::new();
        Self::list_refs_recursive(&heads, &heads, &mut branches)?;
        branches.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("Found {} branches under {}", branches.len(), heads.display());
        Ok(branches)
    }

    fn list_refs_recursive(dir: &Path, base: &Path, result: &mut Vec<Branch>) -> Result<()> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                Self::list_refs_recursive(&path, base, result)?;
            } else if let Ok(relative) = path.strip_prefix(base) {
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                let tip = Self::read_ref_file(&path)?;
                result.push(Branch { name, tip });
            }
        }

        Ok(())
    }

    fn read_ref_file(path: &Path) -> Result<ObjectId> {
        let content = fs::read_to_string(path)?;
        ObjectId::from_hex(content.trim()).map_err(|_| {
            GitError::NotARepository(path.to_path_buf(), format!("ref does not hold an object id: {}", content.trim()))
        })
    }

    /// Branch named by HEAD's symbolic ref, `None` when detached
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head_path = self.path.join("HEAD");
        let content = fs::read_to_string(&head_path)?;
        let head = content.trim();

        if let Some(name) = head.strip_prefix(SYMBOLIC_HEAD_PREFIX) {
            return Ok(Some(name.to_string()));
        }
        if ObjectId::from_hex(head).is_ok() {
            warn!("HEAD is detached at {}", head);
            return Ok(None);
        }

        Err(GitError::NotARepository(head_path, format!("unrecognised HEAD: {}", head)))
    }
}
