use std::fmt;

use crate::core::{GitError, ObjectId, Result, OBJECT_ID_LEN};

/// Mode of an entry that points at a commit in another repository
pub const GITLINK_MODE: &str = "160000";

/// A single entry in a tree object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Permission bits as written on disk, e.g. `100644` or `40000`
    pub mode: String,
    pub name: String,
    pub target: ObjectId,
}

impl TreeEntry {
    pub fn is_gitlink(&self) -> bool {
        self.mode == GITLINK_MODE
    }
}

/// A directory listing, in on-disk order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Decode a tree payload made of `<mode> <name>\0<20 byte digest>` records.
    ///
    /// Some writers leave a redundant `tree <len>\0` segment at the front of
    /// the payload; it is stripped before entries are read.
    pub fn decode(id: &ObjectId, payload: &[u8]) -> Result<Self> {
        let mut rest = strip_redundant_header(payload);
        let mut entries = Vec::new();

        while !rest.is_empty() {
            let nul = rest.iter().position(|&b| b == 0).ok_or_else(|| {
                GitError::MalformedTree(
                    *id,
                    format!("entry {} has no null terminator", entries.len()),
                )
            })?;

            let meta = String::from_utf8_lossy(&rest[..nul]);
            let (mode, name) = meta.split_once(' ').ok_or_else(|| {
                GitError::MalformedTree(*id, format!("entry '{}' has no mode separator", meta))
            })?;

            let digest = rest
                .get(nul + 1..nul + 1 + OBJECT_ID_LEN)
                .and_then(ObjectId::from_bytes)
                .ok_or_else(|| {
                    GitError::MalformedTree(*id, format!("entry '{}' has a truncated hash", name))
                })?;

            entries.push(TreeEntry {
                mode: mode.to_string(),
                name: name.to_string(),
                target: digest,
            });
            rest = &rest[nul + 1 + OBJECT_ID_LEN..];
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// A real entry always starts with octal mode digits, so a leading `tree `
// can only be a leftover header.
fn strip_redundant_header(payload: &[u8]) -> &[u8] {
    if !payload.starts_with(b"tree ") {
        return payload;
    }
    match payload.iter().position(|&b| b == 0) {
        Some(nul) if nul > 5 && payload[5..nul].iter().all(u8::is_ascii_digit) => &payload[nul + 1..],
        _ => payload,
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {} {}", entry.mode, entry.target, entry.name)?;
        }
        Ok(())
    }
}
