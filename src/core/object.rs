use std::fmt;
use std::str::FromStr;

use hex::{FromHex, ToHex};

use crate::core::{GitError, Result};

/// Length in bytes of a raw SHA-1 digest
pub const OBJECT_ID_LEN: usize = 20;

/// Represents a Git object ID (SHA-1 hash)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// Create a new ObjectId from bytes
    pub fn new(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an id from a raw digest slice, which must be exactly 20 bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: [u8; OBJECT_ID_LEN] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Parse a 40 character hex id, accepting either case
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        if hex.len() != OBJECT_ID_LEN * 2 {
            return Err(GitError::InvalidObjectId(format!(
                "expected 40 hex characters, got {}: {}",
                hex.len(),
                hex
            )));
        }

        <[u8; OBJECT_ID_LEN]>::from_hex(hex)
            .map(Self)
            .map_err(|e| GitError::InvalidObjectId(format!("{}: {}", hex, e)))
    }

    /// Get the object ID as bytes
    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_LEN] {
        &self.0
    }

    /// Get a lowercase hex string representation
    pub fn to_hex(&self) -> String {
        self.0.encode_hex::<String>()
    }

    /// Split into the loose-object fan-out directory and file name
    pub fn loose_path_parts(&self) -> (String, String) {
        let hex = self.to_hex();
        let (dir, file) = hex.split_at(2);
        (dir.to_string(), file.to_string())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = GitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Enumeration of the object types stored in a loose object database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Commit,
    Tree,
    Blob,
}

impl ObjectType {
    /// Convert the object type to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Commit => "commit",
            ObjectType::Tree => "tree",
            ObjectType::Blob => "blob",
        }
    }

    /// Try to parse an object type from its header keyword
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "commit" => Some(ObjectType::Commit),
            "tree" => Some(ObjectType::Tree),
            "blob" => Some(ObjectType::Blob),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
