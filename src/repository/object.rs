use std::fmt;

use log::debug;

use crate::core::{GitError, ObjectId, ObjectType, Result};
use crate::repository::commit::Commit;
use crate::repository::storage::ObjectStorage;
use crate::repository::tree::Tree;

/// A decompressed record split into its header fields and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub kind: ObjectType,
    /// Length declared by the header
    pub length: usize,
    pub payload: Vec<u8>,
}

/// Split `<type> <length>\0<payload>` into its parts.
///
/// `id` is only used to label errors.
pub fn parse_header(id: &ObjectId, bytes: &[u8], verify_length: bool) -> Result<StoredObject> {
    let header_end = bytes
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| GitError::MalformedHeader(*id, "missing header terminator".to_string()))?;

    let header = std::str::from_utf8(&bytes[..header_end])
        .map_err(|_| GitError::MalformedHeader(*id, "header is not valid UTF-8".to_string()))?;

    let (kind, length) = header
        .split_once(' ')
        .ok_or_else(|| GitError::MalformedHeader(*id, format!("invalid header format: {}", header)))?;

    let kind = ObjectType::parse(kind)
        .ok_or_else(|| GitError::MalformedHeader(*id, format!("unknown object type: {}", kind)))?;

    let length = length
        .parse::<usize>()
        .map_err(|_| GitError::MalformedHeader(*id, format!("invalid object size: {}", length)))?;

    let payload = bytes[header_end + 1..].to_vec();
    if verify_length && payload.len() != length {
        return Err(GitError::MalformedHeader(
            *id,
            format!("size mismatch: header says {}, payload has {}", length, payload.len()),
        ));
    }

    Ok(StoredObject { kind, length, payload })
}

/// A fully decoded object
#[derive(Debug, Clone)]
pub enum Object {
    Blob(Vec<u8>),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    pub fn kind(&self) -> ObjectType {
        match self {
            Object::Blob(_) => ObjectType::Blob,
            Object::Tree(_) => ObjectType::Tree,
            Object::Commit(_) => ObjectType::Commit,
        }
    }
}

/// Reads records from an [`ObjectStorage`] and decodes them by type.
///
/// Nothing is cached: every lookup re-reads and re-inflates the record.
pub struct ObjectReader<'a> {
    storage: &'a dyn ObjectStorage,
    verify_length: bool,
}

impl<'a> ObjectReader<'a> {
    pub fn new(storage: &'a dyn ObjectStorage, verify_length: bool) -> Self {
        Self {
            storage,
            verify_length,
        }
    }

    /// Read and split the record for `id`
    pub fn read(&self, id: &ObjectId) -> Result<StoredObject> {
        let raw = self.storage.read_raw(id)?;
        let object = parse_header(id, &raw, self.verify_length)?;
        debug!("Object {} is a {} of {} bytes", id, object.kind, object.length);
        Ok(object)
    }

    /// Read and decode `id` according to its header type
    pub fn read_object(&self, id: &ObjectId) -> Result<Object> {
        let stored = self.read(id)?;
        Ok(match stored.kind {
            ObjectType::Blob => Object::Blob(stored.payload),
            ObjectType::Tree => Object::Tree(Tree::decode(id, &stored.payload)?),
            ObjectType::Commit => Object::Commit(Commit::decode(id, &stored.payload)?),
        })
    }

    pub fn read_commit(&self, id: &ObjectId) -> Result<Commit> {
        match self.read_object(id)? {
            Object::Commit(commit) => Ok(commit),
            other => Err(unexpected(id, ObjectType::Commit, other.kind())),
        }
    }

    pub fn read_tree(&self, id: &ObjectId) -> Result<Tree> {
        match self.read_object(id)? {
            Object::Tree(tree) => Ok(tree),
            other => Err(unexpected(id, ObjectType::Tree, other.kind())),
        }
    }
}

fn unexpected(id: &ObjectId, expected: ObjectType, found: ObjectType) -> GitError {
    GitError::UnexpectedType {
        id: *id,
        expected: expected.as_str(),
        found: found.as_str(),
    }
}

/// Blob rendering for `cat-file`
pub struct BlobText<'a>(pub &'a [u8]);

impl fmt::Display for BlobText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.0))
    }
}
