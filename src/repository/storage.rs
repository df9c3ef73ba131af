use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use flate2::read::ZlibDecoder;
use log::debug;

use crate::core::{GitError, ObjectId, Result};

/// Source of decompressed object records
pub trait ObjectStorage {
    /// Return the full decompressed record (header included) for `id`
    fn read_raw(&self, id: &ObjectId) -> Result<Vec<u8>>;
}

/// File system implementation of loose Git object storage
pub struct FileSystemObjectStore {
    path: PathBuf,
}

impl FileSystemObjectStore {
    /// Create a store rooted at an `objects/` directory
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the path for an object file
    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let (dir, file) = id.loose_path_parts();
        self.path.join(dir).join(file)
    }
}

impl ObjectStorage for FileSystemObjectStore {
    fn read_raw(&self, id: &ObjectId) -> Result<Vec<u8>> {
        let path = self.object_path(id);
        debug!("Reading object {} from {}", id, path.display());

        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(GitError::NotFound(*id)),
            Err(e) => return Err(GitError::Io(e)),
        };

        // The handle is dropped as soon as the payload is inflated
        let mut decoder = ZlibDecoder::new(file);
        let mut content = Vec::new();
        decoder
            .read_to_end(&mut content)
            .map_err(|e| GitError::CorruptObject(*id, e.to_string()))?;

        Ok(content)
    }
}

/// In-memory storage of already-decompressed records
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryObjectStore {
    objects: std::collections::HashMap<ObjectId, Vec<u8>>,
}

#[cfg(test)]
impl MemoryObjectStore {
    /// Insert a record under an id of the caller's choosing
    pub(crate) fn insert(&mut self, id: ObjectId, kind: &str, payload: &[u8]) {
        let mut record = format!("{} {}\0", kind, payload.len()).into_bytes();
        record.extend_from_slice(payload);
        self.objects.insert(id, record);
    }
}

#[cfg(test)]
impl ObjectStorage for MemoryObjectStore {
    fn read_raw(&self, id: &ObjectId) -> Result<Vec<u8>> {
        self.objects.get(id).cloned().ok_or(GitError::NotFound(*id))
    }
}
