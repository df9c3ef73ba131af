use crate::core::{ObjectId, Result};
use crate::repository::object::BlobText;
use crate::repository::{Object, Repository};

/// Implements `cat-file`: dump a single object by hash
pub struct CatFileCommand<'a> {
    repo: &'a Repository,
    id: ObjectId,
}

impl<'a> CatFileCommand<'a> {
    pub fn new(repo: &'a Repository, hash: &str) -> Result<Self> {
        Ok(Self {
            repo,
            id: ObjectId::from_hex(hash)?,
        })
    }

    /// Render `*TYPE*` followed by the decoded payload
    pub fn execute(&self) -> Result<String> {
        let object = self.repo.reader().read_object(&self.id)?;
        let header = format!("*{}*", object.kind().as_str().to_uppercase());

        let body = match &object {
            Object::Blob(data) => BlobText(data).to_string(),
            Object::Tree(tree) => tree.to_string(),
            Object::Commit(commit) => commit.render(&self.repo.config().timestamp_format),
        };

        Ok(format!("{}\n{}", header, body))
    }
}
