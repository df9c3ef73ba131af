//! Core types shared by the object layer and the commands

pub mod config;
pub mod error;
pub mod object;

pub use config::{ConfigError, InspectorConfig};
pub use error::{GitError, Result};
pub use object::{ObjectId, ObjectType, OBJECT_ID_LEN};
