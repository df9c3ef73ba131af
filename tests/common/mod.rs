//! Builds throwaway loose-object repositories for the integration tests

#![allow(dead_code)]

use std::io::Write;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use sha1::{Digest, Sha1};

/// Author/committer line used by every fixture commit (UTC+3)
pub const IDENTITY: &str = "Kalinka Kali <kali.k4@email.com>";
pub const OFFSET: &str = "+0300";

pub struct RepoFixture {
    pub dir: TempDir,
}

impl RepoFixture {
    /// Empty `.git` layout with HEAD on `main`
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        dir.child(".git/objects").create_dir_all().expect("objects dir");
        dir.child(".git/refs/heads").create_dir_all().expect("heads dir");
        dir.child(".git/HEAD")
            .write_str("ref: refs/heads/main\n")
            .expect("HEAD");
        Self { dir }
    }

    pub fn git_dir(&self) -> std::path::PathBuf {
        self.dir.path().join(".git")
    }

    /// Store a record with a real SHA-1 id and return the id in hex
    pub fn write_object(&self, kind: &str, payload: &[u8]) -> String {
        let mut record = format!("{} {}\0", kind, payload.len()).into_bytes();
        record.extend_from_slice(payload);
        self.write_record(&record)
    }

    /// Store arbitrary decompressed bytes, header included
    pub fn write_record(&self, record: &[u8]) -> String {
        let id = hex::encode(Sha1::digest(record));

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(record).expect("compress");
        let compressed = encoder.finish().expect("compress");

        self.dir
            .child(format!(".git/objects/{}/{}", &id[..2], &id[2..]))
            .write_binary(&compressed)
            .expect("object file");
        id
    }

    pub fn blob(&self, content: &str) -> String {
        self.write_object("blob", content.as_bytes())
    }

    /// `entries` are `(mode, name, hex id)` in the order they should be stored
    pub fn tree(&self, entries: &[(&str, &str, &str)]) -> String {
        let mut payload = Vec::new();
        for (mode, name, id) in entries {
            payload.extend(format!("{} {}\0", mode, name).into_bytes());
            payload.extend(hex::decode(id).expect("hex id"));
        }
        self.write_object("tree", &payload)
    }

    pub fn commit(&self, tree: &str, parents: &[&str], timestamp: i64, message: &str) -> String {
        let mut text = format!("tree {}\n", tree);
        for parent in parents {
            text.push_str(&format!("parent {}\n", parent));
        }
        text.push_str(&format!("author {} {} {}\n", IDENTITY, timestamp, OFFSET));
        text.push_str(&format!("committer {} {} {}\n", IDENTITY, timestamp, OFFSET));
        text.push_str(&format!("\n{}\n", message));
        self.write_object("commit", text.as_bytes())
    }

    pub fn branch(&self, name: &str, tip: &str) {
        self.dir
            .child(format!(".git/refs/heads/{}", name))
            .write_str(&format!("{}\n", tip))
            .expect("ref file");
    }

    pub fn head(&self, name: &str) {
        self.dir
            .child(".git/HEAD")
            .write_str(&format!("ref: refs/heads/{}\n", name))
            .expect("HEAD");
    }
}

/// A small history:
///
/// ```text
/// main:    c1 - c2 ------- m
///                \        /
/// feature:        c3 ----
/// ```
pub struct MergedHistory {
    pub repo: RepoFixture,
    pub c1: String,
    pub c2: String,
    pub c3: String,
    pub merge: String,
    pub root_tree: String,
}

impl MergedHistory {
    pub fn build() -> Self {
        let repo = RepoFixture::new();
        let readme = repo.blob("hello\n");
        let main_rs = repo.blob("fn main() {}\n");
        let src = repo.tree(&[("100644", "main.rs", main_rs.as_str())]);
        let root_tree = repo.tree(&[("100644", "README.md", readme.as_str()), ("40000", "src", src.as_str())]);

        let c1 = repo.commit(&root_tree, &[], 1585491500, "initial");
        let c2 = repo.commit(&root_tree, &[c1.as_str()], 1585491600, "second on main");
        let c3 = repo.commit(&root_tree, &[c2.as_str()], 1585491700, "feature work");
        let merge = repo.commit(&root_tree, &[c2.as_str(), c3.as_str()], 1585491800, "Merge branch 'feature'");

        repo.branch("main", &merge);
        repo.branch("feature", &c3);

        Self {
            repo,
            c1,
            c2,
            c3,
            merge,
            root_tree,
        }
    }
}
