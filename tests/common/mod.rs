//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use git2::{Oid, Repository, RepositoryInitOptions, Signature};
use prcraft::GitRepo;

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository whose initial branch is `main`.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let repo = Repository::init_opts(dir.path(), &opts).expect("Failed to init git repo");
        Self { dir, repo }
    }

    /// Open a query handle on this repository.
    pub fn query(&self) -> GitRepo {
        GitRepo::open(self.dir.path()).expect("Failed to open repository")
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file and add it to the index.
    pub fn stage_file(&self, path: &str, content: &str) {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(path)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Delete a file and remove it from the index.
    pub fn stage_removal(&self, path: &str) {
        std::fs::remove_file(self.dir.path().join(path)).expect("Failed to remove file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.remove_path(Path::new(path)).expect("Failed to remove from index");
        index.write().expect("Failed to write index");
    }

    /// Commit whatever is staged. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = self.signature();

        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Commit whatever is staged with a message given as raw bytes.
    ///
    /// Writes the commit object directly so the message may be invalid UTF-8.
    /// HEAD must already point at a branch with commits.
    pub fn commit_raw_message(&self, message: &[u8]) -> Oid {
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let head = self.repo.head().expect("Failed to resolve HEAD");
        let parent = head.target().expect("HEAD has no target");

        let mut raw = format!("tree {tree_id}\nparent {parent}\n").into_bytes();
        raw.extend_from_slice(b"author Test User <test@example.com> 1700000000 +0000\n");
        raw.extend_from_slice(b"committer Test User <test@example.com> 1700000000 +0000\n\n");
        raw.extend_from_slice(message);

        let oid = self
            .repo
            .odb()
            .and_then(|odb| odb.write(git2::ObjectType::Commit, &raw))
            .expect("Failed to write commit object");
        let branch = head.name().expect("Branch name is not UTF-8").to_string();
        self.repo
            .reference(&branch, oid, true, "raw commit")
            .expect("Failed to move branch");
        oid
    }

    /// Stage a single file and commit it.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        self.stage_file(path, content);
        self.commit(message)
    }

    /// Create a branch at HEAD and check it out.
    pub fn checkout_new_branch(&self, name: &str) {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to resolve HEAD");
        self.repo
            .branch(name, &head, false)
            .expect("Failed to create branch");
        self.repo
            .set_head(&format!("refs/heads/{name}"))
            .expect("Failed to check out branch");
    }
}
