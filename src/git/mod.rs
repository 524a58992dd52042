//! Git queries using git2-rs.

pub mod commits;
pub mod diff;
pub mod repo;

pub use commits::{COMMIT_SEPARATOR, CommitRecord, parse_commit_blocks, split_messages};
pub use diff::{ChangeSet, ChangedFile, FileStatus, StagedDiff, paths_from_unified_diff};
pub use repo::{DEFAULT_BASE_BRANCH, GitRepo, RepoQuery};
