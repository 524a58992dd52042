//! prcraft - derives issue references, commit messages, and PR descriptions from git history.
//!
//! # Overview
//!
//! prcraft reads commit history and staged changes through a narrow read-only
//! query interface, classifies them with ordered pattern rules, and renders
//! structured results: issue sets, a conventional commit message, and a
//! templated pull request description.

pub mod commit;
pub mod error;
pub mod git;
pub mod issues;
pub mod pr;

// Re-export commonly used types
pub use commit::{Classification, CommitSuggestion, CommitType};
pub use error::{GenerateError, GitError, IssueError};
pub use git::{ChangeSet, CommitRecord, FileStatus, GitRepo, RepoQuery, StagedDiff};
pub use issues::IssueRefs;
