//! Error types for prcraft modules using thiserror.

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to find reference '{0}': {1}")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to collect diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),
}

/// Conditions where there is nothing to generate from.
///
/// These are not crashes: they tell the caller that the repository state
/// offers no input, and the CLI maps them to a non-zero exit.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenerateError {
    #[error("No staged changes found. Please stage your changes first with 'git add'.")]
    NoStagedChanges,

    #[error("No commits found")]
    NoCommits,
}

/// Errors from externally supplied issue data.
#[derive(Error, Debug)]
pub enum IssueError {
    #[error("Invalid issue payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}
