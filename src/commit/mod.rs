//! Conventional commit messages inferred from staged changes.

pub mod classify;
pub mod message;

pub use classify::{BREAKING_NOTE, Classification, CommitType, classify};
pub use message::{
    CommitSuggestion, describe_files, render_message, suggest_commit, suggest_from_repo,
};
