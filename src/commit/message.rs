//! Commit message rendering from a classification.

use serde::Serialize;

use crate::error::GenerateError;
use crate::git::{RepoQuery, StagedDiff};

use super::classify::{Classification, CommitType, classify};

/// Above this many files the subject counts files and a body lists them.
const MAX_LISTED_IN_SUBJECT: usize = 3;

/// Maximum paths listed in the message body.
const MAX_LISTED_IN_BODY: usize = 10;

/// Short description of the touched files.
pub fn describe_files(files: &[String]) -> String {
    if files.len() == 1 {
        format!("update {}", files[0])
    } else if files.len() <= MAX_LISTED_IN_SUBJECT {
        format!("update {}", files.join(", "))
    } else {
        format!("update {} files", files.len())
    }
}

/// Render the full commit message.
///
/// Produces:
/// ```text
/// type(scope)!: description
///
/// Modified files:
/// - path
///
/// BREAKING CHANGE: note
/// ```
/// The scope, `!`, body, and footer appear only when they apply.
pub fn render_message(classification: &Classification, files: &[String]) -> String {
    let mut parts = vec![subject_line(classification)];

    if files.len() > MAX_LISTED_IN_SUBJECT {
        let mut body = String::from("Modified files:");
        for file in files.iter().take(MAX_LISTED_IN_BODY) {
            body.push_str(&format!("\n- {file}"));
        }
        if files.len() > MAX_LISTED_IN_BODY {
            body.push_str(&format!(
                "\n... and {} more files",
                files.len() - MAX_LISTED_IN_BODY
            ));
        }
        parts.push(body);
    }

    if let Some(note) = classification.breaking_note() {
        parts.push(format!("BREAKING CHANGE: {note}"));
    }

    parts.join("\n\n")
}

fn subject_line(classification: &Classification) -> String {
    let mut subject = classification.commit_type.to_string();
    if !classification.scope.is_empty() {
        subject.push_str(&format!("({})", classification.scope));
    }
    if classification.breaking {
        subject.push('!');
    }
    format!("{subject}: {}", classification.description)
}

/// A suggested commit message with the facts it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSuggestion {
    pub message: String,
    #[serde(rename = "type")]
    pub commit_type: CommitType,
    pub scope: String,
    pub breaking: bool,
    pub files_count: usize,
}

/// Suggest a commit message for staged changes.
pub fn suggest_commit(staged: &StagedDiff) -> Result<CommitSuggestion, GenerateError> {
    let files = staged.paths();
    if files.is_empty() {
        return Err(GenerateError::NoStagedChanges);
    }

    let classification = classify(&staged.diff_text, &files);
    let message = render_message(&classification, &files);

    Ok(CommitSuggestion {
        message,
        commit_type: classification.commit_type,
        scope: classification.scope,
        breaking: classification.breaking,
        files_count: files.len(),
    })
}

/// Suggest a commit message for the changes staged in `repo`.
pub fn suggest_from_repo<R: RepoQuery + ?Sized>(
    repo: &R,
) -> Result<CommitSuggestion, GenerateError> {
    suggest_commit(&repo.staged_diff())
}
