//! PR description synthesis.

use crate::error::GenerateError;
use crate::git::{ChangeSet, CommitRecord, FileStatus};
use crate::issues::IssueRefs;

use super::categorize::categorize;

/// Maximum paths listed per status in the Changes section.
const MAX_LISTED_PER_STATUS: usize = 5;

/// Render a PR description from commits, changed files, and issue references.
///
/// Fails with [`GenerateError::NoCommits`] when there is nothing to summarize.
pub fn generate_description(
    commits: &[CommitRecord],
    changes: &ChangeSet,
    issues: &IssueRefs,
) -> Result<String, GenerateError> {
    if commits.is_empty() {
        return Err(GenerateError::NoCommits);
    }
    Ok(render_description(commits, changes, issues))
}

/// Render the document. Sections without content are omitted.
pub fn render_description(
    commits: &[CommitRecord],
    changes: &ChangeSet,
    issues: &IssueRefs,
) -> String {
    let mut sections = vec![section("Summary", &summary_body(commits))];

    if !changes.is_empty() {
        sections.push(section("Changes", &changes_body(changes)));
    }

    if !issues.is_empty() {
        sections.push(section("Related Issues", &issues_body(issues)));
    }

    sections.join("\n\n").trim().to_string()
}

fn section(title: &str, body: &str) -> String {
    format!("## {title}\n\n{body}")
}

fn summary_body(commits: &[CommitRecord]) -> String {
    if let [only] = commits {
        return only.subject.clone();
    }

    let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
    let categories = categorize(&subjects);

    categories
        .in_emission_order()
        .map(|(commit_type, subjects)| {
            let mut group = format!("**{}:**", capitalize(commit_type));
            for subject in subjects {
                group.push_str(&format!("\n- {subject}"));
            }
            group
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn changes_body(changes: &ChangeSet) -> String {
    let mut blocks = vec![format!("**{} file(s) changed**", changes.total())];

    let listed = [
        (FileStatus::Added, &changes.added),
        (FileStatus::Modified, &changes.modified),
        (FileStatus::Deleted, &changes.deleted),
    ];

    for (status, paths) in listed {
        if paths.is_empty() {
            continue;
        }
        let mut block = format!("**{} ({}):**", status, paths.len());
        for path in paths.iter().take(MAX_LISTED_PER_STATUS) {
            block.push_str(&format!("\n- `{path}`"));
        }
        if paths.len() > MAX_LISTED_PER_STATUS {
            block.push_str(&format!(
                "\n- ... and {} more",
                paths.len() - MAX_LISTED_PER_STATUS
            ));
        }
        blocks.push(block);
    }

    blocks.join("\n\n")
}

fn issues_body(issues: &IssueRefs) -> String {
    issues
        .closes
        .iter()
        .map(|n| format!("Closes #{n}"))
        .chain(issues.references.iter().map(|n| format!("References #{n}")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
