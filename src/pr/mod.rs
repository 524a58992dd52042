//! Pull request descriptions from branch history.

pub mod categorize;
pub mod description;

pub use categorize::{CommitCategories, EMISSION_ORDER, categorize, declared_type};
pub use description::{generate_description, render_description};

use tracing::debug;

use crate::error::GenerateError;
use crate::git::RepoQuery;
use crate::issues::{IssueRefs, extract_issues};

/// Describe the current branch against `base`.
///
/// When `issues` is `None` they are extracted from the same commits.
pub fn describe_branch<R: RepoQuery + ?Sized>(
    repo: &R,
    base: &str,
    issues: Option<IssueRefs>,
) -> Result<String, GenerateError> {
    let commits = repo.commit_records_since(base);
    let changes = repo.changed_files(base);

    let issues = issues.unwrap_or_else(|| {
        let messages: Vec<String> = commits.iter().map(|c| c.message()).collect();
        extract_issues(&messages)
    });

    debug!(
        commits = commits.len(),
        files = changes.total(),
        "Generating PR description"
    );

    generate_description(&commits, &changes, &issues)
}
