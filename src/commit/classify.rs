//! Change classification: commit type, scope, and breaking-change detection.
//!
//! Type inference runs two ordered rule lists, first match wins:
//! path markers checked file by file, then diff content heuristics.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::message::describe_files;

/// Conventional commit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Test,
    Ci,
    Build,
    Style,
    Refactor,
    Perf,
    Chore,
}

impl CommitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feat => "feat",
            Self::Fix => "fix",
            Self::Docs => "docs",
            Self::Test => "test",
            Self::Ci => "ci",
            Self::Build => "build",
            Self::Style => "style",
            Self::Refactor => "refactor",
            Self::Perf => "perf",
            Self::Chore => "chore",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path markers per type, in priority order.
pub const FILE_RULES: &[(CommitType, &[&str])] = &[
    (CommitType::Test, &["/test/", "test_", ".test.", ".spec."]),
    (CommitType::Docs, &["/docs/", "README", ".md"]),
    (CommitType::Ci, &[".github/", ".gitlab-ci", "Jenkinsfile", ".circleci/"]),
    (
        CommitType::Build,
        &["package.json", "pom.xml", "build.gradle", "Makefile", "setup.py"],
    ),
    (CommitType::Style, &[".css", ".scss", ".sass", ".less"]),
];

/// How a diff heuristic matches the diff text.
#[derive(Debug, Clone, Copy)]
pub enum DiffMarker {
    /// Any needle appears verbatim.
    Literal(&'static [&'static str]),
    /// Any needle appears, ignoring case.
    AnyCase(&'static [&'static str]),
}

impl DiffMarker {
    fn matches(&self, diff: &str, diff_lower: &str) -> bool {
        match self {
            Self::Literal(needles) => needles.iter().any(|n| diff.contains(n)),
            Self::AnyCase(needles) => needles.iter().any(|n| diff_lower.contains(n)),
        }
    }
}

/// Diff content heuristics, in priority order. Falls back to `chore`.
pub const DIFF_RULES: &[(CommitType, DiffMarker)] = &[
    (
        CommitType::Feat,
        DiffMarker::Literal(&["new file mode", "--- /dev/null"]),
    ),
    (CommitType::Refactor, DiffMarker::Literal(&["deleted file mode"])),
    (CommitType::Fix, DiffMarker::AnyCase(&["fix", "bug", "issue"])),
    (CommitType::Refactor, DiffMarker::AnyCase(&["refactor"])),
    (
        CommitType::Perf,
        DiffMarker::AnyCase(&["performance", "perf", "optimize"]),
    ),
];

/// Footer note attached to breaking changes.
pub const BREAKING_NOTE: &str = "API changes may affect existing functionality";

/// Maximum distinct top-level directories that still yield a scope.
const MAX_SCOPE_DIRS: usize = 3;

/// Result of classifying a set of staged changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub commit_type: CommitType,
    /// Empty when no scope could be inferred.
    pub scope: String,
    pub breaking: bool,
    pub description: String,
}

impl Classification {
    /// Footer note when breaking, otherwise `None`.
    pub fn breaking_note(&self) -> Option<&'static str> {
        self.breaking.then_some(BREAKING_NOTE)
    }
}

/// Classify a unified diff and the paths it touches.
pub fn classify(diff: &str, files: &[String]) -> Classification {
    let commit_type = match type_from_files(files) {
        Some(ty) => ty,
        None => type_from_diff(diff),
    };
    let scope = infer_scope(files);
    let breaking = detect_breaking(diff);

    debug!(%commit_type, scope = %scope, breaking, files = files.len(), "Classified changes");

    Classification {
        commit_type,
        scope,
        breaking,
        description: describe_files(files),
    }
}

/// First file matching any path rule decides the type.
pub fn type_from_files(files: &[String]) -> Option<CommitType> {
    files.iter().find_map(|file| {
        FILE_RULES
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| file.contains(m)))
            .map(|(ty, _)| *ty)
    })
}

/// Infer the type from diff content alone.
pub fn type_from_diff(diff: &str) -> CommitType {
    let diff_lower = diff.to_lowercase();
    DIFF_RULES
        .iter()
        .find(|(_, marker)| marker.matches(diff, &diff_lower))
        .map(|(ty, _)| *ty)
        .unwrap_or(CommitType::Chore)
}

/// Scope from the top-level directories of the touched paths.
///
/// One directory is the scope; two or three are joined sorted with `,`;
/// more than three, or only root-level files, give an empty scope.
pub fn infer_scope(files: &[String]) -> String {
    let dirs: BTreeSet<&str> = files
        .iter()
        .filter_map(|file| file.split_once('/').map(|(top, _)| top))
        .collect();

    if dirs.len() > MAX_SCOPE_DIRS {
        return String::new();
    }

    dirs.into_iter().collect::<Vec<_>>().join(",")
}

pub fn detect_breaking(diff: &str) -> bool {
    diff.contains("BREAKING CHANGE") || diff.to_lowercase().contains("breaking")
}
