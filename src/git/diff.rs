//! Change-set collection and parsing.

use std::fmt;

use git2::{Delta, Diff, DiffFindOptions, DiffFormat, ErrorCode, Repository, Tree};
use serde::Serialize;
use tracing::warn;

use crate::error::GitError;

/// Status of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl FileStatus {
    /// Map a name-status code (`A`, `M`, `D`, `R100`, ...) by its first character.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.chars().next()? {
            'A' => Some(Self::Added),
            'M' => Some(Self::Modified),
            'D' => Some(Self::Deleted),
            'R' => Some(Self::Renamed),
            _ => None,
        }
    }

    fn from_delta(delta: Delta) -> Self {
        match delta {
            Delta::Added | Delta::Untracked => Self::Added,
            Delta::Deleted => Self::Deleted,
            Delta::Renamed => Self::Renamed,
            _ => Self::Modified,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "Added"),
            FileStatus::Modified => write!(f, "Modified"),
            FileStatus::Deleted => write!(f, "Deleted"),
            FileStatus::Renamed => write!(f, "Renamed"),
        }
    }
}

/// A file touched by a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: String,
    pub status: FileStatus,
}

/// Changed paths grouped by status, each group in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub renamed: Vec<String>,
}

impl ChangeSet {
    /// Record a path under its status.
    pub fn push(&mut self, file: ChangedFile) {
        let bucket = match file.status {
            FileStatus::Added => &mut self.added,
            FileStatus::Modified => &mut self.modified,
            FileStatus::Deleted => &mut self.deleted,
            FileStatus::Renamed => &mut self.renamed,
        };
        bucket.push(file.path);
    }

    /// Total number of paths across all statuses.
    pub fn total(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len() + self.renamed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Parse `git diff --name-status` output.
    ///
    /// Lines without a tab or with an unknown status code are skipped.
    /// Rename lines (`R100\told\tnew`) record the new path.
    pub fn from_name_status(text: &str) -> Self {
        let mut set = Self::default();

        for line in text.lines() {
            let Some((code, rest)) = line.split_once('\t') else {
                continue;
            };
            let Some(status) = FileStatus::from_code(code.trim()) else {
                continue;
            };
            let path = match status {
                FileStatus::Renamed => rest.rsplit('\t').next().unwrap_or(rest),
                _ => rest,
            };
            if path.is_empty() {
                continue;
            }
            set.push(ChangedFile {
                path: path.to_string(),
                status,
            });
        }

        set
    }
}

impl FromIterator<ChangedFile> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = ChangedFile>>(iter: I) -> Self {
        let mut set = Self::default();
        for file in iter {
            set.push(file);
        }
        set
    }
}

/// Staged changes: unified patch text plus touched paths.
#[derive(Debug, Clone, Default)]
pub struct StagedDiff {
    pub diff_text: String,
    pub files: Vec<ChangedFile>,
}

impl StagedDiff {
    /// Build from raw unified diff text, recovering paths from its headers.
    pub fn from_unified_diff(text: &str) -> Self {
        let files = paths_from_unified_diff(text)
            .into_iter()
            .map(|path| ChangedFile {
                path,
                status: FileStatus::Modified,
            })
            .collect();

        Self {
            diff_text: text.to_string(),
            files,
        }
    }

    /// Touched paths in discovery order.
    pub fn paths(&self) -> Vec<String> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Extract the new-side path of every `diff --git a/X b/Y` header.
pub fn paths_from_unified_diff(text: &str) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();

    for line in text.lines() {
        let Some(header) = line.strip_prefix("diff --git ") else {
            continue;
        };
        let Some((_, new_path)) = header.rsplit_once(" b/") else {
            continue;
        };
        if !new_path.is_empty() && !paths.iter().any(|p| p == new_path) {
            paths.push(new_path.to_string());
        }
    }

    paths
}

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found).
pub(crate) fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::DiffFailed)?;
    Ok(Some(tree))
}

/// Collect staged changes (HEAD tree against the index).
pub fn collect_staged(repo: &Repository) -> Result<StagedDiff, GitError> {
    let head_tree = resolve_head_tree(repo)?;

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::DiffFailed)?;

    let files = collect_files_from_diff(&diff);
    let diff_text = diff_patch_text(&diff);

    Ok(StagedDiff { diff_text, files })
}

/// Collect the change-set between two trees, with rename detection.
///
/// A missing `old` tree compares against the empty tree.
pub fn collect_tree_changes(
    repo: &Repository,
    old: Option<&Tree<'_>>,
    new: &Tree<'_>,
) -> Result<ChangeSet, GitError> {
    let mut diff = repo
        .diff_tree_to_tree(old, Some(new), None)
        .map_err(GitError::DiffFailed)?;

    let mut find_opts = DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(GitError::DiffFailed)?;

    Ok(collect_files_from_diff(&diff).into_iter().collect())
}

/// Collect changed file entries from a diff.
fn collect_files_from_diff(diff: &Diff<'_>) -> Vec<ChangedFile> {
    diff.deltas()
        .filter_map(|delta| {
            let status = FileStatus::from_delta(delta.status());
            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())?;
            (!path.is_empty()).then_some(ChangedFile { path, status })
        })
        .collect()
}

/// Render a diff as unified patch text.
fn diff_patch_text(diff: &Diff<'_>) -> String {
    let mut text = String::new();

    if let Err(e) = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    }) {
        warn!("Failed to collect diff text: {e}");
    }

    text
}
