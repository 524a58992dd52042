//! Read-only repository queries.
//!
//! Every query on [`GitRepo`] collapses git failures into an empty result
//! after logging them, so callers only ever see "nothing found".

use std::path::Path;

use git2::{Oid, Repository};
use tracing::{debug, warn};

use crate::error::GitError;

use super::commits::CommitRecord;
use super::diff::{ChangeSet, StagedDiff, collect_staged, collect_tree_changes, resolve_head_tree};

/// Branch compared against when none is given.
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// The version-control queries the generators depend on.
///
/// This abstraction allows mocking the repository in tests.
#[cfg_attr(test, mockall::automock)]
pub trait RepoQuery {
    /// Short name of the checked-out branch, or `None` for detached/unborn HEAD.
    fn current_branch(&self) -> Option<String>;

    /// Full messages of commits on the current branch but not on `base`, newest first.
    fn commit_messages_since(&self, base: &str) -> Vec<String>;

    /// Commits on the current branch but not on `base`, newest first.
    fn commit_records_since(&self, base: &str) -> Vec<CommitRecord>;

    /// Files changed between `base` and HEAD, grouped by status.
    fn changed_files(&self, base: &str) -> ChangeSet;

    /// Changes currently staged in the index.
    fn staged_diff(&self) -> StagedDiff;
}

/// [`RepoQuery`] backed by a git2 repository.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::discover(path).map_err(GitError::OpenRepository)?;
        Ok(Self { repo })
    }

    fn on_base(&self, base: &str) -> bool {
        self.current_branch().as_deref() == Some(base)
    }

    /// Commit OIDs in the comparison range, newest first.
    ///
    /// On the base branch this is just HEAD; otherwise `base..HEAD`.
    fn range_oids(&self, base: &str) -> Result<Vec<Oid>, GitError> {
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| GitError::ReferenceNotFound("HEAD".to_string(), e))?;

        if self.on_base(base) {
            return Ok(vec![head.id()]);
        }

        let base_oid = self.resolve(base)?;

        let mut revwalk = self.repo.revwalk().map_err(GitError::RevwalkError)?;
        revwalk.push(head.id()).map_err(GitError::RevwalkError)?;
        revwalk.hide(base_oid).map_err(GitError::RevwalkError)?;

        revwalk
            .map(|oid| oid.map_err(GitError::RevwalkError))
            .collect()
    }

    fn resolve(&self, reference: &str) -> Result<Oid, GitError> {
        self.repo
            .revparse_single(reference)
            .and_then(|obj| obj.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|e| GitError::ReferenceNotFound(reference.to_string(), e))
    }

    fn try_commit_records(&self, base: &str) -> Result<Vec<CommitRecord>, GitError> {
        let mut records = Vec::new();
        for oid in self.range_oids(base)? {
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(GitError::RevwalkError)?;
            if let Some(record) = CommitRecord::from_git2_commit(&commit) {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn try_commit_messages(&self, base: &str) -> Result<Vec<String>, GitError> {
        let mut messages = Vec::new();
        for oid in self.range_oids(base)? {
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(GitError::RevwalkError)?;
            let message = String::from_utf8_lossy(commit.message_bytes());
            let message = message.trim();
            if !message.is_empty() {
                messages.push(message.to_string());
            }
        }
        Ok(messages)
    }

    /// On the base branch: `HEAD~1..HEAD`. Otherwise: merge-base of base and HEAD to HEAD.
    fn try_changed_files(&self, base: &str) -> Result<ChangeSet, GitError> {
        let Some(head_tree) = resolve_head_tree(&self.repo)? else {
            return Ok(ChangeSet::default());
        };
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| GitError::ReferenceNotFound("HEAD".to_string(), e))?;

        let old_commit = if self.on_base(base) {
            head.parents().next()
        } else {
            let base_oid = self.resolve(base)?;
            let merge_base = self
                .repo
                .merge_base(base_oid, head.id())
                .map_err(|e| GitError::ReferenceNotFound(base.to_string(), e))?;
            Some(
                self.repo
                    .find_commit(merge_base)
                    .map_err(GitError::RevwalkError)?,
            )
        };

        let old_tree = old_commit
            .map(|c| c.tree())
            .transpose()
            .map_err(GitError::DiffFailed)?;

        collect_tree_changes(&self.repo, old_tree.as_ref(), &head_tree)
    }
}

impl RepoQuery for GitRepo {
    fn current_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        if !head.is_branch() {
            return None;
        }
        head.shorthand().map(String::from)
    }

    fn commit_messages_since(&self, base: &str) -> Vec<String> {
        match self.try_commit_messages(base) {
            Ok(messages) => {
                debug!(base, count = messages.len(), "Collected commit messages");
                messages
            }
            Err(e) => {
                warn!("Could not read commit messages since {base}: {e}");
                Vec::new()
            }
        }
    }

    fn commit_records_since(&self, base: &str) -> Vec<CommitRecord> {
        match self.try_commit_records(base) {
            Ok(records) => {
                debug!(base, count = records.len(), "Collected commits");
                records
            }
            Err(e) => {
                warn!("Could not read commits since {base}: {e}");
                Vec::new()
            }
        }
    }

    fn changed_files(&self, base: &str) -> ChangeSet {
        match self.try_changed_files(base) {
            Ok(set) => {
                debug!(base, count = set.total(), "Collected changed files");
                set
            }
            Err(e) => {
                warn!("Could not diff against {base}: {e}");
                ChangeSet::default()
            }
        }
    }

    fn staged_diff(&self) -> StagedDiff {
        match collect_staged(&self.repo) {
            Ok(staged) => {
                debug!(count = staged.files.len(), "Collected staged changes");
                staged
            }
            Err(e) => {
                warn!("Could not read staged changes: {e}");
                StagedDiff::default()
            }
        }
    }
}
