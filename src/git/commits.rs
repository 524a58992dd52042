//! Commit records and raw log block parsing.

use git2::Commit;

/// Separator line between commits in raw log text.
pub const COMMIT_SEPARATOR: &str = "---COMMIT_SEPARATOR---";

/// Length of the abbreviated commit hash.
const SHORT_HASH_LEN: usize = 7;

/// A single commit: short hash, subject line and the remaining body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub subject: String,
    pub body: String,
}

impl CommitRecord {
    /// Parse a raw `hash\nsubject\nbody...` block.
    ///
    /// Returns `None` for blocks with fewer than two lines.
    pub fn from_block(block: &str) -> Option<Self> {
        let lines: Vec<&str> = block.trim().lines().collect();
        if lines.len() < 2 {
            return None;
        }

        let hash: String = lines[0].trim().chars().take(SHORT_HASH_LEN).collect();
        let subject = lines[1].to_string();
        let body = lines[2..].join("\n").trim().to_string();

        Some(Self { hash, subject, body })
    }

    /// Build a record from a git2 commit.
    pub fn from_git2_commit(commit: &Commit) -> Option<Self> {
        let message = String::from_utf8_lossy(commit.message_bytes());
        Self::from_block(&format!("{}\n{}", commit.id(), message))
    }

    /// Subject and body joined back into a full message.
    pub fn message(&self) -> String {
        if self.body.is_empty() {
            self.subject.clone()
        } else {
            format!("{}\n\n{}", self.subject, self.body)
        }
    }
}

/// Parse raw log text into commit records.
///
/// Blocks are separated by [`COMMIT_SEPARATOR`]; malformed blocks are dropped.
pub fn parse_commit_blocks(raw: &str) -> Vec<CommitRecord> {
    raw.split(COMMIT_SEPARATOR)
        .filter(|block| !block.trim().is_empty())
        .filter_map(CommitRecord::from_block)
        .collect()
}

/// Split raw text into full commit messages, one per separated block.
pub fn split_messages(raw: &str) -> Vec<String> {
    raw.split(COMMIT_SEPARATOR)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(String::from)
        .collect()
}
