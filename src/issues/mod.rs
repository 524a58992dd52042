//! Issue reference extraction from commit messages.
//!
//! Finds closing mentions (`fixes #12`) and bare mentions (`#7`). A number
//! that is closed anywhere in the input is never reported as a reference.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IssueError;
use crate::git::RepoQuery;

/// Verbs that close an issue when followed by `#<number>`.
pub const CLOSING_KEYWORDS: &[&str] = &[
    "close", "closes", "closed", "fix", "fixes", "fixed", "resolve", "resolves", "resolved",
];

static CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)\b({})\s+#(\d+)", CLOSING_KEYWORDS.join("|"));
    Regex::new(&pattern).expect("closing keyword pattern is valid")
});

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d+)").expect("reference pattern is valid"));

/// Issues to close and issues merely referenced, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRefs {
    #[serde(default)]
    pub closes: Vec<u64>,
    #[serde(default)]
    pub references: Vec<u64>,
}

impl IssueRefs {
    /// Parse an externally supplied payload; missing keys default to empty.
    pub fn from_json(json: &str) -> Result<Self, IssueError> {
        let mut refs: Self = serde_json::from_str(json).map_err(IssueError::InvalidPayload)?;
        refs.normalize();
        Ok(refs)
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty() && self.references.is_empty()
    }

    /// Drop zeros, sort, dedupe, and drop references that are also closed.
    fn normalize(&mut self) {
        self.closes.retain(|&n| n > 0);
        self.references.retain(|&n| n > 0);
        self.closes.sort_unstable();
        self.closes.dedup();
        let closes = &self.closes;
        self.references.retain(|n| closes.binary_search(n).is_err());
        self.references.sort_unstable();
        self.references.dedup();
    }
}

/// Extract issue references from commit messages, in input order.
pub fn extract_issues<S: AsRef<str>>(messages: &[S]) -> IssueRefs {
    let mut closes: BTreeSet<u64> = BTreeSet::new();
    let mut references: BTreeSet<u64> = BTreeSet::new();

    for message in messages {
        let message = message.as_ref();

        for caps in CLOSING_RE.captures_iter(message) {
            if let Some(n) = caps.get(2).and_then(|m| issue_number(m.as_str())) {
                closes.insert(n);
            }
        }

        for caps in REFERENCE_RE.captures_iter(message) {
            if let Some(n) = caps.get(1).and_then(|m| issue_number(m.as_str())) {
                if !closes.contains(&n) {
                    references.insert(n);
                }
            }
        }
    }

    // A later closing mention supersedes an earlier bare one.
    references.retain(|n| !closes.contains(n));

    debug!(
        closes = closes.len(),
        references = references.len(),
        "Extracted issue references"
    );

    IssueRefs {
        closes: closes.into_iter().collect(),
        references: references.into_iter().collect(),
    }
}

/// Issue numbers are positive; zero and overflowing digit runs are skipped.
fn issue_number(digits: &str) -> Option<u64> {
    digits.parse::<u64>().ok().filter(|&n| n > 0)
}

/// Extract issue references from the commits on the current branch since `base`.
///
/// A repository without matching history yields empty sets.
pub fn issues_since<R: RepoQuery + ?Sized>(repo: &R, base: &str) -> IssueRefs {
    extract_issues(&repo.commit_messages_since(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::repo::MockRepoQuery;

    #[test]
    fn test_no_matches() {
        let refs = extract_issues(&["chore: tidy up", "nothing here"]);
        assert!(refs.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let refs = extract_issues::<&str>(&[]);
        assert_eq!(refs, IssueRefs::default());
    }

    #[test]
    fn test_closing_keywords_case_insensitive() {
        let refs = extract_issues(&["Fixes #1", "CLOSED #2", "resolve #3", "closes   #4"]);
        assert_eq!(refs.closes, vec![1, 2, 3, 4]);
        assert!(refs.references.is_empty());
    }

    #[test]
    fn test_bare_reference() {
        let refs = extract_issues(&["see #7 and #9, also #7"]);
        assert!(refs.closes.is_empty());
        assert_eq!(refs.references, vec![7, 9]);
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        let refs = extract_issues(&["prefix #5", "hotfixes #6"]);
        assert!(refs.closes.is_empty());
        assert_eq!(refs.references, vec![5, 6]);
    }

    #[test]
    fn test_closing_then_bare_in_later_commit() {
        let refs = extract_issues(&["fix: crash\n\nFixes #12", "docs: mention #12 and #7"]);
        assert_eq!(refs.closes, vec![12]);
        assert_eq!(refs.references, vec![7]);
    }

    #[test]
    fn test_bare_then_closing_in_later_commit() {
        let refs = extract_issues(&["wip on #12", "fix: done\n\ncloses #12"]);
        assert_eq!(refs.closes, vec![12]);
        assert!(refs.references.is_empty());
    }

    #[test]
    fn test_bare_before_closing_within_message() {
        let refs = extract_issues(&["#8 was bad, this fixes #8"]);
        assert_eq!(refs.closes, vec![8]);
        assert!(refs.references.is_empty());
    }

    #[test]
    fn test_overflowing_number_skipped() {
        let refs = extract_issues(&["see #99999999999999999999999 and #3"]);
        assert_eq!(refs.references, vec![3]);
    }

    #[test]
    fn test_zero_is_not_an_issue() {
        let refs = extract_issues(&["see #0 and fixes #00", "closes #000"]);
        assert!(refs.is_empty());

        let refs = extract_issues(&["fixes #0 and #10"]);
        assert!(refs.closes.is_empty());
        assert_eq!(refs.references, vec![10]);
    }

    #[test]
    fn test_from_json_drops_zero() {
        let refs = IssueRefs::from_json(r#"{"closes": [0, 4], "references": [0]}"#).unwrap();
        assert_eq!(refs.closes, vec![4]);
        assert!(refs.references.is_empty());
    }

    #[test]
    fn test_from_json_defaults_missing_keys() {
        let refs = IssueRefs::from_json(r#"{"closes": [3]}"#).unwrap();
        assert_eq!(refs.closes, vec![3]);
        assert!(refs.references.is_empty());

        let refs = IssueRefs::from_json("{}").unwrap();
        assert!(refs.is_empty());
    }

    #[test]
    fn test_from_json_normalizes() {
        let refs =
            IssueRefs::from_json(r#"{"closes": [5, 1, 5], "references": [9, 1, 2]}"#).unwrap();
        assert_eq!(refs.closes, vec![1, 5]);
        assert_eq!(refs.references, vec![2, 9]);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            IssueRefs::from_json("not json"),
            Err(IssueError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_serializes_both_keys() {
        let refs = IssueRefs {
            closes: vec![1],
            references: vec![],
        };
        assert_eq!(
            serde_json::to_string(&refs).unwrap(),
            r#"{"closes":[1],"references":[]}"#
        );
    }

    #[test]
    fn test_issues_since_queries_history() {
        let mut mock = MockRepoQuery::new();
        mock.expect_commit_messages_since()
            .times(1)
            .returning(|_| vec!["fix: x\n\nresolves #21".to_string(), "ref #3".to_string()]);

        let refs = issues_since(&mock, "main");
        assert_eq!(refs.closes, vec![21]);
        assert_eq!(refs.references, vec![3]);
    }

    #[test]
    fn test_issues_since_empty_history() {
        let mut mock = MockRepoQuery::new();
        mock.expect_commit_messages_since().returning(|_| Vec::new());

        assert!(issues_since(&mock, "main").is_empty());
    }
}
