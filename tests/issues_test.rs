//! Property and integration tests for issue reference extraction.

mod common;

use proptest::prelude::*;

use common::TestRepo;
use prcraft::issues::{CLOSING_KEYWORDS, extract_issues, issues_since};

// ============================================================================
// Strategies
// ============================================================================

/// A message fragment mentioning a small issue number, closing or bare.
fn mention() -> impl Strategy<Value = String> {
    let keyword = prop::sample::select(CLOSING_KEYWORDS.to_vec());
    prop_oneof![
        (keyword, 1u64..20).prop_map(|(kw, n)| format!("{kw} #{n}")),
        (1u64..20).prop_map(|n| format!("#{n}")),
        (1u64..20).prop_map(|n| format!("see #{n}.")),
        Just("no issue here".to_string()),
        "[a-z ]{0,12}".prop_map(|s| s),
    ]
}

/// A commit message built from several mentions.
fn message() -> impl Strategy<Value = String> {
    prop::collection::vec(mention(), 0..6).prop_map(|parts| parts.join(" "))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn closes_and_references_are_disjoint(messages in prop::collection::vec(message(), 0..8)) {
        let refs = extract_issues(&messages);
        for n in &refs.closes {
            prop_assert!(!refs.references.contains(n));
        }
    }

    #[test]
    fn closing_mention_always_wins(
        messages in prop::collection::vec(message(), 0..8),
        n in 1u64..20,
        position in 0usize..8,
    ) {
        let mut messages = messages;
        let at = position.min(messages.len());
        messages.insert(at, format!("fixes #{n}"));

        let refs = extract_issues(&messages);
        prop_assert!(refs.closes.contains(&n));
        prop_assert!(!refs.references.contains(&n));
    }

    #[test]
    fn extraction_is_idempotent(messages in prop::collection::vec(message(), 0..8)) {
        prop_assert_eq!(extract_issues(&messages), extract_issues(&messages));
    }

    #[test]
    fn output_is_sorted_and_unique(messages in prop::collection::vec(message(), 0..8)) {
        let refs = extract_issues(&messages);
        prop_assert!(refs.closes.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(refs.references.windows(2).all(|w| w[0] < w[1]));
    }
}

// ============================================================================
// Repository-backed extraction
// ============================================================================

#[test]
fn test_issues_since_base_branch() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("a.txt", "a\n", "chore: init\n\nCloses #99");
    test_repo.checkout_new_branch("feature");
    test_repo.commit_file("b.txt", "b\n", "feat: add b\n\nRelated to #5");
    test_repo.commit_file("c.txt", "c\n", "fix: c\n\nResolves #5, fixes #6");

    let refs = issues_since(&test_repo.query(), "main");
    assert_eq!(refs.closes, vec![5, 6]);
    assert!(refs.references.is_empty());
}

#[test]
fn test_issues_since_without_commits() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("a.txt", "a\n", "chore: init");
    test_repo.checkout_new_branch("feature");

    assert!(issues_since(&test_repo.query(), "main").is_empty());
}

#[test]
fn test_issues_on_base_branch_reads_last_commit() {
    let test_repo = TestRepo::new();
    test_repo.commit_file("a.txt", "a\n", "chore: init\n\nSee #1");
    test_repo.commit_file("b.txt", "b\n", "fix: b\n\nCloses #2");

    let refs = issues_since(&test_repo.query(), "main");
    assert_eq!(refs.closes, vec![2]);
    assert!(refs.references.is_empty());
}
