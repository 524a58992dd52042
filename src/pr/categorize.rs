//! Grouping of conventional commit subjects by declared type.

/// Category for subjects without a declared type.
pub const OTHER: &str = "other";

/// Order in which categories appear in a PR summary.
pub const EMISSION_ORDER: &[&str] = &[
    "feat", "fix", "refactor", "perf", "docs", "test", "chore", OTHER,
];

/// Subjects grouped by declared type, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitCategories {
    groups: Vec<(String, Vec<String>)>,
}

impl CommitCategories {
    /// Subjects declared with `commit_type`, empty if none.
    pub fn get(&self, commit_type: &str) -> &[String] {
        self.groups
            .iter()
            .find(|(ty, _)| ty == commit_type)
            .map(|(_, subjects)| subjects.as_slice())
            .unwrap_or(&[])
    }

    /// Non-empty categories in [`EMISSION_ORDER`].
    ///
    /// Declared types outside that order are not emitted.
    pub fn in_emission_order(&self) -> impl Iterator<Item = (&'static str, &[String])> + '_ {
        EMISSION_ORDER
            .iter()
            .map(|ty| (*ty, self.get(ty)))
            .filter(|(_, subjects)| !subjects.is_empty())
    }

    fn push(&mut self, commit_type: String, subject: String) {
        match self.groups.iter_mut().find(|(ty, _)| *ty == commit_type) {
            Some((_, subjects)) => subjects.push(subject),
            None => self.groups.push((commit_type, vec![subject])),
        }
    }
}

/// Declared type of a subject: text before the first `:`, minus any
/// `(scope)` and `!` suffix. `None` when the subject is not conventional.
pub fn declared_type(subject: &str) -> Option<&str> {
    let (type_part, _) = subject.split_once(':')?;
    let commit_type = type_part
        .split('(')
        .next()
        .unwrap_or(type_part)
        .trim()
        .trim_end_matches('!');
    (!commit_type.is_empty()).then_some(commit_type)
}

/// Group subjects by declared type.
pub fn categorize<S: AsRef<str>>(subjects: &[S]) -> CommitCategories {
    let mut categories = CommitCategories::default();

    for subject in subjects {
        let subject = subject.as_ref();
        let commit_type = declared_type(subject).unwrap_or(OTHER);
        categories.push(commit_type.to_string(), subject.to_string());
    }

    categories
}
