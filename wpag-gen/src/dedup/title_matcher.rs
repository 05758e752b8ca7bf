//! Title normalization and near-duplicate matching
//!
//! Two titles are duplicates when their normalized forms are equal, or when
//! both are longer than [`CONTAINMENT_MIN_CHARS`] characters and one
//! contains the other. Short titles only ever match exactly, which keeps
//! generic names like "React入門" from swallowing every longer title.

use std::collections::HashSet;

/// Minimum normalized length (exclusive, in characters) for containment matching
pub const CONTAINMENT_MIN_CHARS: usize = 10;

/// Lowercase and trim a title
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Set of normalized titles already present in the content store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingTitleSet {
    titles: HashSet<String>,
}

impl ExistingTitleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a title in normalized form; returns false if already present
    pub fn insert(&mut self, title: &str) -> bool {
        self.titles.insert(normalize_title(title))
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(&normalize_title(title))
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExistingTitleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for title in iter {
            set.insert(title.as_ref());
        }
        set
    }
}

/// Whether two titles are duplicates of each other
pub fn titles_match(a: &str, b: &str) -> bool {
    normalized_match(&normalize_title(a), &normalize_title(b))
}

fn normalized_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    a.chars().count() > CONTAINMENT_MIN_CHARS
        && b.chars().count() > CONTAINMENT_MIN_CHARS
        && (a.contains(b) || b.contains(a))
}

/// Whether `candidate` duplicates any title in `existing`
pub fn is_duplicate(candidate: &str, existing: &ExistingTitleSet) -> bool {
    let candidate = normalize_title(candidate);

    if existing.titles.contains(&candidate) {
        return true;
    }

    existing
        .iter()
        .any(|title| normalized_match(&candidate, title))
}
