//! Candidate topic screening against existing post titles

use crate::dedup::title_fetcher::{fetch_existing_titles, PostSource};
use crate::dedup::title_matcher::{is_duplicate, ExistingTitleSet};

/// Screens candidate topics for one category
pub struct TopicFilter<'a, S: PostSource + ?Sized> {
    source: &'a S,
    category_id: u64,
}

impl<'a, S: PostSource + ?Sized> TopicFilter<'a, S> {
    pub fn new(source: &'a S, category_id: u64) -> Self {
        Self {
            source,
            category_id,
        }
    }

    pub fn category_id(&self) -> u64 {
        self.category_id
    }

    /// Keep the candidates that duplicate neither an existing title nor an
    /// earlier kept candidate
    ///
    /// Titles are fetched when `existing` is `None`. Output order follows
    /// input order.
    pub async fn filter_duplicate_topics<I, T>(
        &self,
        candidates: I,
        existing: Option<ExistingTitleSet>,
    ) -> Vec<String>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut existing = match existing {
            Some(set) => set,
            None => fetch_existing_titles(self.source, self.category_id).await,
        };

        filter_against(candidates, &mut existing)
    }

    /// Whether a single topic may be generated
    pub async fn check_single_topic(&self, topic: &str) -> bool {
        let existing = fetch_existing_titles(self.source, self.category_id).await;
        let unique = !is_duplicate(topic, &existing);

        if unique {
            tracing::info!(topic = %topic, "Topic is unique");
        } else {
            tracing::warn!(topic = %topic, "Topic duplicates an existing post");
        }
        unique
    }
}

/// Network-free core of [`TopicFilter::filter_duplicate_topics`]
///
/// Every kept candidate is inserted into `existing`, so later candidates
/// are screened against it as well.
pub fn filter_against<I, T>(candidates: I, existing: &mut ExistingTitleSet) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut kept = Vec::new();
    let mut total = 0usize;

    for candidate in candidates {
        let candidate = candidate.as_ref();
        total += 1;

        if is_duplicate(candidate, existing) {
            tracing::warn!(topic = %candidate, "Skipping duplicate topic");
            continue;
        }

        existing.insert(candidate);
        kept.push(candidate.to_string());
    }

    tracing::info!(
        candidates = total,
        kept = kept.len(),
        skipped = total - kept.len(),
        "Topic filtering complete"
    );
    kept
}
