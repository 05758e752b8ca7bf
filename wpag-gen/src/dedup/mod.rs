//! Duplicate avoidance
//!
//! - [`title_matcher`]: normalization and the near-duplicate rule
//! - [`title_fetcher`]: paged collection of existing titles
//! - [`topic_filter`]: screening candidate topics against both

pub mod title_fetcher;
pub mod title_matcher;
pub mod topic_filter;

pub use title_fetcher::{fetch_existing_titles, PostSource, MAX_PAGES};
pub use title_matcher::{is_duplicate, normalize_title, titles_match, ExistingTitleSet};
pub use topic_filter::{filter_against, TopicFilter};
