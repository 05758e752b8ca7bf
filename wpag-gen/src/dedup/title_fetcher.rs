//! Existing-title fetcher
//!
//! Pages through the content store's post listing and collects every
//! published or drafted title in one category.
//!
//! Termination:
//! - empty page: normal end
//! - out-of-range page (HTTP 400): normal end
//! - [`MAX_PAGES`] pages fetched: stop with a warning
//! - any other failure: stop early and return what was collected so far
//!
//! Partial results are acceptable here. Screening against an incomplete
//! set can let a duplicate through but never blocks a unique topic.

use async_trait::async_trait;

use crate::dedup::title_matcher::ExistingTitleSet;
use crate::services::wordpress_client::{WordPressClient, WpError, WpPost};

/// Safety ceiling on pages requested per fetch
pub const MAX_PAGES: u32 = 100;

/// Paged post listing, implemented by the WordPress client
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch page `page` (1-based) of posts in `category_id`
    async fn list_posts_page(&self, category_id: u64, page: u32) -> Result<Vec<WpPost>, WpError>;
}

#[async_trait]
impl PostSource for WordPressClient {
    async fn list_posts_page(&self, category_id: u64, page: u32) -> Result<Vec<WpPost>, WpError> {
        WordPressClient::list_posts_page(self, category_id, page).await
    }
}

/// Collect the titles of all posts in `category_id`
///
/// Never fails; see the module docs for how errors end pagination.
pub async fn fetch_existing_titles<S>(source: &S, category_id: u64) -> ExistingTitleSet
where
    S: PostSource + ?Sized,
{
    let mut titles = ExistingTitleSet::new();
    let mut page: u32 = 1;

    tracing::info!(category_id, "Fetching existing post titles");

    loop {
        match source.list_posts_page(category_id, page).await {
            Ok(posts) if posts.is_empty() => {
                tracing::debug!(page, "Empty page, end of listing");
                break;
            }
            Ok(posts) => {
                for post in &posts {
                    let title = post.title.rendered.trim();
                    if !title.is_empty() {
                        titles.insert(title);
                    }
                }
                tracing::info!(page, count = posts.len(), "Fetched page of existing posts");
            }
            Err(WpError::InvalidPage(_)) => {
                tracing::debug!(page, "Page out of range, end of listing");
                break;
            }
            Err(WpError::ApiError(status, body)) => {
                tracing::error!(page, status, body = %body, "Existing title fetch failed, keeping partial results");
                break;
            }
            Err(e) => {
                tracing::error!(page, error = %e, "Existing title fetch failed, keeping partial results");
                break;
            }
        }

        if page >= MAX_PAGES {
            tracing::warn!(max_pages = MAX_PAGES, "Page limit reached, stopping title fetch");
            break;
        }
        page += 1;
    }

    tracing::info!(total = titles.len(), category_id, "Existing title fetch complete");
    titles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::wordpress_client::Rendered;
    use std::sync::Mutex;

    /// Scripted source: returns responses in order, then empty pages
    struct ScriptedSource {
        responses: Mutex<Vec<Result<Vec<WpPost>, WpError>>>,
        calls: Mutex<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(mut responses: Vec<Result<Vec<WpPost>, WpError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<u32> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PostSource for ScriptedSource {
        async fn list_posts_page(&self, _category_id: u64, page: u32) -> Result<Vec<WpPost>, WpError> {
            self.calls.lock().unwrap().push(page);
            self.responses.lock().unwrap().pop().unwrap_or(Ok(Vec::new()))
        }
    }

    /// Endless source: every page is full
    struct EndlessSource {
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl PostSource for EndlessSource {
        async fn list_posts_page(&self, _category_id: u64, page: u32) -> Result<Vec<WpPost>, WpError> {
            *self.calls.lock().unwrap() += 1;
            Ok(vec![post(page as u64, &format!("Post number {}", page))])
        }
    }

    fn post(id: u64, title: &str) -> WpPost {
        WpPost {
            id,
            title: Rendered {
                rendered: title.to_string(),
            },
            content: Rendered::default(),
            tags: vec![],
            categories: vec![2],
            date: None,
            status: None,
            link: None,
        }
    }

    fn full_page(offset: u64) -> Vec<WpPost> {
        (0..100)
            .map(|i| post(offset + i, &format!("Article {}", offset + i)))
            .collect()
    }

    #[tokio::test]
    async fn test_full_page_then_empty_page() {
        let source = ScriptedSource::new(vec![Ok(full_page(0)), Ok(vec![])]);
        let titles = fetch_existing_titles(&source, 2).await;

        assert_eq!(source.calls(), vec![1, 2]);
        assert_eq!(titles.len(), 100);
    }

    #[tokio::test]
    async fn test_invalid_page_ends_normally() {
        let source = ScriptedSource::new(vec![
            Ok(full_page(0)),
            Ok(full_page(100)),
            Err(WpError::InvalidPage(3)),
        ]);
        let titles = fetch_existing_titles(&source, 2).await;

        assert_eq!(source.calls(), vec![1, 2, 3]);
        assert_eq!(titles.len(), 200);
    }

    #[tokio::test]
    async fn test_error_returns_partial_results() {
        let source = ScriptedSource::new(vec![
            Ok(full_page(0)),
            Err(WpError::Timeout("deadline".to_string())),
            Ok(full_page(200)),
        ]);
        let titles = fetch_existing_titles(&source, 2).await;

        assert_eq!(source.calls(), vec![1, 2]);
        assert_eq!(titles.len(), 100);
    }

    #[tokio::test]
    async fn test_server_error_returns_partial_results() {
        let source = ScriptedSource::new(vec![
            Ok(vec![post(1, "First")]),
            Err(WpError::ApiError(500, "boom".to_string())),
        ]);
        let titles = fetch_existing_titles(&source, 2).await;

        assert_eq!(titles.len(), 1);
        assert!(titles.contains("first"));
    }

    #[tokio::test]
    async fn test_error_on_first_page_gives_empty_set() {
        let source = ScriptedSource::new(vec![Err(WpError::NetworkError("refused".to_string()))]);
        let titles = fetch_existing_titles(&source, 2).await;

        assert!(titles.is_empty());
        assert_eq!(source.calls(), vec![1]);
    }

    #[tokio::test]
    async fn test_page_ceiling() {
        let source = EndlessSource {
            calls: Mutex::new(0),
        };
        let titles = fetch_existing_titles(&source, 2).await;

        assert_eq!(*source.calls.lock().unwrap(), MAX_PAGES);
        assert_eq!(titles.len(), MAX_PAGES as usize);
    }

    #[tokio::test]
    async fn test_titles_trimmed_blank_skipped_duplicates_collapse() {
        let source = ScriptedSource::new(vec![Ok(vec![
            post(1, "  Vue 3 Composition API  "),
            post(2, ""),
            post(3, "   "),
            post(4, "vue 3 composition api"),
        ])]);
        let titles = fetch_existing_titles(&source, 9).await;

        assert_eq!(titles.len(), 1);
        assert!(titles.contains("Vue 3 Composition API"));
    }
}
