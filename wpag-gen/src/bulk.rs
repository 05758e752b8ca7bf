//! Bulk draft publishing
//!
//! Lists drafts (one category or all, optionally only recent ones) and
//! switches each to `publish`. Requires the `bulk_publish` feature; without
//! it nothing is listed or changed. A dry run lists the drafts only.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};

use crate::dedup::MAX_PAGES;
use crate::license::LicenseManager;
use crate::orchestrator::DenialReason;
use crate::services::wordpress_client::{PostUpdate, WordPressClient, WpError, WpPost};
use crate::types::{Feature, PostStatus};

/// Drafts newer than this are selected unless told otherwise
pub const DEFAULT_WITHIN_HOURS: u32 = 24;

/// Pause between two status updates
pub const DEFAULT_BULK_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct BulkPublishRequest {
    /// `None` selects drafts in every category
    pub category_id: Option<u64>,
    /// Only drafts dated within this many hours; `None` for all drafts
    pub within_hours: Option<u32>,
    pub dry_run: bool,
    pub delay: Duration,
}

impl Default for BulkPublishRequest {
    fn default() -> Self {
        Self {
            category_id: None,
            within_hours: Some(DEFAULT_WITHIN_HOURS),
            dry_run: false,
            delay: DEFAULT_BULK_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftPost {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkPublishSummary {
    pub dry_run: bool,
    /// Every draft selected, in listing order
    pub drafts: Vec<DraftPost>,
    pub published: Vec<u64>,
    pub failed: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkPublishOutcome {
    Completed(BulkPublishSummary),
    Denied(DenialReason),
}

/// `after` filter value for drafts dated within `hours` of `now`
pub fn draft_cutoff(now: NaiveDateTime, hours: u32) -> String {
    (now - chrono::Duration::hours(i64::from(hours)))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

/// Collect drafts page by page
///
/// An empty page or an out-of-range page ends the listing. Any other
/// error stops it early with what was collected so far.
pub async fn list_drafts(
    client: &WordPressClient,
    category_id: Option<u64>,
    after: Option<&str>,
) -> Vec<DraftPost> {
    let mut drafts = Vec::new();

    for page in 1..=MAX_PAGES {
        match client.list_drafts_page(category_id, after, page).await {
            Ok(posts) if posts.is_empty() => break,
            Ok(posts) => {
                tracing::info!(page, count = posts.len(), "Found drafts");
                drafts.extend(posts.into_iter().map(draft_from));
            }
            Err(WpError::InvalidPage(_)) => break,
            Err(e) => {
                tracing::warn!(page, error = %e, "Draft listing stopped early");
                break;
            }
        }
    }

    tracing::info!(total = drafts.len(), "Draft listing complete");
    drafts
}

fn draft_from(post: WpPost) -> DraftPost {
    DraftPost {
        id: post.id,
        title: post.title.rendered.trim().to_string(),
    }
}

/// Publish selected drafts, gated on the `bulk_publish` feature
pub async fn bulk_publish_drafts(
    client: &WordPressClient,
    license: &LicenseManager,
    request: &BulkPublishRequest,
) -> BulkPublishOutcome {
    if !license.check_feature_access(Feature::BulkPublish.as_str()) {
        return BulkPublishOutcome::Denied(DenialReason::FeatureNotLicensed(
            Feature::BulkPublish,
        ));
    }

    let after = request
        .within_hours
        .map(|hours| draft_cutoff(Local::now().naive_local(), hours));
    let drafts = list_drafts(client, request.category_id, after.as_deref()).await;

    let mut summary = BulkPublishSummary {
        dry_run: request.dry_run,
        ..Default::default()
    };

    if request.dry_run {
        for draft in &drafts {
            tracing::info!(post_id = draft.id, title = %draft.title, "Dry run: would publish");
        }
        summary.drafts = drafts;
        return BulkPublishOutcome::Completed(summary);
    }

    let update = PostUpdate {
        status: Some(PostStatus::Publish),
        tags: None,
    };

    for (i, draft) in drafts.iter().enumerate() {
        if i > 0 && !request.delay.is_zero() {
            tokio::time::sleep(request.delay).await;
        }

        tracing::info!(
            index = i + 1,
            total = drafts.len(),
            post_id = draft.id,
            title = %draft.title,
            "Publishing draft"
        );

        match client.update_post(draft.id, &update).await {
            Ok(_) => summary.published.push(draft.id),
            Err(e) => {
                tracing::error!(post_id = draft.id, error = %e, "Publish failed");
                summary.failed.push(draft.id);
            }
        }
    }

    tracing::info!(
        published = summary.published.len(),
        failed = summary.failed.len(),
        "Bulk publish complete"
    );

    summary.drafts = drafts;
    BulkPublishOutcome::Completed(summary)
}
