//! Generation run: gate, screen, generate, publish, record
//!
//! A run for one technology goes through these steps in order:
//! 1. resolve the generator (configuration error when none exists)
//! 2. technology entitlement check
//! 3. monthly quota check for the requested count
//! 4. duplicate screening of the candidate topics
//! 5. generate and publish each surviving topic, pausing between publishes;
//!    every published article is recorded against the quota right away
//!
//! Denials in steps 2 and 3 end the run with [`RunOutcome::Denied`] and
//! make no remote calls. Failures for a single article are logged and
//! counted; they never abort the batch.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::dedup::TopicFilter;
use crate::error::{GenError, GenResult};
use crate::generators::{generator_for, ArticleGenerator, GeneratedArticle};
use crate::license::LicenseManager;
use crate::services::completion_client::CompletionClient;
use crate::services::tag_manager::TagManager;
use crate::services::wordpress_client::{NewPost, WordPressClient};
use crate::types::{Feature, PostStatus, Technology};

/// Default pause between two publishes
pub const DEFAULT_PUBLISH_DELAY: Duration = Duration::from_secs(30);

/// What to generate
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub technology: Technology,
    /// Maximum number of articles to publish
    pub count: u32,
    /// Candidate topics; empty means the technology's default topics
    pub topics: Vec<String>,
}

/// Why a run was refused before any work started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    TechnologyNotLicensed(Technology),
    FeatureNotLicensed(Feature),
    QuotaExceeded { requested: u32, remaining: u32 },
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::TechnologyNotLicensed(tech) => {
                write!(f, "technology '{}' is not included in this edition", tech)
            }
            DenialReason::FeatureNotLicensed(feature) => {
                write!(f, "feature '{}' is not included in this edition", feature)
            }
            DenialReason::QuotaExceeded {
                requested,
                remaining,
            } => write!(
                f,
                "requested {} articles but only {} remain this month",
                requested, remaining
            ),
        }
    }
}

/// Counters for a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub technology: Option<Technology>,
    pub requested: u32,
    /// Candidate topics before screening
    pub candidates: usize,
    pub skipped_duplicates: usize,
    pub attempted: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub post_ids: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(RunSummary),
    Denied(DenialReason),
}

/// Publishing options that apply to every run
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub post_status: PostStatus,
    pub publish_delay: Duration,
    /// Replaces the technology's default category when set
    pub category_override: Option<u64>,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            post_status: PostStatus::default(),
            publish_delay: DEFAULT_PUBLISH_DELAY,
            category_override: None,
        }
    }
}

pub struct GenerationOrchestrator {
    wordpress: WordPressClient,
    completion: Arc<CompletionClient>,
    license: LicenseManager,
    options: PublishOptions,
}

impl GenerationOrchestrator {
    pub fn new(
        wordpress: WordPressClient,
        completion: Arc<CompletionClient>,
        license: LicenseManager,
        options: PublishOptions,
    ) -> Self {
        Self {
            wordpress,
            completion,
            license,
            options,
        }
    }

    pub fn license(&self) -> &LicenseManager {
        &self.license
    }

    pub fn wordpress(&self) -> &WordPressClient {
        &self.wordpress
    }

    /// Category articles for `technology` are published to
    pub fn category_for(&self, technology: Technology) -> u64 {
        self.options
            .category_override
            .unwrap_or_else(|| crate::generators::category_id(technology))
    }

    pub async fn run(&mut self, request: RunRequest) -> GenResult<RunOutcome> {
        let technology = request.technology;
        let generator = generator_for(technology, Arc::clone(&self.completion))?;

        if !self.license.check_technology_access(technology.as_str()) {
            return Ok(RunOutcome::Denied(DenialReason::TechnologyNotLicensed(
                technology,
            )));
        }

        if !self.license.check_usage_limit(request.count) {
            let remaining = self
                .license
                .get_usage_stats()
                .remaining
                .unwrap_or(u32::MAX);
            return Ok(RunOutcome::Denied(DenialReason::QuotaExceeded {
                requested: request.count,
                remaining,
            }));
        }

        if request.topics.iter().any(|t| t.trim().is_empty()) {
            return Err(GenError::InvalidInput(
                "Candidate topics must not be blank".to_string(),
            ));
        }

        let candidates: Vec<String> = if request.topics.is_empty() {
            generator
                .profile()
                .default_topics
                .iter()
                .map(|t| t.to_string())
                .collect()
        } else {
            request.topics.iter().map(|t| t.trim().to_string()).collect()
        };

        let category_id = self.category_for(technology);
        let entitlements = self.license.edition_info();

        let unique = if entitlements.allows_feature(Feature::DuplicateCheck) {
            TopicFilter::new(&self.wordpress, category_id)
                .filter_duplicate_topics(&candidates, None)
                .await
        } else {
            tracing::info!("Duplicate check not included in this edition, skipping");
            candidates.clone()
        };

        let mut summary = RunSummary {
            technology: Some(technology),
            requested: request.count,
            candidates: candidates.len(),
            skipped_duplicates: candidates.len() - unique.len(),
            ..Default::default()
        };

        let topics: Vec<String> = unique.into_iter().take(request.count as usize).collect();
        if topics.is_empty() {
            tracing::warn!(technology = %technology, "No topics left to generate");
            return Ok(RunOutcome::Completed(summary));
        }

        let tag_ids = if entitlements.allows_feature(Feature::TagManagement) {
            TagManager::new(&self.wordpress)
                .tag_ids(generator.profile().default_tags)
                .await
        } else {
            Vec::new()
        };

        for (i, topic) in topics.iter().enumerate() {
            if i > 0 && !self.options.publish_delay.is_zero() {
                tracing::info!(
                    delay_secs = self.options.publish_delay.as_secs(),
                    "Waiting before next publish"
                );
                tokio::time::sleep(self.options.publish_delay).await;
            }

            tracing::info!(
                index = i + 1,
                total = topics.len(),
                topic = %topic,
                "Processing topic"
            );
            summary.attempted += 1;

            match self
                .generate_and_publish(generator.as_ref(), topic, category_id, &tag_ids)
                .await
            {
                Ok(post_id) => {
                    summary.succeeded += 1;
                    summary.post_ids.push(post_id);
                    // An interrupted batch still counts what it published
                    self.license.record_usage(1);
                }
                Err(e) => {
                    tracing::error!(topic = %topic, error = %e, "Article failed");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            technology = %technology,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped_duplicates = summary.skipped_duplicates,
            "Generation run complete"
        );

        Ok(RunOutcome::Completed(summary))
    }

    async fn generate_and_publish(
        &self,
        generator: &dyn ArticleGenerator,
        topic: &str,
        category_id: u64,
        tag_ids: &[u64],
    ) -> GenResult<u64> {
        let GeneratedArticle { title, html, .. } = generator.generate(topic).await?;

        let post = NewPost {
            title,
            content: html,
            status: self.options.post_status,
            categories: vec![category_id],
            tags: tag_ids.to_vec(),
        };

        let created = self.wordpress.create_post(&post).await?;
        Ok(created.id)
    }
}
