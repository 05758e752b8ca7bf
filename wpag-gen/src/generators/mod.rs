//! Article generators
//!
//! One generator per technology, looked up through [`generator_for`].
//! A technology without a generator is reported as a configuration error
//! before any remote call is made.

pub mod profiles;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{GenError, GenResult};
use crate::services::completion_client::{ChatMessage, CompletionClient};
use crate::services::markdown::{extract_title, markdown_to_html, strip_title_line};
use crate::types::Technology;

pub use profiles::{category_id, profile_for, TechnologyProfile};

/// Article produced for one topic, ready to publish
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArticle {
    pub topic: String,
    pub title: String,
    pub markdown: String,
    pub html: String,
}

/// Produces articles for one technology
#[async_trait]
pub trait ArticleGenerator: Send + Sync {
    fn technology(&self) -> Technology;

    fn profile(&self) -> &'static TechnologyProfile;

    /// Generate an article about `topic`
    async fn generate(&self, topic: &str) -> GenResult<GeneratedArticle>;
}

/// Look up the generator for `technology`
pub fn generator_for(
    technology: Technology,
    completion: Arc<CompletionClient>,
) -> GenResult<Box<dyn ArticleGenerator>> {
    match profile_for(technology) {
        Some(profile) => Ok(Box::new(ProfileGenerator {
            profile,
            completion,
        })),
        None => Err(GenError::Config(format!(
            "No article generator is available for technology '{}'",
            technology
        ))),
    }
}

/// Whether [`generator_for`] would succeed for `technology`
pub fn has_generator(technology: Technology) -> bool {
    profile_for(technology).is_some()
}

/// Prompt-driven generator configured by a [`TechnologyProfile`]
struct ProfileGenerator {
    profile: &'static TechnologyProfile,
    completion: Arc<CompletionClient>,
}

#[async_trait]
impl ArticleGenerator for ProfileGenerator {
    fn technology(&self) -> Technology {
        self.profile.technology
    }

    fn profile(&self) -> &'static TechnologyProfile {
        self.profile
    }

    async fn generate(&self, topic: &str) -> GenResult<GeneratedArticle> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenError::InvalidInput("Topic must not be blank".to_string()));
        }

        tracing::info!(
            technology = %self.profile.technology,
            topic = %topic,
            "Generating article"
        );

        let messages = [
            ChatMessage::system(self.profile.system_prompt),
            ChatMessage::user(self.profile.user_prompt(topic)),
        ];

        let text = match self.profile.max_tokens {
            Some(max_tokens) => {
                self.completion
                    .complete_with_max_tokens(&messages, max_tokens)
                    .await?
            }
            None => self.completion.complete(&messages).await?,
        };

        Ok(build_article(self.profile, topic, &text))
    }
}

/// Turn completion text into a publishable article
fn build_article(profile: &TechnologyProfile, topic: &str, text: &str) -> GeneratedArticle {
    let title = if profile.title_from_body {
        extract_title(text, topic)
    } else {
        topic.to_string()
    };

    let markdown = strip_title_line(text, &title);
    let html = markdown_to_html(&markdown);

    GeneratedArticle {
        topic: topic.to_string(),
        title,
        markdown,
        html,
    }
}
