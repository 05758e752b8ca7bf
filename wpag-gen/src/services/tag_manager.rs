//! Tag name → WordPress tag id resolution
//!
//! Looks a tag up by name and creates it when no exact match exists.
//! Failures for individual tags are logged and skipped so a post can
//! still be published with the tags that did resolve.

use crate::services::wordpress_client::{WordPressClient, WpError};

pub struct TagManager<'a> {
    client: &'a WordPressClient,
}

impl<'a> TagManager<'a> {
    pub fn new(client: &'a WordPressClient) -> Self {
        Self { client }
    }

    /// Return the id of the tag named exactly `name`, creating it if needed
    pub async fn get_or_create_tag_id(&self, name: &str) -> Result<u64, WpError> {
        let candidates = self.client.search_tags(name).await?;
        if let Some(tag) = candidates.iter().find(|t| t.name == name) {
            tracing::debug!(tag = %name, id = tag.id, "Found existing tag");
            return Ok(tag.id);
        }

        tracing::info!(tag = %name, "Creating new tag");
        let created = self.client.create_tag(name).await?;
        Ok(created.id)
    }

    /// Resolve a list of tag names, skipping the ones that fail
    pub async fn tag_ids(&self, names: &[&str]) -> Vec<u64> {
        let mut ids = Vec::with_capacity(names.len());

        for name in names {
            match self.get_or_create_tag_id(name).await {
                Ok(id) => ids.push(id),
                Err(e) => tracing::warn!(tag = %name, error = %e, "Failed to resolve tag id"),
            }
        }

        tracing::info!("Resolved {}/{} tag ids", ids.len(), names.len());
        ids
    }
}
