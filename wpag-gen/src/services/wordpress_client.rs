//! WordPress REST API client
//!
//! Covers the endpoints the generator needs: post listing (for the
//! existing-title set), post creation and update, and tag lookup/creation.
//! Authentication uses an application password over HTTP Basic auth.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

use crate::types::PostStatus;

const API_PREFIX: &str = "/wp-json/wp/v2";
const USER_AGENT: &str = concat!("WPAG/", env!("CARGO_PKG_VERSION"));
const LIST_TIMEOUT_SECS: u64 = 10;
const WRITE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REQUESTS_PER_SECOND: u32 = 5;

/// Posts requested per listing page
pub const PAGE_SIZE: u32 = 100;

/// WordPress client errors
#[derive(Debug, Error)]
pub enum WpError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// HTTP 400 on a listing request: the page is past the last one
    #[error("Page {0} is out of range")]
    InvalidPage(u32),

    #[error("Authentication rejected (HTTP {0})")]
    Unauthorized(u16),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

fn map_send_error(e: reqwest::Error) -> WpError {
    if e.is_timeout() {
        WpError::Timeout(e.to_string())
    } else {
        WpError::NetworkError(e.to_string())
    }
}

/// Application-password credentials
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    pub app_password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, app_password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            app_password: app_password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("app_password", &"<redacted>")
            .finish()
    }
}

/// `{ "rendered": ... }` wrapper used for titles and content
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// Post as returned by `GET /posts`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WpPost {
    pub id: u64,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: Rendered,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(default)]
    pub categories: Vec<u64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Body of `POST /posts`
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub categories: Vec<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}

/// Body of `POST /posts/{id}`; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<u64>>,
}

/// Tag as returned by `GET/POST /tags`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WpTag {
    pub id: u64,
    pub name: String,
}

/// WordPress REST API client
pub struct WordPressClient {
    http_client: reqwest::Client,
    site_url: String,
    api_base: String,
    credentials: Credentials,
    rate_limiter: DefaultDirectRateLimiter,
}

impl WordPressClient {
    pub fn new(site_url: &str, credentials: Credentials) -> Result<Self, WpError> {
        Self::with_rate_limit(site_url, credentials, DEFAULT_REQUESTS_PER_SECOND)
    }

    /// Create a client allowing at most `requests_per_second` calls
    pub fn with_rate_limit(
        site_url: &str,
        credentials: Credentials,
        requests_per_second: u32,
    ) -> Result<Self, WpError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(WRITE_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| WpError::NetworkError(e.to_string()))?;

        let site_url = site_url.trim_end_matches('/').to_string();
        let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            api_base: format!("{}{}", site_url, API_PREFIX),
            site_url,
            credentials,
            rate_limiter: RateLimiter::direct(Quota::per_second(rps)),
        })
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .basic_auth(&self.credentials.user, Some(&self.credentials.app_password))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Fetch one page of published and drafted posts in a category
    ///
    /// HTTP 400 maps to [`WpError::InvalidPage`], which WordPress returns
    /// for a page number past the end of the collection.
    pub async fn list_posts_page(&self, category_id: u64, page: u32) -> Result<Vec<WpPost>, WpError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/posts", self.api_base);
        tracing::debug!(page, category_id, "Listing WordPress posts");

        let response = self
            .authed(self.http_client.get(&url))
            .query(&[
                ("categories", category_id.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
                ("status", "publish,draft".to_string()),
            ])
            .timeout(Duration::from_secs(LIST_TIMEOUT_SECS))
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(WpError::InvalidPage(page));
        }

        let response = check_status(response).await?;
        response
            .json::<Vec<WpPost>>()
            .await
            .map_err(|e| WpError::ParseError(e.to_string()))
    }

    /// Fetch one page of drafts, newest first
    ///
    /// `category_id` of `None` lists every category. `after` is a local
    /// `YYYY-MM-DDTHH:MM:SS` timestamp; only drafts dated later are returned.
    pub async fn list_drafts_page(
        &self,
        category_id: Option<u64>,
        after: Option<&str>,
        page: u32,
    ) -> Result<Vec<WpPost>, WpError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/posts", self.api_base);
        tracing::debug!(page, ?category_id, ?after, "Listing WordPress drafts");

        let mut query = vec![
            ("status", "draft".to_string()),
            ("per_page", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
            ("orderby", "date".to_string()),
            ("order", "desc".to_string()),
        ];
        if let Some(id) = category_id {
            query.push(("categories", id.to_string()));
        }
        if let Some(after) = after {
            query.push(("after", after.to_string()));
        }

        let response = self
            .authed(self.http_client.get(&url))
            .query(&query)
            .timeout(Duration::from_secs(LIST_TIMEOUT_SECS))
            .send()
            .await
            .map_err(map_send_error)?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST {
            return Err(WpError::InvalidPage(page));
        }

        check_status(response)
            .await?
            .json::<Vec<WpPost>>()
            .await
            .map_err(|e| WpError::ParseError(e.to_string()))
    }

    /// Create a post
    pub async fn create_post(&self, post: &NewPost) -> Result<WpPost, WpError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/posts", self.api_base);
        let response = self
            .authed(self.http_client.post(&url))
            .json(post)
            .send()
            .await
            .map_err(map_send_error)?;

        let created: WpPost = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| WpError::ParseError(e.to_string()))?;

        tracing::info!(
            post_id = created.id,
            status = %post.status,
            title = %post.title,
            "Created WordPress post"
        );
        Ok(created)
    }

    /// Update status and/or tags of an existing post
    pub async fn update_post(&self, post_id: u64, update: &PostUpdate) -> Result<WpPost, WpError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/posts/{}", self.api_base, post_id);
        let response = self
            .authed(self.http_client.post(&url))
            .json(update)
            .send()
            .await
            .map_err(map_send_error)?;

        let updated: WpPost = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| WpError::ParseError(e.to_string()))?;

        tracing::info!(post_id, "Updated WordPress post");
        Ok(updated)
    }

    /// Search tags by name (WordPress does a partial match)
    pub async fn search_tags(&self, name: &str) -> Result<Vec<WpTag>, WpError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/tags", self.api_base);
        let response = self
            .authed(self.http_client.get(&url))
            .query(&[("search", name)])
            .send()
            .await
            .map_err(map_send_error)?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| WpError::ParseError(e.to_string()))
    }

    /// Create a tag
    pub async fn create_tag(&self, name: &str) -> Result<WpTag, WpError> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/tags", self.api_base);
        let response = self
            .authed(self.http_client.post(&url))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .map_err(map_send_error)?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| WpError::ParseError(e.to_string()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, WpError> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(WpError::Unauthorized(status.as_u16()));
    }

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(WpError::ApiError(status.as_u16(), error_text));
    }

    Ok(response)
}
