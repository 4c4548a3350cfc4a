pub mod pagination;

use crate::config::AppConfig;
use crate::internal::models::{ArchivePost, CommentsResponse, PostDescriptor, RawComment};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The archive endpoint hands out posts in batches of 12 no matter what
/// `limit` asks for, so the offset has to move by exactly this much.
pub const PAGE_SIZE: usize = 12;

pub const SUBSTACK_BASE_URL: &str = "https://astralcodexten.substack.com";

/// Ordering of the post archive listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, Serialize, Deserialize)]
pub enum ArchiveSort {
    #[default]
    New,
    Top,
}

impl ArchiveSort {
    fn as_api_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Top => "top",
        }
    }
}

/// Ordering of comments within a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, Serialize, Deserialize)]
pub enum CommentSort {
    #[default]
    NewestFirst,
    OldestFirst,
    BestFirst,
}

impl CommentSort {
    fn as_api_str(&self) -> &str {
        match self {
            Self::NewestFirst => "newest_first",
            Self::OldestFirst => "oldest_first",
            Self::BestFirst => "best_first",
        }
    }
}

/// HTTP API service for a Substack publication.
///
/// Errors are returned as `anyhow::Result` with the failing operation and URL
/// attached as context. Nothing is retried.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    base_url: String,
    archive_sort: ArchiveSort,
    comment_sort: CommentSort,
}

impl ApiService {
    pub fn new() -> Self {
        Self::with_base_url(SUBSTACK_BASE_URL)
    }

    /// Point the service at another publication (or a mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            archive_sort: ArchiveSort::default(),
            comment_sort: CommentSort::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_base_url(config.base_url.as_str())
            .with_sorting(config.archive_sort, config.comment_sort)
    }

    pub fn with_sorting(mut self, archive_sort: ArchiveSort, comment_sort: CommentSort) -> Self {
        self.archive_sort = archive_sort;
        self.comment_sort = comment_sort;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn archive_url(&self, offset: usize) -> String {
        format!(
            "{}/api/v1/archive?sort={}&search=&offset={}&limit={}",
            self.base_url,
            self.archive_sort.as_api_str(),
            offset,
            PAGE_SIZE
        )
    }

    fn comments_url(&self, post_id: u64) -> String {
        format!(
            "{}/api/v1/post/{}/comments?all_comments=true&sort={}",
            self.base_url,
            post_id,
            self.comment_sort.as_api_str()
        )
    }

    /// Generic helper to GET a URL and deserialize the JSON body into `T`.
    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(url, "GET");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {}", url))?
            .error_for_status()
            .with_context(|| format!("unsuccessful response from {}", url))?;

        resp.json::<T>()
            .await
            .with_context(|| format!("failed to parse JSON response from {}", url))
    }

    /// Fetch one page of post summaries starting at `offset`.
    pub async fn fetch_archive_page(&self, offset: usize) -> Result<Vec<PostDescriptor>> {
        let url = self.archive_url(offset);
        let posts: Vec<ArchivePost> = self
            .get_json(&url)
            .await
            .with_context(|| format!("fetch_archive_page failed at offset {}", offset))?;

        Ok(posts.into_iter().map(PostDescriptor::from).collect())
    }

    /// Walk the whole archive, newest page first, until it runs dry.
    pub async fn fetch_all_posts(&self) -> Result<Vec<PostDescriptor>> {
        let posts =
            pagination::collect_pages(PAGE_SIZE, |offset| self.fetch_archive_page(offset)).await?;
        tracing::info!(count = posts.len(), sort = %self.archive_sort, "archive listing complete");
        Ok(posts)
    }

    /// Fetch the top-level comment trees of a post.
    pub async fn fetch_comments(&self, post_id: u64) -> Result<Vec<RawComment>> {
        let url = self.comments_url(post_id);
        let response: CommentsResponse = self
            .get_json(&url)
            .await
            .with_context(|| format!("fetch_comments failed for post {}", post_id))?;

        Ok(response.comments)
    }
}

impl Default for ApiService {
    fn default() -> Self {
        Self::new()
    }
}
