use anyhow::{Context, Result};
use futures::future::try_join_all;
use std::path::PathBuf;

use crate::api::ApiService;
use crate::config::AppConfig;
use crate::internal::models::{Comment, PostDescriptor};
use crate::internal::render::{render_article, render_document};

/// A post together with its normalized comment forest.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleThread {
    pub post: PostDescriptor,
    pub comments: Vec<Comment>,
}

impl ArticleThread {
    pub fn comment_total(&self) -> usize {
        self.comments.iter().map(Comment::thread_size).sum()
    }
}

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSummary {
    pub articles: usize,
    pub comments: usize,
    pub bytes: usize,
    pub output_path: PathBuf,
}

/// Drives one archive run: list posts, fetch their comments, render, write.
pub struct Archiver {
    api: ApiService,
    config: AppConfig,
}

impl Archiver {
    pub fn new(config: AppConfig) -> Self {
        Self {
            api: ApiService::from_config(&config),
            config,
        }
    }

    pub fn with_api(api: ApiService, config: AppConfig) -> Self {
        Self { api, config }
    }

    /// Fetch every post and its comments.
    ///
    /// The listing is paged sequentially; comment requests for all posts are
    /// then issued at once. Results keep the listing order.
    pub async fn fetch_threads(&self) -> Result<Vec<ArticleThread>> {
        let posts = self.api.fetch_all_posts().await?;
        tracing::info!(posts = posts.len(), "fetching comments");

        try_join_all(posts.into_iter().map(|post| async move {
            let raw = self.api.fetch_comments(post.id).await?;
            let comments: Vec<Comment> = raw.into_iter().map(Comment::from).collect();
            tracing::debug!(post = post.id, top_level = comments.len(), "comments fetched");
            Ok::<_, anyhow::Error>(ArticleThread { post, comments })
        }))
        .await
    }

    pub fn render(&self, threads: &[ArticleThread]) -> String {
        let articles: Vec<String> = threads
            .iter()
            .map(|thread| render_article(&thread.post, &thread.comments))
            .collect();
        render_document(&self.config.document_title, &articles)
    }

    pub async fn build_document(&self) -> Result<String> {
        let threads = self.fetch_threads().await?;
        Ok(self.render(&threads))
    }

    /// Build the document and write it to the configured output path.
    pub async fn run(&self) -> Result<ArchiveSummary> {
        let threads = self.fetch_threads().await?;
        let html = self.render(&threads);
        let output_path = PathBuf::from(&self.config.output_path);

        tokio::fs::write(&output_path, &html)
            .await
            .with_context(|| format!("failed to write {}", output_path.display()))?;

        let summary = ArchiveSummary {
            articles: threads.len(),
            comments: threads.iter().map(ArticleThread::comment_total).sum(),
            bytes: html.len(),
            output_path,
        };
        tracing::info!(
            articles = summary.articles,
            comments = summary.comments,
            bytes = summary.bytes,
            "wrote {}",
            summary.output_path.display()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    async fn mock_archive(server: &mut mockito::ServerGuard) -> Vec<mockito::Mock> {
        let listing = server
            .mock("GET", "/api/v1/archive")
            .match_query(Matcher::UrlEncoded("offset".into(), "0".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": 1, "title": "First", "post_date": "2021-04-09T03:21:47.408Z",
                     "canonical_url": "https://example.com/p/first", "comment_count": 3,
                     "reactions": {"❤": 10}},
                    {"id": 2, "title": "Second", "post_date": "2021-04-02T03:21:47.408Z",
                     "canonical_url": "https://example.com/p/second", "comment_count": 0,
                     "reactions": {"❤": 1}}
                ]"#,
            )
            .create_async()
            .await;
        let end = server
            .mock("GET", "/api/v1/archive")
            .match_query(Matcher::UrlEncoded("offset".into(), "12".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let first_comments = server
            .mock("GET", "/api/v1/post/1/comments")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"comments": [
                    {"body": "parent text", "date": "2021-04-09T05:00:00.000Z", "name": "alice",
                     "photo_url": "a.png", "is_author": false,
                     "children": [
                        {"body": "child text", "date": "2021-04-09T06:00:00.000Z", "name": "scott",
                         "photo_url": "s.png", "is_author": true, "children": []}
                     ]},
                    {"body": "sibling text", "date": "2021-04-09T07:00:00.000Z", "name": "bob",
                     "photo_url": "b.png", "is_author": false, "children": []}
                ]}"#,
            )
            .create_async()
            .await;
        let second_comments = server
            .mock("GET", "/api/v1/post/2/comments")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"comments": []}"#)
            .create_async()
            .await;

        vec![listing, end, first_comments, second_comments]
    }

    #[tokio::test]
    async fn test_fetch_threads_keeps_listing_order() {
        let mut server = mockito::Server::new_async().await;
        let _mocks = mock_archive(&mut server).await;

        let archiver = Archiver::with_api(
            ApiService::with_base_url(server.url()),
            AppConfig::default(),
        );
        let threads = archiver.fetch_threads().await.unwrap();

        let ids: Vec<_> = threads.iter().map(|t| t.post.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(threads[0].comments.len(), 2);
        assert_eq!(threads[0].comment_total(), 3);
        assert_eq!(threads[1].comment_total(), 0);
    }

    #[tokio::test]
    async fn test_build_document_nests_replies() {
        let mut server = mockito::Server::new_async().await;
        let _mocks = mock_archive(&mut server).await;

        let archiver = Archiver::with_api(
            ApiService::with_base_url(server.url()),
            AppConfig::default(),
        );
        let html = archiver.build_document().await.unwrap();

        assert_eq!(html.matches(r#"<div class="comment">"#).count(), 3);
        assert_eq!(html.matches(r#"<div class="article">"#).count(), 2);

        let parent = html.find("<p>parent text</p>").unwrap();
        let child = html.find("<p>child text</p>").unwrap();
        let sibling = html.find("<p>sibling text</p>").unwrap();
        assert!(parent < child && child < sibling);

        // the reply sits inside alice's children container
        let (before_child, _) = html.split_at(child);
        let alice_children = before_child.rfind(r#"<div class="children">"#).unwrap();
        assert!(alice_children > parent);

        let first = html.find("<h2>First</h2>").unwrap();
        let second = html.find("<h2>Second</h2>").unwrap();
        assert!(sibling < second && first < parent);
    }

    #[tokio::test]
    async fn test_run_writes_output_file() {
        let mut server = mockito::Server::new_async().await;
        let _mocks = mock_archive(&mut server).await;

        let output = std::env::temp_dir().join("substack_archive_run_test.html");
        let config = AppConfig {
            output_path: output.display().to_string(),
            document_title: "Test Archive".to_string(),
            ..AppConfig::default()
        };
        let archiver = Archiver::with_api(ApiService::with_base_url(server.url()), config);

        let summary = archiver.run().await.unwrap();
        let written = std::fs::read_to_string(&output).unwrap();

        assert_eq!(summary.articles, 2);
        assert_eq!(summary.comments, 3);
        assert_eq!(summary.bytes, written.len());
        assert!(written.contains("<title>Test Archive</title>"));

        let _ = std::fs::remove_file(output);
    }

    #[tokio::test]
    async fn test_failed_comment_fetch_aborts_run() {
        let mut server = mockito::Server::new_async().await;
        let _listing = server
            .mock("GET", "/api/v1/archive")
            .match_query(Matcher::UrlEncoded("offset".into(), "0".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 5, "title": "Broken"}]"#)
            .create_async()
            .await;
        let _end = server
            .mock("GET", "/api/v1/archive")
            .match_query(Matcher::UrlEncoded("offset".into(), "12".into()))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let _comments = server
            .mock("GET", "/api/v1/post/5/comments")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let archiver = Archiver::with_api(
            ApiService::with_base_url(server.url()),
            AppConfig::default(),
        );
        let err = archiver.build_document().await.unwrap_err();

        assert!(err.to_string().contains("fetch_comments failed for post 5"));
    }
}
