use serde::Deserialize;
use std::collections::HashMap;

/// Reaction label the archive endpoint uses for "likes".
pub const LIKE_REACTION: &str = "\u{2764}";

/// A post summary record as returned by the archive listing endpoint.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ArchivePost {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub post_date: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub comment_count: Option<u64>,
    #[serde(default)]
    pub reactions: Option<HashMap<String, u64>>,
}

/// Summary of one article, in the order the archive listed it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PostDescriptor {
    pub id: u64,
    pub title: String,
    pub published_at: String,
    pub url: String,
    pub comment_count: u64,
    pub like_count: u64,
}

impl From<ArchivePost> for PostDescriptor {
    fn from(post: ArchivePost) -> Self {
        let like_count = post
            .reactions
            .as_ref()
            .and_then(|reactions| reactions.get(LIKE_REACTION))
            .copied()
            .unwrap_or_default();

        Self {
            id: post.id,
            title: post.title.unwrap_or_default(),
            published_at: post.post_date.unwrap_or_default(),
            url: post.canonical_url.unwrap_or_default(),
            comment_count: post.comment_count.unwrap_or_default(),
            like_count,
        }
    }
}

/// Body of the per-post comments endpoint.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CommentsResponse {
    #[serde(default)]
    pub comments: Vec<RawComment>,
}

/// A comment node exactly as the API sends it.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct RawComment {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_author: Option<bool>,
    #[serde(default)]
    pub children: Option<Vec<RawComment>>,
}

/// A comment thread node with the fields the renderer cares about.
///
/// Scalar fields are carried over untouched, so any of them may be `None`
/// when the API omitted it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comment {
    pub author: Option<String>,
    pub date: Option<String>,
    pub text: Option<String>,
    pub photo_url: Option<String>,
    pub is_author: Option<bool>,
    pub children: Vec<Comment>,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Self {
            author: raw.name,
            date: raw.date,
            text: raw.body,
            photo_url: raw.photo_url,
            is_author: raw.is_author,
            children: raw
                .children
                .unwrap_or_default()
                .into_iter()
                .map(Comment::from)
                .collect(),
        }
    }
}

impl Comment {
    /// Number of comments in this thread, including this one.
    pub fn thread_size(&self) -> usize {
        1 + self.children.iter().map(Comment::thread_size).sum::<usize>()
    }
}
