//! HTML rendering for comment threads, articles and the final document.
//!
//! Everything here is a pure string transform: the same input always renders
//! to the same bytes.

use crate::internal::models::{Comment, PostDescriptor};
use crate::utils::datetime::format_timestamp;
use crate::utils::html::sanitize;

const COMMENT_ICON: &str = r##"<svg role="img" width="14" height="20" viewBox="0 0 14 20" fill="none" stroke-width="1" stroke="#000" xmlns="http://www.w3.org/2000/svg" style="height: 20px; width: 14px">
            <g>
              <title>Comment</title>
              <path d="M7.47092 13.7982L7.32727 13.6656H7.13176H2.14118C1.22171 13.6656 0.5 12.944 0.5 12.0679V6.09766C0.5 5.22165 1.22171 4.5 2.14118 4.5H11.8588C12.7783 4.5 13.5 5.22165 13.5 6.09766V12.0679C13.5 12.944 12.7783 13.6656 11.8588 13.6656H10.5412H10.0412V14.1656V16.1657C10.0392 16.1649 10.0339 16.1625 10.0255 16.1565L7.47092 13.7982Z" stroke="#999999"></path>
            </g>
          </svg>"##;

const LIKE_ICON: &str = r##"<svg role="img" width="15" height="20" viewBox="0 0 15 20" fill="none" stroke-width="1" stroke="#000" xmlns="http://www.w3.org/2000/svg" style="height: 20px; width: 15px">
            <g>
              <title></title>
              <path d="M1.73624 5.1145C2.43974 4.37137 3.37095 4 4.3036 4C5.23626 4 6.16745 4.37137 6.87097 5.1145L7.49949 5.77892L8.1227 5.11986C9.52973 3.63357 11.8557 3.6336 13.2627 5.11986C14.6698 6.60612 14.6698 8.98642 13.2627 10.4727C11.4639 12.3728 9.66583 14.2737 7.86703 16.1738C7.81927 16.2242 7.76183 16.2643 7.6982 16.2918C7.63456 16.3192 7.56606 16.3333 7.49683 16.3333C7.42761 16.3333 7.3591 16.3192 7.29547 16.2918C7.23184 16.2643 7.1744 16.2242 7.12664 16.1738L5.77904 14.7472L3.08384 11.8939L1.73624 10.4673C0.331003 8.98011 0.329213 6.60074 1.73624 5.1145Z" stroke="#999999"></path>
            </g>
          </svg>"##;

const STYLESHEET: &str = r#"      html {
        display: flex;
        justify-content: center;
      }

      body {
        max-width: 900px;
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto,
          Helvetica, Arial, sans-serif, "Apple Color Emoji", "Segoe UI Emoji",
          "Segoe UI Symbol";
      }

      .profile-image {
        width: 33px;
        height: 33px;
        border-radius: 50%;
      }

      .comment-head {
        margin-right: 10px;
      }

      .comment {
        display: flex;
        flex-direction: row;
        margin-top: 20px;
      }

      .comment-body {
        display: flex;
        flex-direction: column;
      }

      .comment-meta {
        display: flex;
        flex-direction: row;
        margin-bottom: 5px;
      }

      .comment-poster {
        font-weight: 700;
        margin-right: 10px;
      }

      .comment-time,
      .article-time {
        color: #7a7a7a;
      }

      p {
        margin-top: 0;
      }

      .children {
        display: flex;
        flex-direction: column;
      }

      h2 {
        font-size: 2em;
        font-weight: bold;
        color: black;
      }

      .article-name {
        text-decoration: none;
      }

      .article-metadata {
        display: flex;
        flex-direction: row;
        align-items: center;
        color: #7a7a7a;
      }

      .metadata-item {
        margin-right: 20px;
      }

      svg {
        margin-right: 5px;
      }

      .article-comments-count,
      .article-likes-count {
        display: flex;
        flex-direction: row;
        align-items: center;
        justify-content: center;
      }

      hr {
        height: 2px;
        background-color: black;
      }"#;

/// Render one comment and, recursively, all of its replies.
///
/// Replies are emitted inside the `children` container in the order they
/// appear in `comment.children`. Missing fields render as empty strings.
pub fn render_comment(comment: &Comment) -> String {
    let children: String = comment.children.iter().map(render_comment).collect();
    let photo_url = comment.photo_url.as_deref().unwrap_or_default();
    let author = comment.author.as_deref().unwrap_or_default();
    let time = format_timestamp(comment.date.as_deref().unwrap_or_default());
    let text = sanitize(comment.text.as_deref().unwrap_or_default());

    format!(
        r#"<div class="comment">
<div class="comment-head">
  <img class="profile-image" src="{photo_url}" />
</div>
<div class="comment-body">
  <div class="comment-meta">
    <div class="comment-poster">{author}</div>
    <div class="comment-time">{time}</div>
  </div>
  <div class="comment-text">{text}</div>
  <div class="children">{children}</div>
</div>
</div>"#
    )
}

/// Render every top-level comment of a post, in order.
pub fn render_forest(comments: &[Comment]) -> String {
    comments.iter().map(render_comment).collect()
}

/// Render an article block: post header, metadata icons and its comments.
pub fn render_article(post: &PostDescriptor, comments: &[Comment]) -> String {
    let comments_html = render_forest(comments);
    let published = format_timestamp(&post.published_at);

    format!(
        r#"<div class="article">
  <div class="article-head">
    <a href="{url}" class="article-name"><h2>{title}</h2></a>
    <div class="article-metadata">
      <div class="metadata-item article-time">{published}</div>
      <div class="metadata-item">
        <div class="article-comments-count">
          {COMMENT_ICON}
          <div>{comment_count}</div>
        </div>
      </div>
      <div class="metadata-item">
        <div class="article-likes-count">
          {LIKE_ICON}
          <div>{like_count}</div>
        </div>
      </div>
    </div>
  </div>
  {comments_html}
  <hr />
</div>"#,
        url = post.url,
        title = post.title,
        comment_count = post.comment_count,
        like_count = post.like_count,
    )
}

/// Wrap rendered article blocks into a standalone HTML page.
pub fn render_document(title: &str, articles: &[String]) -> String {
    let body = articles.concat();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta http-equiv="X-UA-Compatible" content="IE=edge" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{title}</title>
    <style>
{STYLESHEET}
    </style>
  </head>
  <body>
    {body}
  </body>
</html>
"#
    )
}
