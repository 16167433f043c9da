use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::comment::CommentWithAuthor;
use super::user::AuthorSummary;

/// Post entity - a published article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    /// Set at first save and never changed afterwards.
    pub published_at: DateTime<Utc>,
    pub author_id: i64,
}

impl Post {
    /// Create a new, not yet persisted, post published now.
    pub fn new(author_id: i64, title: String, content: String) -> Self {
        Self {
            id: None,
            title,
            content,
            published_at: super::timestamp_now(),
            author_id,
        }
    }
}

/// Input of the publish/edit use case.
///
/// `id == None` publishes a new post, `Some(id)` edits an existing one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    pub author_id: Option<i64>,
}

/// A post together with its eagerly loaded author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: AuthorSummary,
}

/// Everything the article page shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
    pub author: AuthorSummary,
    pub comments: Vec<CommentWithAuthor>,
}
