use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::AuthorSummary;

/// Comment entity - a reply attached to exactly one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author_id: i64,
    pub post_id: i64,
}

impl Comment {
    pub fn new(post_id: i64, author_id: i64, content: String) -> Self {
        Self {
            id: None,
            content,
            created_at: super::timestamp_now(),
            author_id,
            post_id,
        }
    }
}

/// A comment together with its eagerly loaded author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: AuthorSummary,
}
