//! Data Transfer Objects - request bodies and JSON page models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Request to register a local account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Title and body of a post, for publishing and editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// Contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub content: String,
}

/// Profile form. Absent fields are cleared, except `name` which is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Admin edit of an account. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdateRequest {
    pub role: Option<String>,
    pub active: Option<bool>,
}

/// `?q=&page=&size=` of the articles page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticlesQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesQuery {
    #[serde(default)]
    pub unread: bool,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response containing a user's account information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: i64,
    pub name: String,
}

/// A post card: title, excerpt and byline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub author: AuthorView,
    /// Display form of `published_at`.
    pub published: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub author: AuthorView,
    pub created: String,
    pub created_at: DateTime<Utc>,
}

/// Full article with its comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: AuthorView,
    pub published: String,
    pub published_at: DateTime<Utc>,
    pub comments: Vec<CommentView>,
    pub comment_count: usize,
}

/// One page of a listing plus the numbers a pager needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PageView<T> {
    pub fn new(items: Vec<T>, page: u64, size: u64, total_items: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_items.div_ceil(size)
        };
        Self {
            items,
            page,
            size,
            total_items,
            total_pages,
            has_next: page + 1 < total_pages,
            has_previous: page > 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomePage {
    pub latest_posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticlesPage {
    /// The trimmed keyword, when one was given.
    pub query: Option<String>,
    pub results: PageView<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutPage {
    pub title: String,
    pub description: String,
    pub features: Vec<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub content: String,
    pub sent: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}

/// The signed-in user's account, profile and posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePage {
    pub user: UserResponse,
    pub bio: Option<String>,
    pub description: Option<String>,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub users: u64,
    pub posts: u64,
    pub comments: u64,
    pub unread_messages: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesPage {
    pub unread_only: bool,
    pub unread_count: u64,
    pub messages: Vec<MessageView>,
}
