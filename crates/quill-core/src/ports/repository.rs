use async_trait::async_trait;

use crate::domain::{
    Comment, CommentWithAuthor, Message, Post, PostWithAuthor, Profile, User,
};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity: insert when it has no id yet, update otherwise.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Unknown ids yield `RepoError::NotFound`.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;

    /// Number of stored entities.
    async fn count(&self) -> Result<u64, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i64> {
    /// Find a user by their (normalized) email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepoError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// All users, oldest account first.
    async fn find_all(&self) -> Result<Vec<User>, RepoError>;
}

/// Post repository. Every read that feeds a page loads the author in the same query.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// All posts, most recently published first.
    async fn find_page_with_author(
        &self,
        page: PageRequest,
    ) -> Result<Page<PostWithAuthor>, RepoError>;

    /// Posts whose title or content contains `keyword`, case-insensitively,
    /// most recently published first.
    async fn search_with_author(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<PostWithAuthor>, RepoError>;

    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError>;

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Comments of one post, oldest first.
    async fn find_by_post_with_author(
        &self,
        post_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, RepoError>;

    /// All comments, newest first, for moderation.
    async fn find_recent_with_author(
        &self,
        page: PageRequest,
    ) -> Result<Page<CommentWithAuthor>, RepoError>;
}

/// Contact message repository.
#[async_trait]
pub trait MessageRepository: BaseRepository<Message, i64> {
    /// All messages, newest first.
    async fn find_all_newest_first(&self) -> Result<Vec<Message>, RepoError>;

    /// Messages with the given read flag, newest first.
    async fn find_by_read_newest_first(&self, read: bool) -> Result<Vec<Message>, RepoError>;

    async fn count_by_read(&self, read: bool) -> Result<u64, RepoError>;
}

/// Profile repository.
#[async_trait]
pub trait ProfileRepository: BaseRepository<Profile, i64> {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, RepoError>;
}
