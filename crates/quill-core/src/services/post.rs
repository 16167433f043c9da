use std::sync::Arc;

use crate::domain::{Post, PostDetail, PostDraft, PostWithAuthor};
use crate::error::{DomainError, DomainResult};
use crate::pagination::{Page, PageRequest};
use crate::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};
use crate::validation;

use super::{AuthContext, for_entity};

/// Listing, search, publishing and moderation of posts.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            comments,
        }
    }

    /// One page of all posts, most recent first.
    pub async fn list_posts(&self, page: i64, size: i64) -> DomainResult<Page<PostWithAuthor>> {
        let request = PageRequest::new(page, size)?;
        Ok(self.posts.find_page_with_author(request).await?)
    }

    /// Keyword search over title and content; a blank keyword lists everything.
    pub async fn search_posts(
        &self,
        keyword: Option<&str>,
        page: i64,
        size: i64,
    ) -> DomainResult<Page<PostWithAuthor>> {
        let request = PageRequest::new(page, size)?;
        match keyword.map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => {
                tracing::debug!(keyword = %keyword, page, size, "Searching posts");
                Ok(self.posts.search_with_author(keyword, request).await?)
            }
            None => Ok(self.posts.find_page_with_author(request).await?),
        }
    }

    /// The `limit` most recently published posts.
    pub async fn latest_posts(&self, limit: u64) -> DomainResult<Vec<PostWithAuthor>> {
        let request = PageRequest::new(0, limit as i64)?;
        Ok(self.posts.find_page_with_author(request).await?.items)
    }

    /// A post with its author and comments.
    pub async fn get_post(&self, id: i64) -> DomainResult<PostDetail> {
        let PostWithAuthor { post, author } = self
            .posts
            .find_with_author(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;
        let comments = self.comments.find_by_post_with_author(id).await?;

        Ok(PostDetail {
            post,
            author,
            comments,
        })
    }

    pub async fn posts_by_author(&self, author_id: i64) -> DomainResult<Vec<Post>> {
        Ok(self.posts.find_by_author(author_id).await?)
    }

    /// Publish a new post (`draft.id == None`) or update an existing one.
    ///
    /// The publication timestamp is stamped on first save only; edits keep
    /// the original timestamp and author.
    pub async fn save_post(&self, draft: PostDraft) -> DomainResult<Post> {
        validation::validate_post(&draft).into_result()?;
        let Some(author_id) = draft.author_id else {
            return Err(DomainError::invalid(validation::ERROR_AUTHOR_REQUIRED));
        };
        let title = draft.title.trim().to_string();

        let post = match draft.id {
            None => {
                self.users
                    .find_by_id(author_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("User", author_id))?;
                Post::new(author_id, title, draft.content)
            }
            Some(id) => {
                let mut existing = self
                    .posts
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Post", id))?;
                existing.title = title;
                existing.content = draft.content;
                existing
            }
        };

        let is_new = post.id.is_none();
        let saved = self.posts.save(post).await?;
        tracing::info!(post_id = ?saved.id, author_id = saved.author_id, is_new, "Post saved");
        Ok(saved)
    }

    /// Edit title and content. Only the author or an admin may edit.
    pub async fn edit_post(
        &self,
        actor: &AuthContext,
        id: i64,
        title: String,
        content: String,
    ) -> DomainResult<Post> {
        let existing = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;
        actor.require_owner(existing.author_id)?;

        self.save_post(PostDraft {
            id: Some(id),
            title,
            content,
            author_id: Some(existing.author_id),
        })
        .await
    }

    /// Delete a post and, with it, its comments.
    pub async fn delete_post(&self, actor: &AuthContext, id: i64) -> DomainResult<()> {
        let existing = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;
        actor.require_owner(existing.author_id)?;

        self.posts.delete(id).await.map_err(for_entity("Post", id))?;
        tracing::info!(post_id = id, actor_id = actor.user_id, "Post deleted");
        Ok(())
    }
}
