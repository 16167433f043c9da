use std::sync::Arc;

use crate::domain::{Comment, CommentWithAuthor};
use crate::error::{DomainError, DomainResult};
use crate::pagination::{Page, PageRequest};
use crate::ports::{BaseRepository, CommentRepository, PostRepository};
use crate::validation;

use super::{AuthContext, for_entity};

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { comments, posts }
    }

    async fn ensure_post_exists(&self, post_id: i64) -> DomainResult<()> {
        self.posts
            .find_by_id(post_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Post", post_id))
    }

    async fn load(&self, id: i64) -> DomainResult<Comment> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))
    }

    /// Comments of a post, oldest first.
    pub async fn comments_for_post(&self, post_id: i64) -> DomainResult<Vec<CommentWithAuthor>> {
        self.ensure_post_exists(post_id).await?;
        Ok(self.comments.find_by_post_with_author(post_id).await?)
    }

    pub async fn add_comment(
        &self,
        actor: &AuthContext,
        post_id: i64,
        content: String,
    ) -> DomainResult<Comment> {
        let comment = Comment::new(post_id, actor.user_id, content);
        validation::validate_comment(&comment).into_result()?;
        self.ensure_post_exists(post_id).await?;

        let saved = self.comments.save(comment).await?;
        tracing::info!(comment_id = ?saved.id, post_id, author_id = actor.user_id, "Comment added");
        Ok(saved)
    }

    /// Replace the body of a comment; its timestamp and post stay as they were.
    pub async fn edit_comment(
        &self,
        actor: &AuthContext,
        id: i64,
        content: String,
    ) -> DomainResult<Comment> {
        let mut comment = self.load(id).await?;
        actor.require_owner(comment.author_id)?;

        comment.content = content;
        validation::validate_comment(&comment).into_result()?;
        Ok(self.comments.save(comment).await?)
    }

    pub async fn delete_comment(&self, actor: &AuthContext, id: i64) -> DomainResult<()> {
        let comment = self.load(id).await?;
        actor.require_owner(comment.author_id)?;

        self.comments
            .delete(id)
            .await
            .map_err(for_entity("Comment", id))?;
        tracing::info!(comment_id = id, actor_id = actor.user_id, "Comment deleted");
        Ok(())
    }

    /// Newest comments across all posts, for moderation.
    pub async fn recent_comments(
        &self,
        actor: &AuthContext,
        page: i64,
        size: i64,
    ) -> DomainResult<Page<CommentWithAuthor>> {
        actor.require_admin()?;
        let request = PageRequest::new(page, size)?;
        Ok(self.comments.find_recent_with_author(request).await?)
    }
}
