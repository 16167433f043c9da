//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use quill_core::domain::{
    AuthorSummary, CommentWithAuthor, Message, Post, PostWithAuthor, Profile, User, mask_email,
};
use quill_core::error::RepoError;
use quill_core::pagination::{Page, PageRequest};
use quill_core::ports::{
    CommentRepository, MessageRepository, PostRepository, ProfileRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::message::{self, Entity as MessageEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::profile::{self, Entity as ProfileEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL contact message repository.
pub type PostgresMessageRepository = PostgresBaseRepository<MessageEntity>;

/// PostgreSQL profile repository.
pub type PostgresProfileRepository = PostgresBaseRepository<ProfileEntity>;

fn author_of(author: Option<user::Model>, author_id: i64) -> Result<AuthorSummary, RepoError> {
    author
        .map(|u| AuthorSummary {
            id: u.id,
            name: u.name,
        })
        .ok_or_else(|| RepoError::Query(format!("author {author_id} is missing")))
}

fn post_with_author(
    (model, author): (post::Model, Option<user::Model>),
) -> Result<PostWithAuthor, RepoError> {
    let author = author_of(author, model.author_id)?;
    Ok(PostWithAuthor {
        post: model.into(),
        author,
    })
}

fn comment_with_author(
    (model, author): (comment::Model, Option<user::Model>),
) -> Result<CommentWithAuthor, RepoError> {
    let author = author_of(author, model.author_id)?;
    Ok(CommentWithAuthor {
        comment: model.into(),
        author,
    })
}

/// `%keyword%` with LIKE wildcards in the keyword taken literally.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Title or content contains the keyword, ignoring case.
fn keyword_condition(keyword: &str) -> Condition {
    let pattern = like_pattern(keyword);
    let lower = |column: post::Column| Expr::expr(Func::lower(Expr::col((PostEntity, column))));

    Condition::any()
        .add(lower(post::Column::Title).like(LikeExpr::new(pattern.clone()).escape('\\')))
        .add(lower(post::Column::Content).like(LikeExpr::new(pattern).escape('\\')))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_page_with_author(
        &self,
        page: PageRequest,
    ) -> Result<Page<PostWithAuthor>, RepoError> {
        let total = PostEntity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        if page.is_past(total) {
            return Ok(Page::new(Vec::new(), page, total));
        }

        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::PublishedAt)
            .order_by_desc(post::Column::Id)
            .offset(page.offset())
            .limit(page.size())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let items = rows
            .into_iter()
            .map(post_with_author)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, page, total))
    }

    async fn search_with_author(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<PostWithAuthor>, RepoError> {
        tracing::debug!(keyword, page = page.page(), "Searching posts");

        let total = PostEntity::find()
            .filter(keyword_condition(keyword))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        if page.is_past(total) {
            return Ok(Page::new(Vec::new(), page, total));
        }

        let rows = PostEntity::find()
            .filter(keyword_condition(keyword))
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::PublishedAt)
            .order_by_desc(post::Column::Id)
            .offset(page.offset())
            .limit(page.size())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let items = rows
            .into_iter()
            .map(post_with_author)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, page, total))
    }

    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
        PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(post_with_author)
            .transpose()
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::PublishedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post_with_author(
        &self,
        post_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, RepoError> {
        CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(comment_with_author)
            .collect()
    }

    async fn find_recent_with_author(
        &self,
        page: PageRequest,
    ) -> Result<Page<CommentWithAuthor>, RepoError> {
        let total = CommentEntity::find()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        if page.is_past(total) {
            return Ok(Page::new(Vec::new(), page, total));
        }

        let items = CommentEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .offset(page.offset())
            .limit(page.size())
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(comment_with_author)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, page, total))
    }
}

#[async_trait]
impl MessageRepository for PostgresMessageRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Message>, RepoError> {
        let result = MessageEntity::find()
            .order_by_desc(message::Column::SentAt)
            .order_by_desc(message::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_read_newest_first(&self, read: bool) -> Result<Vec<Message>, RepoError> {
        let result = MessageEntity::find()
            .filter(message::Column::IsRead.eq(read))
            .order_by_desc(message::Column::SentAt)
            .order_by_desc(message::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_by_read(&self, read: bool) -> Result<u64, RepoError> {
        MessageEntity::find()
            .filter(message::Column::IsRead.eq(read))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, RepoError> {
        let result = ProfileEntity::find()
            .filter(profile::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Rust"), "%rust%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
