use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;

use quill_core::domain::{
    Comment, CommentWithAuthor, Message, Post, PostWithAuthor, Profile, User, mask_email,
};
use quill_core::error::RepoError;
use quill_core::pagination::{Page, PageRequest};
use quill_core::ports::{
    BaseRepository, CommentRepository, MessageRepository, PostRepository, ProfileRepository,
    UserRepository,
};

use super::InMemoryStore;
use super::store::Tables;

macro_rules! repository_struct {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name {
            store: Arc<InMemoryStore>,
        }

        impl $name {
            pub fn new(store: Arc<InMemoryStore>) -> Self {
                Self { store }
            }
        }
    };
}

repository_struct!(
    /// In-memory user repository.
    InMemoryUserRepository
);
repository_struct!(
    /// In-memory post repository. Deleting a post deletes its comments.
    InMemoryPostRepository
);
repository_struct!(
    /// In-memory comment repository.
    InMemoryCommentRepository
);
repository_struct!(
    /// In-memory contact message repository.
    InMemoryMessageRepository
);
repository_struct!(
    /// In-memory profile repository.
    InMemoryProfileRepository
);

fn newest_posts_first(posts: &mut [Post]) {
    posts.sort_by_key(|p| Reverse((p.published_at, p.id)));
}

fn with_author(tables: &Tables, posts: Vec<Post>) -> Result<Vec<PostWithAuthor>, RepoError> {
    posts
        .into_iter()
        .map(|post| {
            let author = tables.author(post.author_id)?;
            Ok(PostWithAuthor { post, author })
        })
        .collect()
}

fn comments_with_author(
    tables: &Tables,
    comments: Vec<Comment>,
) -> Result<Vec<CommentWithAuthor>, RepoError> {
    comments
        .into_iter()
        .map(|comment| {
            let author = tables.author(comment.author_id)?;
            Ok(CommentWithAuthor { comment, author })
        })
        .collect()
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl BaseRepository<User, i64> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.store.tables.read().await.users.get(id))
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|u| u.email == entity.email && u.id != entity.id);
        if taken {
            return Err(RepoError::Constraint(format!(
                "email {} already registered",
                mask_email(&entity.email)
            )));
        }
        tables.users.upsert(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.users.contains(id) {
            return Err(RepoError::NotFound);
        }
        let owns_content = tables.posts.values().any(|p| p.author_id == id)
            || tables.comments.values().any(|c| c.author_id == id);
        if owns_content {
            return Err(RepoError::Constraint(format!(
                "user {id} still has posts or comments"
            )));
        }

        tables.profiles.retain(|p| p.user_id != id);
        tables.users.remove(id)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.tables.read().await.users.len())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let tables = self.store.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.store.tables.read().await.posts.get(id))
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.require_user(entity.author_id)?;
        tables.posts.upsert(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.posts.remove(id)?;
        tables.comments.retain(|c| c.post_id != id);
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.tables.read().await.posts.len())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_page_with_author(
        &self,
        page: PageRequest,
    ) -> Result<Page<PostWithAuthor>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        newest_posts_first(&mut posts);

        let total = posts.len() as u64;
        let items = Page::from_slice(&posts, page).items;
        Ok(Page::new(with_author(&tables, items)?, page, total))
    }

    async fn search_with_author(
        &self,
        keyword: &str,
        page: PageRequest,
    ) -> Result<Page<PostWithAuthor>, RepoError> {
        let needle = keyword.to_lowercase();
        let tables = self.store.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| {
                contains_ignore_case(&p.title, &needle) || contains_ignore_case(&p.content, &needle)
            })
            .cloned()
            .collect();
        newest_posts_first(&mut posts);

        let total = posts.len() as u64;
        let items = Page::from_slice(&posts, page).items;
        Ok(Page::new(with_author(&tables, items)?, page, total))
    }

    async fn find_with_author(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
        let tables = self.store.tables.read().await;
        match tables.posts.get(id) {
            Some(post) => {
                let author = tables.author(post.author_id)?;
                Ok(Some(PostWithAuthor { post, author }))
            }
            None => Ok(None),
        }
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        newest_posts_first(&mut posts);
        Ok(posts)
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.tables.read().await.comments.get(id))
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.require_post(entity.post_id)?;
        tables.require_user(entity.author_id)?;
        tables.comments.upsert(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.store.tables.write().await.comments.remove(id)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.tables.read().await.comments.len())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post_with_author(
        &self,
        post_id: i64,
    ) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        comments_with_author(&tables, comments)
    }

    async fn find_recent_with_author(
        &self,
        page: PageRequest,
    ) -> Result<Page<CommentWithAuthor>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<Comment> = tables.comments.values().cloned().collect();
        comments.sort_by_key(|c| Reverse((c.created_at, c.id)));

        let total = comments.len() as u64;
        let items = Page::from_slice(&comments, page).items;
        Ok(Page::new(comments_with_author(&tables, items)?, page, total))
    }
}

#[async_trait]
impl BaseRepository<Message, i64> for InMemoryMessageRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Message>, RepoError> {
        Ok(self.store.tables.read().await.messages.get(id))
    }

    async fn save(&self, entity: Message) -> Result<Message, RepoError> {
        self.store.tables.write().await.messages.upsert(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.store.tables.write().await.messages.remove(id)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.tables.read().await.messages.len())
    }
}

impl InMemoryMessageRepository {
    async fn newest_first(&self, read: Option<bool>) -> Vec<Message> {
        let tables = self.store.tables.read().await;
        let mut messages: Vec<Message> = tables
            .messages
            .values()
            .filter(|m| read.is_none_or(|r| m.read == r))
            .cloned()
            .collect();
        messages.sort_by_key(|m| Reverse((m.sent_at, m.id)));
        messages
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Message>, RepoError> {
        Ok(self.newest_first(None).await)
    }

    async fn find_by_read_newest_first(&self, read: bool) -> Result<Vec<Message>, RepoError> {
        Ok(self.newest_first(Some(read)).await)
    }

    async fn count_by_read(&self, read: bool) -> Result<u64, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.messages.values().filter(|m| m.read == read).count() as u64)
    }
}

#[async_trait]
impl BaseRepository<Profile, i64> for InMemoryProfileRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Profile>, RepoError> {
        Ok(self.store.tables.read().await.profiles.get(id))
    }

    async fn save(&self, entity: Profile) -> Result<Profile, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.require_user(entity.user_id)?;
        let duplicate = tables
            .profiles
            .values()
            .any(|p| p.user_id == entity.user_id && p.id != entity.id);
        if duplicate {
            return Err(RepoError::Constraint(format!(
                "user {} already has a profile",
                entity.user_id
            )));
        }
        tables.profiles.upsert(entity)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.store.tables.write().await.profiles.remove(id)?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.store.tables.read().await.profiles.len())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<Profile>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.profiles.values().find(|p| p.user_id == user_id).cloned())
    }
}
