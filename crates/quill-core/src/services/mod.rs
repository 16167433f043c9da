//! Use-case services.
//!
//! Each service method is one user action: validate the input, call the
//! repositories, return the result. Callers pass an explicit [`AuthContext`]
//! for every action that depends on who is asking.

use std::sync::Arc;

use crate::domain::{Role, User};
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{
    CommentRepository, MessageRepository, PasswordService, PostRepository, ProfileRepository,
    UserRepository,
};

mod admin;
mod comment;
mod message;
mod post;
mod profile;
mod user;

pub use admin::{AdminService, DashboardStats};
pub use comment::CommentService;
pub use message::MessageService;
pub use post::PostService;
pub use profile::ProfileService;
pub use user::UserService;

/// The authenticated user an action is performed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl AuthContext {
    pub fn from_user(user: &User) -> DomainResult<Self> {
        let user_id = user
            .id
            .ok_or_else(|| DomainError::Internal("user has not been persisted".to_string()))?;
        Ok(Self {
            user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Authors may change their own content; admins may change anything.
    pub fn can_modify(&self, owner_id: i64) -> bool {
        self.is_admin() || self.user_id == owner_id
    }

    pub fn require_admin(&self) -> DomainResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "administrator role required".to_string(),
            ))
        }
    }

    pub fn require_owner(&self, owner_id: i64) -> DomainResult<()> {
        if self.can_modify(owner_id) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "only the author or an administrator may do this".to_string(),
            ))
        }
    }
}

/// Map a repository error for a known entity, keeping the id on `NotFound`.
pub(crate) fn for_entity(entity_type: &'static str, id: i64) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}

/// Every service, wired to one set of repositories.
#[derive(Clone)]
pub struct Services {
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub messages: Arc<MessageService>,
    pub users: Arc<UserService>,
    pub profiles: Arc<ProfileService>,
    pub admin: Arc<AdminService>,
}

/// The repositories and adapters the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Services {
    pub fn new(repos: Repositories, passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            posts: Arc::new(PostService::new(
                repos.posts.clone(),
                repos.users.clone(),
                repos.comments.clone(),
            )),
            comments: Arc::new(CommentService::new(
                repos.comments.clone(),
                repos.posts.clone(),
            )),
            messages: Arc::new(MessageService::new(repos.messages.clone())),
            users: Arc::new(UserService::new(repos.users.clone(), passwords)),
            profiles: Arc::new(ProfileService::new(
                repos.profiles.clone(),
                repos.users.clone(),
            )),
            admin: Arc::new(AdminService::new(repos)),
        }
    }
}
