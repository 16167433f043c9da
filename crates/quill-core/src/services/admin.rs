use serde::Serialize;

use crate::error::DomainResult;
use crate::ports::{BaseRepository, MessageRepository};

use super::{AuthContext, Repositories};

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub users: u64,
    pub posts: u64,
    pub comments: u64,
    pub unread_messages: u64,
}

pub struct AdminService {
    repos: Repositories,
}

impl AdminService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn dashboard(&self, actor: &AuthContext) -> DomainResult<DashboardStats> {
        actor.require_admin()?;

        Ok(DashboardStats {
            users: self.repos.users.count().await?,
            posts: self.repos.posts.count().await?,
            comments: self.repos.comments.count().await?,
            unread_messages: self.repos.messages.count_by_read(false).await?,
        })
    }
}
