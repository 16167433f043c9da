//! In-process repositories, used when no database is configured.
//!
//! All five repositories share one [`InMemoryStore`] so that relations
//! (authors, cascades, restrictions) behave like the relational schema.
//! Data is lost on process restart.

mod repository;
mod store;

use std::sync::Arc;

use tokio::sync::RwLock;

use quill_core::services::Repositories;

pub use repository::{
    InMemoryCommentRepository, InMemoryMessageRepository, InMemoryPostRepository,
    InMemoryProfileRepository, InMemoryUserRepository,
};

use store::Tables;

/// Shared tables behind an async lock.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// One repository per table, all backed by this store.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: Arc::new(InMemoryUserRepository::new(self.clone())),
            posts: Arc::new(InMemoryPostRepository::new(self.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(self.clone())),
            messages: Arc::new(InMemoryMessageRepository::new(self.clone())),
            profiles: Arc::new(InMemoryProfileRepository::new(self.clone())),
        }
    }
}
