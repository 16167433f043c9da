use std::collections::BTreeMap;

use quill_core::domain::{AuthorSummary, Comment, Message, Post, Profile, User};
use quill_core::error::RepoError;

/// A stored row with a generated id.
pub(crate) trait Row: Clone {
    fn id(&self) -> Option<i64>;
    fn assign_id(&mut self, id: i64);
}

macro_rules! impl_row {
    ($($ty:ty),*) => {
        $(impl Row for $ty {
            fn id(&self) -> Option<i64> {
                self.id
            }

            fn assign_id(&mut self, id: i64) {
                self.id = Some(id);
            }
        })*
    };
}

impl_row!(User, Post, Comment, Message, Profile);

/// One table: rows by id plus the id sequence.
pub(crate) struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Row> Table<T> {
    pub(crate) fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    pub(crate) fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Insert a row without id, replace a row with one.
    pub(crate) fn upsert(&mut self, mut row: T) -> Result<T, RepoError> {
        let id = match row.id() {
            Some(id) if self.rows.contains_key(&id) => id,
            Some(_) => return Err(RepoError::NotFound),
            None => {
                self.last_id += 1;
                row.assign_id(self.last_id);
                self.last_id
            }
        };
        self.rows.insert(id, row.clone());
        Ok(row)
    }

    pub(crate) fn remove(&mut self, id: i64) -> Result<T, RepoError> {
        self.rows.remove(&id).ok_or(RepoError::NotFound)
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.rows.retain(|_, row| keep(row));
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub(crate) fn len(&self) -> u64 {
        self.rows.len() as u64
    }
}

/// All tables of the blog.
#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) users: Table<User>,
    pub(crate) posts: Table<Post>,
    pub(crate) comments: Table<Comment>,
    pub(crate) messages: Table<Message>,
    pub(crate) profiles: Table<Profile>,
}

impl Tables {
    pub(crate) fn author(&self, id: i64) -> Result<AuthorSummary, RepoError> {
        self.users
            .get(id)
            .map(|user| user.summary())
            .ok_or_else(|| RepoError::Query(format!("author {id} is missing")))
    }

    pub(crate) fn require_user(&self, id: i64) -> Result<(), RepoError> {
        if self.users.contains(id) {
            Ok(())
        } else {
            Err(RepoError::Constraint(format!("user {id} does not exist")))
        }
    }

    pub(crate) fn require_post(&self, id: i64) -> Result<(), RepoError> {
        if self.posts.contains(id) {
            Ok(())
        } else {
            Err(RepoError::Constraint(format!("post {id} does not exist")))
        }
    }
}
