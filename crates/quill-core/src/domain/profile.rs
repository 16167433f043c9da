use serde::{Deserialize, Serialize};

/// Extended biographical data, exactly one per user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Option<i64>,
    pub user_id: i64,
    pub bio: Option<String>,
    pub description: Option<String>,
}

impl Profile {
    /// Unsaved, empty profile for a user who has not filled one in yet.
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }
}
